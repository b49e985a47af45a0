//! Search key encoding used by Doxygen's search index.

use std::fmt::Write;

/// Encode a plain (unescaped) symbol name as a search key.
///
/// ASCII letters and digits are kept and lowercased. Any other ASCII
/// character becomes `_` followed by two lowercase hex digits, so
/// `Factory< T >` turns into `factory_3c_20t_20_3e`. Non-ASCII characters
/// are lowercased but never escaped.
pub fn search_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() * 2);
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            id.push(ch.to_ascii_lowercase());
        } else if !ch.is_ascii() {
            id.extend(ch.to_lowercase());
        } else {
            // Writing into a String cannot fail
            let _ = write!(id, "_{:02x}", ch as u32);
        }
    }
    id
}

/// The key a generator would emit for a display label such as
/// `Factory&lt; Property &gt;`.
pub fn key_for_label(label: &str) -> String {
    search_id(&unescape_html(label))
}

/// Replace the HTML entities Doxygen emits in labels with their characters.
/// Unknown entities are left untouched.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let ch = match &rest[1..semi] {
                "lt" => '<',
                "gt" => '>',
                "amp" => '&',
                "quot" => '"',
                "apos" | "#39" => '\'',
                _ => return None,
            };
            Some((ch, semi + 1))
        });

        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_id_keeps_alphanumerics() {
        assert_eq!(search_id("FactoryBase"), "factorybase");
        assert_eq!(search_id("Float3s"), "float3s");
    }

    #[test]
    fn test_search_id_escapes_punctuation() {
        assert_eq!(search_id("flat_extent"), "flat_5fextent");
        assert_eq!(search_id("std::string"), "std_3a_3astring");
        assert_eq!(search_id("Args..."), "args_2e_2e_2e");
    }

    #[test]
    fn test_search_id_keeps_non_ascii() {
        assert_eq!(search_id("élan"), "élan");
        assert_eq!(search_id("Überclass"), "überclass");
        assert_eq!(search_id("Größe<T>"), "größe_3ct_3e");
    }

    #[test]
    fn test_key_for_template_label() {
        assert_eq!(
            key_for_label("Factory&lt; MeshDrawer, const Mesh *&gt;"),
            "factory_3c_20meshdrawer_2c_20const_20mesh_20_2a_3e"
        );
        assert_eq!(
            key_for_label("Factory&lt; MetaData, const std::string &amp; &gt;"),
            "factory_3c_20metadata_2c_20const_20std_3a_3astring_20_26_20_3e"
        );
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("a &lt; b &amp;&amp; c &gt; d"), "a < b && c > d");
        assert_eq!(unescape_html("&#39;x&quot;"), "'x\"");
        assert_eq!(unescape_html("AT&T &nbsp;"), "AT&T &nbsp;");
        assert_eq!(unescape_html("trailing &"), "trailing &");
    }

    #[test]
    fn test_escape_html_inverts_unescape() {
        let label = "Filter&lt; Predicate, std::tuple&lt; Args... &gt; &gt;";
        assert_eq!(escape_html(&unescape_html(label)), label);
    }
}

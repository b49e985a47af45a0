//! HTML result markup in the shape the Doxygen search page produces.

use url::Url;

use super::normalize::escape_html;
use super::types::IndexEntry;

/// Join a generated anchor such as `../classinviwo_1_1FXAA.html` onto a
/// documentation base URL.
///
/// Anchors are relative to the `search/` directory, and the base names the
/// HTML output directory or a page inside it (`.../html`, `.../html/`, or
/// `.../html/index.html`). Without a usable base the anchor is returned as is.
pub fn absolute_url(base_url: Option<&str>, anchor_url: &str) -> String {
    let Some(base) = base_url.filter(|b| !b.is_empty()) else {
        return anchor_url.to_string();
    };

    match join_anchor(base, anchor_url) {
        Ok(url) => url.into(),
        Err(err) => {
            tracing::debug!("Cannot join {} onto {}: {}", anchor_url, base, err);
            anchor_url.to_string()
        }
    }
}

fn join_anchor(base: &str, anchor_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base)?;
    let path = base.path();
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    if !path.ends_with('/') && !last_segment.contains('.') {
        let dir = format!("{}/", path);
        base.set_path(&dir);
    }
    base.join("search/")?.join(anchor_url)
}

fn target_attr(parent_target: bool) -> &'static str {
    if parent_target { " target=\"_parent\"" } else { "" }
}

/// Render one `SRResult` block per entry.
///
/// Labels are already HTML-escaped by the generator and are emitted verbatim.
pub fn render_html<'a>(
    results: impl IntoIterator<Item = &'a IndexEntry>,
    base_url: Option<&str>,
) -> String {
    let mut html = String::new();

    for entry in results {
        let id = format!("SR_{}", entry.key);
        html.push_str(&format!("<div class=\"SRResult\" id=\"{}\">\n", id));
        html.push_str("  <div class=\"SREntry\">\n");

        match entry.variants.as_slice() {
            [single] => {
                html.push_str(&format!(
                    "    <a class=\"SRSymbol\" href=\"{}\"{}>{}</a>\n",
                    escape_html(&absolute_url(base_url, &single.anchor_url)),
                    target_attr(single.parent_target),
                    single.label
                ));
                if !single.scope_label.is_empty() {
                    html.push_str(&format!(
                        "    <span class=\"SRScope\">{}</span>\n",
                        single.scope_label
                    ));
                }
            }
            variants => {
                html.push_str(&format!(
                    "    <span class=\"SRSymbol\">{}</span>\n",
                    entry.label()
                ));
                html.push_str("    <div class=\"SRChildren\">\n");
                for variant in variants {
                    let text = if variant.scope_label.is_empty() {
                        variant.label.as_str()
                    } else {
                        variant.scope_label.as_str()
                    };
                    html.push_str(&format!(
                        "      <a class=\"SRScope\" href=\"{}\"{}>{}</a>\n",
                        escape_html(&absolute_url(base_url, &variant.anchor_url)),
                        target_attr(variant.parent_target),
                        text
                    ));
                }
                html.push_str("    </div>\n");
            }
        }

        html.push_str("  </div>\n</div>\n");
    }

    html
}

use lazy_static::lazy_static;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Terminal-escaped C++ highlighting for a symbol label such as
/// `Factory< Camera, const std::string &, Args... >`.
pub fn highlight_cpp(code: &str) -> String {
    let syntax = SYNTAX_SET
        .find_syntax_by_extension("cpp")
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, &THEME_SET.themes["base16-ocean.dark"]);

    let mut highlighted = String::new();
    for line in LinesWithEndings::from(code) {
        match h.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => {
                highlighted.push_str(&syntect::util::as_24_bit_terminal_escaped(&ranges, false));
            }
            Err(_) => highlighted.push_str(line),
        }
    }
    highlighted.push_str("\x1b[0m");
    highlighted
}

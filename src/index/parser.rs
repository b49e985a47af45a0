//! Parser for search table literals.
//!
//! Reads the small JavaScript subset Doxygen emits for `search/*.js`:
//! an optional `var name =` prefix, nested arrays, single- or double-quoted
//! strings and integer flags, and an optional trailing `;`.

use std::path::PathBuf;
use thiserror::Error;

use super::types::{IndexEntry, Variant};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("malformed entry #{entry}: {message}")]
    Shape { entry: usize, message: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid JSON table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog {}: {message}", path.display())]
    Catalog { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(i64),
    List(Vec<Literal>),
}

impl Literal {
    fn describe(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Int(_) => "number",
            Literal::List(_) => "array",
        }
    }
}

/// Generated tables nest four arrays deep at most.
const MAX_DEPTH: usize = 8;

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Reader { src, pos: 0, depth: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        ParseError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if self.src[self.pos..].starts_with("//") {
                while !matches!(self.bump(), Some('\n') | None) {}
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(ch) if ch == want => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{}', found '{}'", want, ch))),
            None => Err(self.error(format!("expected '{}', found end of input", want))),
        }
    }

    /// Skip `var <ident> =` if present.
    fn skip_declaration(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        let Some(after_var) = rest.strip_prefix("var") else {
            return Ok(());
        };
        if !after_var.starts_with(char::is_whitespace) {
            return Ok(());
        }
        self.pos += 3;
        self.skip_ws();
        let ident_len = self.src[self.pos..]
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(self.src.len() - self.pos);
        if ident_len == 0 {
            return Err(self.error("expected variable name after 'var'"));
        }
        self.pos += ident_len;
        self.expect('=')
    }

    fn value(&mut self) -> Result<Literal, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.list(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Literal::Str),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.integer(),
            Some(ch) => Err(self.error(format!("unexpected character '{}'", ch))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn list(&mut self) -> Result<Literal, ParseError> {
        if self.depth == MAX_DEPTH {
            self.skip_ws();
            return Err(self.error(format!("arrays nested deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let items = self.list_items();
        self.depth -= 1;
        items.map(Literal::List)
    }

    fn list_items(&mut self) -> Result<Vec<Literal>, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(items),
                Some(ch) => {
                    self.pos -= ch.len_utf8();
                    return Err(self.error(format!("expected ',' or ']', found '{}'", ch)));
                }
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('u') => self.unicode_escape()?,
                        Some(other) => other,
                        None => return Err(self.error("unterminated escape")),
                    };
                    out.push(escaped);
                }
                Some(ch) => out.push(ch),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let digits = self.src.get(self.pos..self.pos + 4).unwrap_or_default();
        let code = u32::from_str_radix(digits, 16)
            .ok()
            .filter(|_| digits.len() == 4)
            .ok_or_else(|| self.error("invalid \\u escape"))?;
        self.pos += 4;
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn integer(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.src[start..self.pos]
            .parse()
            .map(Literal::Int)
            .map_err(|_| self.error("invalid number"))
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() == Some(';') {
            self.bump();
            self.skip_ws();
        }
        match self.peek() {
            None => Ok(()),
            Some(ch) => Err(self.error(format!("unexpected trailing '{}'", ch))),
        }
    }
}

/// Parse a whole table literal into its entries, in source order.
pub fn parse_table(source: &str) -> Result<Vec<IndexEntry>, ParseError> {
    let mut reader = Reader::new(source.trim_start_matches('\u{feff}'));
    reader.skip_declaration()?;
    let table = reader.value()?;
    reader.finish()?;

    let Literal::List(items) = table else {
        return Err(ParseError::Shape {
            entry: 0,
            message: format!("table must be an array, found {}", table.describe()),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            entry_from_literal(item).map_err(|message| ParseError::Shape { entry: idx, message })
        })
        .collect()
}

fn entry_from_literal(item: Literal) -> Result<IndexEntry, String> {
    let Literal::List(pair) = item else {
        return Err(format!("expected [key, value], found {}", item.describe()));
    };
    let [key, value]: [Literal; 2] = pair
        .try_into()
        .map_err(|p: Vec<Literal>| format!("expected [key, value], found {} elements", p.len()))?;

    let Literal::Str(key) = key else {
        return Err(format!("key must be a string, found {}", key.describe()));
    };
    if key.is_empty() {
        return Err("key is empty".to_string());
    }
    let Literal::List(value) = value else {
        return Err(format!(
            "value for '{}' must be an array, found {}",
            key,
            value.describe()
        ));
    };

    let starts_with_label = matches!(value.first(), Some(Literal::Str(_)));
    let variants = if value.is_empty() {
        Err("value is empty".to_string())
    } else if starts_with_label && matches!(value.get(1), Some(Literal::List(_))) {
        shared_label_variants(value)
    } else if starts_with_label {
        tuple_variant(value).map(|v| vec![v])
    } else if matches!(value[0], Literal::List(_)) {
        value.into_iter().map(tuple_variant_literal).collect()
    } else {
        Err(format!("unexpected {} at start of value", value[0].describe()))
    }
    .map_err(|e| format!("'{}': {}", key, e))?;

    Ok(IndexEntry { key, variants })
}

/// `[label, [url, flag, scope], [url, flag, scope], ...]`
fn shared_label_variants(value: Vec<Literal>) -> Result<Vec<Variant>, String> {
    let mut items = value.into_iter();
    let Some(Literal::Str(label)) = items.next() else {
        return Err("label must be a string".to_string());
    };

    items
        .map(|link| {
            let Literal::List(parts) = link else {
                return Err(format!("link must be an array, found {}", link.describe()));
            };
            let mut parts = parts.into_iter();
            let anchor_url = match parts.next() {
                Some(Literal::Str(url)) => url,
                _ => return Err("link must start with an anchor URL".to_string()),
            };
            let parent_target = match parts.next() {
                Some(Literal::Int(flag)) => flag != 0,
                None => true,
                Some(other) => {
                    return Err(format!("link flag must be a number, found {}", other.describe()));
                }
            };
            let scope_label = match parts.next() {
                Some(Literal::Str(scope)) => scope,
                None => String::new(),
                Some(other) => {
                    return Err(format!("scope must be a string, found {}", other.describe()));
                }
            };
            if parts.next().is_some() {
                return Err("link has more than three elements".to_string());
            }
            Ok(Variant {
                label: label.clone(),
                anchor_url,
                scope_label,
                parent_target,
            })
        })
        .collect()
}

fn tuple_variant_literal(item: Literal) -> Result<Variant, String> {
    match item {
        Literal::List(parts) => tuple_variant(parts),
        other => Err(format!("variant must be an array, found {}", other.describe())),
    }
}

/// `[label, url]`, `[label, url, scope]` or `[label, url, scope, flag]`
fn tuple_variant(parts: Vec<Literal>) -> Result<Variant, String> {
    if !(2..=4).contains(&parts.len()) {
        return Err(format!("variant must have 2 to 4 elements, found {}", parts.len()));
    }
    let mut parts = parts.into_iter();
    let (Some(Literal::Str(label)), Some(Literal::Str(anchor_url))) = (parts.next(), parts.next())
    else {
        return Err("variant must start with a label and an anchor URL".to_string());
    };
    let scope_label = match parts.next() {
        Some(Literal::Str(scope)) => scope,
        None => String::new(),
        Some(other) => {
            return Err(format!("scope must be a string, found {}", other.describe()));
        }
    };
    let parent_target = match parts.next() {
        Some(Literal::Int(flag)) => flag != 0,
        None => true,
        Some(other) => {
            return Err(format!("link flag must be a number, found {}", other.describe()));
        }
    };
    Ok(Variant {
        label,
        anchor_url,
        scope_label,
        parent_target,
    })
}

//! `maxmind_asn { ... }` directive block loader.
//!
//! ```text
//! maxmind_asn {
//!     db_path /var/lib/GeoLite2-ASN.mmdb
//!     allow_asos "google llc" cloudflare
//!     deny_asos spam-isp
//! }
//! ```
//!
//! A keyword selects the field that following values feed. `db_path` takes
//! exactly one value; the list keywords keep accumulating (lowercased) until
//! the next keyword. The outer `name {` ... `}` wrapper is optional.

use asngate_core::error::{AsnGateError, Result};

use super::schema::MatcherConfig;

/// Field currently receiving values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Idle,
    DbPath,
    AllowAsos,
    DenyAsos,
}

impl Field {
    fn from_keyword(tok: &Token) -> Option<Self> {
        if tok.quoted {
            return None;
        }
        match tok.text.as_str() {
            "db_path" => Some(Field::DbPath),
            "allow_asos" => Some(Field::AllowAsos),
            "deny_asos" => Some(Field::DenyAsos),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
    line: usize,
}

impl Token {
    fn is_bare(&self, s: &str) -> bool {
        !self.quoted && self.text == s
    }
}

/// Parse a directive block into a validated matcher config.
pub fn parse(src: &str) -> Result<MatcherConfig> {
    let tokens = tokenize(src)?;
    let body = unwrap_block(&tokens)?;

    let mut cfg = MatcherConfig::default();
    let mut field = Field::Idle;

    for tok in body {
        if let Some(next) = Field::from_keyword(tok) {
            field = next;
            continue;
        }
        if tok.is_bare("{") || tok.is_bare("}") {
            return Err(bad(tok, "unexpected brace"));
        }

        match field {
            Field::DbPath => {
                cfg.db_path = tok.text.clone();
                field = Field::Idle;
            }
            Field::AllowAsos => cfg.allow_asos.push(tok.text.to_lowercase()),
            Field::DenyAsos => cfg.deny_asos.push(tok.text.to_lowercase()),
            Field::Idle => {
                return Err(bad(tok, &format!("unexpected config parameter {}", tok.text)));
            }
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Strip an optional `name { ... }` wrapper.
fn unwrap_block(tokens: &[Token]) -> Result<&[Token]> {
    let opens_block = tokens.len() >= 2
        && Field::from_keyword(&tokens[0]).is_none()
        && !tokens[0].quoted
        && tokens[1].is_bare("{");

    if !opens_block {
        return Ok(tokens);
    }

    match tokens.last() {
        Some(last) if last.is_bare("}") && tokens.len() >= 3 => Ok(&tokens[2..tokens.len() - 1]),
        Some(last) => Err(bad(last, &format!("unclosed block {}", tokens[0].text))),
        None => Ok(tokens),
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut out = Vec::new();

    for (idx, line) in src.lines().enumerate() {
        let line_no = idx + 1;
        let mut chars = line.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }
            if c == '#' {
                break;
            }

            if c == '"' {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => text.push(other),
                    }
                }
                if !closed {
                    return Err(AsnGateError::BadConfig(format!(
                        "line {line_no}: unterminated quoted string"
                    )));
                }
                out.push(Token { text, quoted: true, line: line_no });
                continue;
            }

            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            out.push(Token { text, quoted: false, line: line_no });
        }
    }

    Ok(out)
}

fn bad(tok: &Token, msg: &str) -> AsnGateError {
    AsnGateError::BadConfig(format!("line {}: {msg}", tok.line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_handles_quotes_and_comments() {
        let toks = tokenize("allow_asos \"Google LLC\" amazon # trailing\n# whole line\n\"a \\\"b\\\"\"").unwrap();
        let texts: Vec<_> = toks.iter().map(|t| (t.text.as_str(), t.quoted)).collect();
        assert_eq!(
            texts,
            [("allow_asos", false), ("Google LLC", true), ("amazon", false), ("a \"b\"", true)]
        );
        assert_eq!(toks[3].line, 3);
    }

    #[test]
    fn unterminated_quote() {
        assert!(tokenize("deny_asos \"oops").is_err());
    }

    #[test]
    fn list_fields_accumulate_until_next_keyword() {
        let cfg = parse("db_path /x.mmdb allow_asos A B\nC deny_asos D").unwrap();
        assert_eq!(cfg.allow_asos, ["a", "b", "c"]);
        assert_eq!(cfg.deny_asos, ["d"]);
    }

    #[test]
    fn db_path_takes_one_value() {
        let err = parse("db_path /x.mmdb /y.mmdb").unwrap_err();
        assert!(err.to_string().contains("unexpected config parameter /y.mmdb"), "{err}");
    }

    #[test]
    fn db_path_keeps_case() {
        let cfg = parse("db_path /Data/ASN.mmdb").unwrap();
        assert_eq!(cfg.db_path, "/Data/ASN.mmdb");
    }

    #[test]
    fn quoted_keyword_is_a_value() {
        let cfg = parse("db_path /x.mmdb deny_asos \"allow_asos\"").unwrap();
        assert_eq!(cfg.deny_asos, ["allow_asos"]);
        assert!(cfg.allow_asos.is_empty());
    }

    #[test]
    fn unclosed_block() {
        let err = parse("maxmind_asn {\n db_path /x.mmdb\n").unwrap_err();
        assert!(err.to_string().contains("unclosed block maxmind_asn"), "{err}");
    }
}

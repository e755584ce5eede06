//! Stock token mappers for [`BuildOptions::map`](crate::BuildOptions::map)
//!
//! A mapper rewrites a token before it reaches the engine, e.g. to strip the
//! quotes from a string literal so captures see the unquoted text.

use std::sync::Arc;

use smol_str::SmolStr;

use super::Token;

/// A token rewrite applied during preprocessing
pub type TokenMapper = Arc<dyn Fn(Token) -> Token + Send + Sync>;

/// Strip surrounding quotes and resolve backslash escapes
///
/// Handles `"..."`, `'...'` and `` `...` `` (raw, no escape processing).
/// Tokens that are not quoted are returned unchanged.
pub fn unquote(mut token: Token) -> Token {
    let text = token.text.as_str();
    let mut chars = text.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return token;
    };
    if open != close || !matches!(open, '"' | '\'' | '`') {
        return token;
    }
    let inner = chars.as_str();
    token.text = if open == '`' {
        SmolStr::new(inner)
    } else {
        SmolStr::new(unescape(inner))
    };
    token
}

/// Upper-case the token text
pub fn upper(mut token: Token) -> Token {
    token.text = SmolStr::new(token.text.to_uppercase());
    token
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;

    fn tok(kind: &str, text: &str) -> Token {
        Token::new(kind, text, Position::start())
    }

    #[test]
    fn test_unquote_string_with_escapes() {
        let t = unquote(tok("String", r#""a\"b\n""#));
        assert_eq!(t.text, "a\"b\n");
        assert_eq!(t.kind, "String");
    }

    #[test]
    fn test_unquote_raw_keeps_backslashes() {
        let t = unquote(tok("RawString", r"`a\n`"));
        assert_eq!(t.text, r"a\n");
    }

    #[test]
    fn test_mapping_keeps_source_end() {
        let t = unquote(tok("String", r#""ab""#));
        assert_eq!(t.text, "ab");
        assert_eq!(t.end(), Position::new(4, 1, 5));
    }

    #[test]
    fn test_unquote_leaves_unquoted_tokens() {
        assert_eq!(unquote(tok("Ident", "abc")).text, "abc");
        assert_eq!(unquote(tok("Punct", "\"")).text, "\"");
        assert_eq!(unquote(tok("String", "\"a'")).text, "\"a'");
    }

    #[test]
    fn test_upper() {
        assert_eq!(upper(tok("Ident", "select")).text, "SELECT");
    }
}

//! Quote-aware tokenizer for REPL input.
//!
//! Handles:
//! - Space-separated words
//! - Single and double quotes (a quote of the other kind is literal inside)
//! - Quoted spaces, kept as part of the current word
//! - Unterminated quotes, reported through [`Tokenized::open_quote`]

use super::Quote;

// =============================================================================
// Tokenizer Output
// =============================================================================

/// Result of tokenizing a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<String>,
    /// Quote opened and never closed, if any.
    pub open_quote: Option<Quote>,
}

// =============================================================================
// Lexer
// =============================================================================

/// Single-pass tokenizer over one line of input.
pub struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<String>,
    /// `Some` once a token has started, even if it is still empty (`""`).
    current: Option<String>,
    quote: Option<Quote>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            current: None,
            quote: None,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> Tokenized {
        for c in self.input.chars() {
            match Quote::from_char(c) {
                Some(quote) => self.quote_char(quote, c),
                None if c == ' ' => self.space(),
                None => self.push_char(c),
            }
        }

        if let Some(token) = self.current.take() {
            self.tokens.push(token);
        }

        Tokenized {
            tokens: self.tokens,
            open_quote: self.quote,
        }
    }

    fn quote_char(&mut self, quote: Quote, c: char) {
        match self.quote {
            Some(open) if open == quote => {
                self.quote = None;
                self.current.get_or_insert_with(String::new);
            }
            Some(_) => self.push_char(c),
            None => {
                self.quote = Some(quote);
                self.current.get_or_insert_with(String::new);
            }
        }
    }

    fn space(&mut self) {
        if self.quote.is_some() {
            self.push_char(' ');
        } else if let Some(token) = self.current.take() {
            self.tokens.push(token);
        }
    }

    fn push_char(&mut self, c: char) {
        self.current.get_or_insert_with(String::new).push(c);
    }
}

/// Tokenize `line` into shell-like arguments.
pub fn tokenize(line: &str) -> Tokenized {
    Lexer::new(line).tokenize()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line).tokens
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(tokens("ls -la /home"), vec!["ls", "-la", "/home"]);
    }

    #[test]
    fn test_repeated_spaces() {
        assert_eq!(tokens("  a   b  "), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        let result = tokenize("");
        assert!(result.tokens.is_empty());
        assert!(result.open_quote.is_none());
    }

    #[test]
    fn test_double_quoted_space() {
        let result = tokenize(r#"a "b c" d"#);
        assert_eq!(result.tokens, vec!["a", "b c", "d"]);
        assert_eq!(result.open_quote, None);
    }

    #[test]
    fn test_unterminated_double_quote() {
        let result = tokenize(r#"a "b c"#);
        assert_eq!(result.tokens, vec!["a", "b c"]);
        assert_eq!(result.open_quote, Some(Quote::Double));
    }

    #[test]
    fn test_unterminated_single_quote() {
        let result = tokenize("echo 'it");
        assert_eq!(result.tokens, vec!["echo", "it"]);
        assert_eq!(result.open_quote, Some(Quote::Single));
    }

    #[test]
    fn test_other_quote_is_literal() {
        assert_eq!(tokens(r#"say "it's""#), vec!["say", "it's"]);
        assert_eq!(tokens(r#"say '"hi"'"#), vec!["say", "\"hi\""]);
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        assert_eq!(tokens(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        assert_eq!(tokens(r#""""#), vec![""]);
        assert_eq!(tokens("a '' b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_lone_open_quote_starts_token() {
        let result = tokenize("echo \"");
        assert_eq!(result.tokens, vec!["echo", ""]);
        assert_eq!(result.open_quote, Some(Quote::Double));
    }
}

//! Line splitting for dispatch and completion.
//!
//! Supports:
//! - Whole-line tokenizing for submission: [`tokenize`]
//! - Splitting the text left of the cursor into completed arguments and the
//!   search prefix being typed: [`split_for_completion`]

mod lexer;

pub use lexer::{tokenize, Lexer, Tokenized};

use crate::core::error::ParseError;

// =============================================================================
// Quote
// =============================================================================

/// Kind of quote that can group words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl Tokenized {
    /// Tokens of a balanced line, or the quote left open.
    pub fn into_result(self) -> Result<Vec<String>, ParseError> {
        match self.open_quote {
            Some(quote) => Err(ParseError::UnbalancedQuote(quote)),
            None => Ok(self.tokens),
        }
    }

    pub fn single_quoted(&self) -> bool {
        self.open_quote == Some(Quote::Single)
    }

    pub fn double_quoted(&self) -> bool {
        self.open_quote == Some(Quote::Double)
    }
}

// =============================================================================
// Completion Split
// =============================================================================

/// Input to the completion engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSplit {
    /// Arguments fully typed before the one under the cursor.
    pub args: Vec<String>,
    /// Partial argument under the cursor (empty after an unquoted space).
    pub search: String,
    /// Quote still open at the cursor, if any.
    pub open_quote: Option<Quote>,
}

/// Split the text left of the cursor for completion.
///
/// If `before_cursor` ends with an unquoted space every token is complete and
/// the search is empty; otherwise the last token is the search prefix.
pub fn split_for_completion(before_cursor: &str) -> CompletionSplit {
    let Tokenized {
        mut tokens,
        open_quote,
    } = tokenize(before_cursor);

    let search = if before_cursor.ends_with(' ') && open_quote.is_none() {
        String::new()
    } else {
        tokens.pop().unwrap_or_default()
    };

    CompletionSplit {
        args: tokens,
        search,
        open_quote,
    }
}

// =============================================================================
// Tests
// =============================================================================

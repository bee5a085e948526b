//! # Error Types
//!
//! This module defines all error types for the BWW pipeline.
//!
//! Fatal errors carry enough location information (line/column/byte offset or
//! tune index) to be reported to a user. Recoverable problems found while
//! building or expanding a model are not errors: they are logged and collected
//! as [`Warning`] values so that a caller can decide to be strict about them.
//!
//! ## Error Types
//! - `ParseError` - Lexer/parser errors with line, column and byte offset
//! - `BuildError` - Fatal model building errors (e.g. an unparsable tempo)
//! - `StrictError` - Recoverable warnings promoted to a failure in strict mode
//! - `Serialization` - YAML persistence failures
//! - `ConfigError` - Invalid pipeline configuration
//! - `Io` - File access from the command line front end
//!
//! ## Usage
//! ```rust
//! use bww::{parse, BwwError};
//!
//! match parse(b"& LA_4 !t \"unterminated") {
//!     Ok(_) => unreachable!(),
//!     Err(BwwError::ParseError { line, column, .. }) => {
//!         eprintln!("Parse error at {}:{}", line, column);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BwwError {
    /// Parse error with location information.
    ///
    /// Occurs during lexing or parsing when the BWW source is malformed:
    /// an unterminated string, an unknown glyph or a broken header line.
    ///
    /// # Example
    /// ```
    /// # use bww::BwwError;
    /// let err = BwwError::ParseError {
    ///     line: 5,
    ///     column: 10,
    ///     offset: 88,
    ///     message: "Unknown glyph 'xyz'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 5, column 10: Unknown glyph 'xyz'");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        offset: usize,
        message: String,
    },

    /// Fatal error while building the model of one tune.
    ///
    /// # Example
    /// ```
    /// # use bww::BwwError;
    /// let err = BwwError::BuildError {
    ///     tune: 2,
    ///     message: "Invalid tempo 'fast'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Build error in tune 2: Invalid tempo 'fast'");
    /// ```
    #[error("Build error in tune {tune}: {message}")]
    BuildError { tune: usize, message: String },

    /// Strict mode was requested and recoverable warnings were recorded.
    #[error("Strict import failed with {count} warning(s), first: {first}")]
    StrictError { count: usize, first: Warning },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A recoverable problem: the offending construct was dropped and processing
/// went on.
///
/// `tune` and `measure` are 1-based; a `measure` of 0 means the problem is not
/// tied to a measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub tune: usize,
    pub measure: usize,
    pub message: String,
}

impl Warning {
    pub fn new(tune: usize, measure: usize, message: impl Into<String>) -> Self {
        Self {
            tune,
            measure,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measure > 0 {
            write!(f, "tune {}, measure {}: {}", self.tune, self.measure, self.message)
        } else {
            write!(f, "tune {}: {}", self.tune, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::new(1, 3, "dot without a preceding note");
        assert_eq!(w.to_string(), "tune 1, measure 3: dot without a preceding note");

        let w = Warning::new(2, 0, "no expansion for Grip/Half");
        assert_eq!(w.to_string(), "tune 2: no expansion for Grip/Half");
    }

    #[test]
    fn test_strict_error_display() {
        let err = BwwError::StrictError {
            count: 2,
            first: Warning::new(1, 1, "stray tie"),
        };
        assert_eq!(
            err.to_string(),
            "Strict import failed with 2 warning(s), first: tune 1, measure 1: stray tie"
        );
    }
}

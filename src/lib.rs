//! ruleflex: a rule-driven lexical analyzer
//!
//! This library provides a general tokenizing engine for small domain-specific
//! languages: ordered pattern/action rules, scanning states with tags, a lazy
//! token stream with peek/skip/consume, and transactional backtracking.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lexer;

// Re-export commonly used types
pub use config::LexerOptions;
pub use error::{ConfigError, LexError, LexResult, ParseError, ParseErrorKind, UsageError};
pub use lexer::{ActionContext, Alternative, Lexer, SyntaxConfig, Token};

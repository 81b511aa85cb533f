//! Rule-driven lexical analysis.
//!
//! A [`Lexer`] holds an ordered list of rules, each made of a state/tag
//! applicability spec, a regular expression and an action. Tokens are produced
//! on demand: every call that needs a token runs the rule-matching loop until
//! at least one token is pending or the input is exhausted.
//!
//! ```
//! use ruleflex::Lexer;
//!
//! let mut lexer = Lexer::new();
//! lexer
//!     .rule_any(r"[a-zA-Z]+", |ctx| {
//!         ctx.accept("symbol");
//!         Ok(())
//!     })?
//!     .rule_any(r"[0-9]+", |ctx| {
//!         let n: i64 = ctx.text().parse()?;
//!         ctx.accept_value("number", n);
//!         Ok(())
//!     })?;
//!
//! lexer.input("foo42");
//! let tokens = lexer.tokens()?;
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1].value, 42);
//! # Ok::<(), ruleflex::LexError>(())
//! ```
//!
//! Consumption can be made speculative with [`Lexer::begin`] /
//! [`Lexer::rollback`], or with [`Lexer::alternatives`] which tries several
//! strategies and keeps the first that succeeds.

mod context;
mod engine;
mod rule;
mod state;
mod stream;
mod token;
mod transaction;

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::LexerOptions;
use crate::error::{LexError, LexResult, ParseError, ParseErrorKind};

pub use context::{ActionContext, Location, MatchInfo};
pub use regex_automata::util::syntax::Config as SyntaxConfig;
pub use rule::{
    compile_pattern, compile_pattern_with, parse_state_spec, Action, Rule, StateEntry, ANY_STATE,
};
pub use state::StateStore;
pub use token::{dump_tokens, Token, EOF};
pub use transaction::Alternative;

/// Rule-driven lexer with a lazy, backtrackable token stream.
pub struct Lexer {
    rules: Vec<Rule>,
    options: LexerOptions,
    input: Arc<str>,
    pos: usize,
    line: usize,
    column: usize,
    eof: bool,
    store: StateStore,
    pending: VecDeque<Token>,
    transactions: Vec<Vec<Token>>,
    data: IndexMap<String, Value>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self::with_options(LexerOptions::default())
    }

    pub fn with_options(options: LexerOptions) -> Self {
        let store = StateStore::new(options.initial_state.clone(), options.debug);
        Self {
            rules: Vec::new(),
            options,
            input: Arc::from(""),
            pos: 0,
            line: 1,
            column: 1,
            eof: false,
            store,
            pending: VecDeque::new(),
            transactions: Vec::new(),
            data: IndexMap::new(),
        }
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Turns step-by-step logging of the matching loop on or off.
    pub fn debug(&mut self, debug: bool) -> &mut Self {
        self.options.debug = debug;
        self.store.set_debug(debug);
        self
    }

    // ==================== ルール登録 ====================

    /// Registers a rule for the states named in `states`.
    ///
    /// `states` is `"*"` or a comma-separated list of entries such as
    /// `"default, comment #nested"`: one state name each, optionally followed
    /// by `#tag` requirements.
    pub fn rule<F>(&mut self, states: &str, pattern: &str, action: F) -> LexResult<&mut Self>
    where
        F: FnMut(&mut ActionContext<'_>) -> anyhow::Result<()> + Send + 'static,
    {
        self.rule_with_syntax(states, pattern, SyntaxConfig::new(), action)
    }

    /// Registers a rule that applies in every state.
    pub fn rule_any<F>(&mut self, pattern: &str, action: F) -> LexResult<&mut Self>
    where
        F: FnMut(&mut ActionContext<'_>) -> anyhow::Result<()> + Send + 'static,
    {
        self.rule(ANY_STATE, pattern, action)
    }

    /// Registers a rule whose pattern is compiled with the given syntax
    /// options, e.g. `SyntaxConfig::new().case_insensitive(true)`.
    pub fn rule_with_syntax<F>(
        &mut self,
        states: &str,
        pattern: &str,
        syntax: SyntaxConfig,
        action: F,
    ) -> LexResult<&mut Self>
    where
        F: FnMut(&mut ActionContext<'_>) -> anyhow::Result<()> + Send + 'static,
    {
        let states = parse_state_spec(states)?;
        let compiled = compile_pattern_with(pattern, syntax)?;
        let rule = Rule::new(states, pattern, compiled, Box::new(action));
        if self.options.debug {
            log::debug!(
                "rule: configure rule (state: {}, pattern: {})",
                rule.describe_states(),
                rule.source()
            );
        }
        self.rules.push(rule);
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    // ==================== 入力 ====================

    /// Resets all scanning state and stores a new input text.
    pub fn input(&mut self, input: impl Into<Arc<str>>) -> &mut Self {
        self.reset();
        self.input = input.into();
        self
    }

    /// Clears input, position, states, tags, pending tokens, open
    /// transactions and user data. Rules and options are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.input = Arc::from("");
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.eof = false;
        self.store = StateStore::new(self.options.initial_state.clone(), self.options.debug);
        self.pending.clear();
        self.transactions.clear();
        self.data.clear();
        self
    }

    /// Current position as `(byte offset, line, column)`.
    pub fn location(&self) -> Location {
        Location {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    // ==================== 状態とタグ ====================

    pub fn push(&mut self, state: impl Into<String>) -> &mut Self {
        self.store.push(state);
        self
    }

    pub fn pop(&mut self) -> LexResult<String> {
        self.store.pop()
    }

    pub fn state(&self) -> &str {
        self.store.current()
    }

    pub fn set_state(&mut self, state: impl Into<String>) -> &mut Self {
        self.store.set(state);
        self
    }

    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.store.tag(tag);
        self
    }

    pub fn untag(&mut self, tag: &str) -> &mut Self {
        self.store.untag(tag);
        self
    }

    pub fn tagged(&self, tag: &str) -> bool {
        self.store.tagged(tag)
    }

    // ==================== 診断 ====================

    /// Builds a parse error located at the current scanning position.
    pub fn error(&self, message: impl Into<String>) -> LexError {
        self.error_with(ParseErrorKind::Custom, message)
    }

    fn error_with(&self, kind: ParseErrorKind, message: impl Into<String>) -> LexError {
        ParseError::new(
            kind,
            message,
            self.pos,
            self.line,
            self.column,
            Arc::clone(&self.input),
        )
        .into()
    }
}

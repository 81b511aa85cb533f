//! アクションコンテキスト
//!
//! ルールのアクションに渡される、1回のマッチ専用のハンドル。
//! アクションはこれを通じて受理・却下・再試行・無視を宣言し、
//! 状態やタグを操作する。コンテキストはアクション呼び出しの間だけ有効。

use std::sync::Arc;

use indexmap::IndexMap;
use regex_automata::util::captures::Captures;
use serde_json::Value;

use super::state::StateStore;
use super::token::Token;
use crate::error::{LexError, LexResult, ParseError, ParseErrorKind};

/// マッチ開始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub pos: usize,
    pub line: usize,
    pub column: usize,
}

/// 現在のマッチの情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchInfo {
    pub pos: usize,
    pub line: usize,
    pub column: usize,
    /// マッチしたテキストのバイト長
    pub len: usize,
}

/// アクションの最終判定
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    Reject,
    Repeat,
    Ignore,
    Accept(Vec<Token>),
    Undecided,
}

pub struct ActionContext<'a> {
    captures: Captures,
    input: &'a Arc<str>,
    store: &'a mut StateStore,
    data: &'a mut IndexMap<String, Value>,
    location: Location,
    debug: bool,
    reject: bool,
    repeat: bool,
    ignore: bool,
    accepted: Vec<Token>,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        captures: Captures,
        input: &'a Arc<str>,
        store: &'a mut StateStore,
        data: &'a mut IndexMap<String, Value>,
        location: Location,
        debug: bool,
    ) -> Self {
        Self {
            captures,
            input,
            store,
            data,
            location,
            debug,
            reject: false,
            repeat: false,
            ignore: false,
            accepted: Vec::new(),
        }
    }

    // ==================== マッチ情報 ====================

    /// マッチしたテキスト全体
    pub fn text(&self) -> &str {
        self.group(0).unwrap_or_default()
    }

    /// n番目のキャプチャグループ
    pub fn group(&self, index: usize) -> Option<&str> {
        let span = self.captures.get_group(index)?;
        self.input.get(span.range())
    }

    /// 名前付きキャプチャグループ
    pub fn named(&self, name: &str) -> Option<&str> {
        let span = self.captures.get_group_by_name(name)?;
        self.input.get(span.range())
    }

    /// キャプチャの生の位置情報（入力先頭からのバイト範囲）
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn info(&self) -> MatchInfo {
        MatchInfo {
            pos: self.location.pos,
            line: self.location.line,
            column: self.location.column,
            len: self.text().len(),
        }
    }

    // ==================== ユーザーデータ ====================

    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 値を保存し、以前の値を返す
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
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

    // ==================== 判定 ====================

    /// 状態を変えたあと、最初のルールからやり直す
    pub fn repeat(&mut self) -> &mut Self {
        if self.debug {
            log::debug!("    REPEAT");
        }
        self.repeat = true;
        self
    }

    /// このルールを見送り、次のルールを試す
    pub fn reject(&mut self) -> &mut Self {
        if self.debug {
            log::debug!("    REJECT");
        }
        self.reject = true;
        self
    }

    /// マッチしたテキストを読み飛ばす
    pub fn ignore(&mut self) -> &mut Self {
        if self.debug {
            log::debug!("    IGNORE");
        }
        self.ignore = true;
        self
    }

    /// マッチしたテキストを値としてトークンを受理
    pub fn accept(&mut self, kind: impl Into<String>) -> &mut Self {
        let value = Value::String(self.text().to_owned());
        self.accept_value(kind, value)
    }

    /// 値を指定してトークンを受理
    pub fn accept_value(&mut self, kind: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let kind = kind.into();
        let value = value.into();
        let text = self.text().to_owned();
        if self.debug {
            log::debug!(
                "    ACCEPT: type: {}, value: {}, text: {:?}",
                kind,
                value,
                text
            );
        }
        self.accepted.push(Token::new(
            kind,
            value,
            text,
            self.location.pos,
            self.location.line,
            self.location.column,
        ));
        self
    }

    /// 現在位置の解析エラーを作成
    pub fn error(&self, message: impl Into<String>) -> LexError {
        ParseError::new(
            ParseErrorKind::Custom,
            message,
            self.location.pos,
            self.location.line,
            self.location.column,
            Arc::clone(self.input),
        )
        .into()
    }

    /// 判定を確定する（却下 > 再試行 > 無視 > 受理 の順）
    pub(crate) fn finish(self) -> Verdict {
        if self.reject {
            Verdict::Reject
        } else if self.repeat {
            Verdict::Repeat
        } else if self.ignore {
            Verdict::Ignore
        } else if !self.accepted.is_empty() {
            Verdict::Accept(self.accepted)
        } else {
            Verdict::Undecided
        }
    }
}

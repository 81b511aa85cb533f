//! 状態スタックとタグ集合

use indexmap::IndexSet;

use crate::error::{LexResult, UsageError};

/// 走査状態のスタックとタグ集合
///
/// スタックは決して空にならない。末尾が現在の状態。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    states: Vec<String>,
    tags: IndexSet<String>,
    debug: bool,
}

impl StateStore {
    pub fn new(initial: impl Into<String>, debug: bool) -> Self {
        Self {
            states: vec![initial.into()],
            tags: IndexSet::new(),
            debug,
        }
    }

    pub(crate) fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// 現在の状態
    pub fn current(&self) -> &str {
        // 初期状態はポップできないので常に存在する
        self.states.last().map(String::as_str).unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn push(&mut self, state: impl Into<String>) {
        let state = state.into();
        if self.debug {
            log::debug!(
                "    STATE (PUSH): old: <{}>, new: <{}>",
                self.current(),
                state
            );
        }
        self.states.push(state);
    }

    pub fn pop(&mut self) -> LexResult<String> {
        if self.states.len() < 2 {
            return Err(UsageError::NoMoreStates.into());
        }
        let old = self.states.pop().unwrap_or_default();
        if self.debug {
            log::debug!("    STATE (POP): old: <{}>, new: <{}>", old, self.current());
        }
        Ok(old)
    }

    /// 現在の状態を書き換える
    pub fn set(&mut self, state: impl Into<String>) {
        let state = state.into();
        if self.debug {
            log::debug!(
                "    STATE (SET): old: <{}>, new: <{}>",
                self.current(),
                state
            );
        }
        if let Some(top) = self.states.last_mut() {
            *top = state;
        }
    }

    pub fn tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if self.debug {
            log::debug!("    TAG (ADD): {}", tag);
        }
        self.tags.insert(tag);
    }

    pub fn untag(&mut self, tag: &str) {
        if self.debug {
            log::debug!("    TAG (DEL): {}", tag);
        }
        self.tags.shift_remove(tag);
    }

    pub fn tagged(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// ログ用の `#a #b` 表記
    pub(crate) fn describe_tags(&self) -> String {
        self.tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! パターンルールの定義と状態指定の解析

use std::fmt;

use regex_automata::meta::Regex;
use regex_automata::util::captures::Captures;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};

use super::context::ActionContext;
use crate::error::{ConfigError, LexResult};

/// すべての状態にマッチする状態名
pub const ANY_STATE: &str = "*";

/// ルールのアクション
pub type Action = Box<dyn FnMut(&mut ActionContext<'_>) -> anyhow::Result<()> + Send>;

/// 状態指定の1エントリ: 状態名と必要なタグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub state: String,
    pub tags: Vec<String>,
}

impl fmt::Display for StateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        for tag in &self.tags {
            write!(f, " #{}", tag)?;
        }
        Ok(())
    }
}

/// `"default, comment #foo #bar"` 形式の状態指定を解析
pub fn parse_state_spec(spec: &str) -> LexResult<Vec<StateEntry>> {
    spec.split(',')
        .map(|entry| {
            let (tags, states): (Vec<&str>, Vec<&str>) =
                entry.split_whitespace().partition(|item| item.starts_with('#'));

            if states.len() != 1 {
                return Err(ConfigError::InvalidStateSpec {
                    entry: entry.trim().to_owned(),
                }
                .into());
            }

            let tags = tags
                .into_iter()
                .map(|tag| {
                    let name = &tag[1..];
                    if name.is_empty() {
                        Err(ConfigError::EmptyTag {
                            entry: entry.trim().to_owned(),
                        }
                        .into())
                    } else {
                        Ok(name.to_owned())
                    }
                })
                .collect::<LexResult<Vec<_>>>()?;

            Ok(StateEntry {
                state: states[0].to_owned(),
                tags,
            })
        })
        .collect()
}

/// 正規表現パターンをコンパイル
pub fn compile_pattern(pattern: &str) -> LexResult<Regex> {
    compile_pattern_with(pattern, syntax::Config::new())
}

/// 構文オプション（大文字小文字の無視など）を指定してコンパイル
pub fn compile_pattern_with(pattern: &str, config: syntax::Config) -> LexResult<Regex> {
    Regex::builder().syntax(config).build(pattern).map_err(|e| {
        ConfigError::InvalidPattern {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        }
        .into()
    })
}

/// (適用条件, パターン, アクション) の三つ組
pub struct Rule {
    pub(super) states: Vec<StateEntry>,
    pub(super) source: String,
    pub(super) pattern: Regex,
    pub(super) action: Action,
}

impl Rule {
    pub fn new(
        states: Vec<StateEntry>,
        source: impl Into<String>,
        pattern: Regex,
        action: Action,
    ) -> Self {
        Self {
            states,
            source: source.into(),
            pattern,
            action,
        }
    }

    /// 現在の状態とタグでこのルールが使えるか
    ///
    /// `*` のエントリが優先され、なければ現在の状態名のエントリを見る。
    /// 選ばれたエントリのタグがすべて立っている必要がある。
    pub fn applies<F>(&self, current: &str, tagged: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let entry = self
            .states
            .iter()
            .find(|e| e.state == ANY_STATE)
            .or_else(|| self.states.iter().find(|e| e.state == current));

        match entry {
            Some(entry) => entry.tags.iter().all(|tag| tagged(tag.as_str())),
            None => false,
        }
    }

    /// `pos` ちょうどから始まるマッチを探す
    ///
    /// 検索は `pos` に固定されるので、マッチしない場合も残りの入力は走査しない。
    /// 範囲の外側の文字は `\b` などの判定にだけ使われる。
    pub fn match_at(&self, haystack: &str, pos: usize) -> Option<Captures> {
        let input = Input::new(haystack).range(pos..).anchored(Anchored::Yes);
        let mut captures = self.pattern.create_captures();
        self.pattern.search_captures(&input, &mut captures);
        captures.is_match().then_some(captures)
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// コンパイル前のパターン文字列
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn states(&self) -> &[StateEntry] {
        &self.states
    }

    pub(super) fn describe_states(&self) -> String {
        self.states
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("states", &self.states)
            .field("pattern", &self.source)
            .finish_non_exhaustive()
    }
}

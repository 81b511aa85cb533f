//! 字句解析器の設定
//!
//! 埋め込み側のアプリケーションが自前の設定ファイルから読み込めるように、
//! serdeでシリアライズ可能な純粋なデータ構造として定義する。

use serde::{Deserialize, Serialize};

/// 初期状態の既定名
pub const DEFAULT_STATE: &str = "default";

/// 既定のタブ幅
pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// 走査の各段階をログに出力する
    pub debug: bool,
    /// 状態スタックの底に置かれる状態名
    pub initial_state: String,
    /// 列番号計算でのタブストップ幅（0は1として扱う）
    pub tab_width: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            debug: false,
            initial_state: DEFAULT_STATE.to_owned(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl LexerOptions {
    pub(crate) fn effective_tab_width(&self) -> usize {
        self.tab_width.max(1)
    }
}

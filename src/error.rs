//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、字句解析器全体で使用される統一的なエラー型を提供します。
//! 位置情報を持つエラー（[`ParseError`]）は [`crate::diagnostic`] で
//! 人間向けのメッセージに整形できます。

use std::sync::Arc;

use thiserror::Error;

/// ruleflexの統一エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// ルール設定エラー
    #[error("ルール設定エラー: {0}")]
    Config(#[from] ConfigError),

    /// 位置情報付きの解析エラー（認識失敗・トークン不一致）
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// 呼び出し側の使い方の誤り
    #[error("操作エラー: {0}")]
    Usage(#[from] UsageError),

    /// アクションが結論を出さなかった
    #[error("パターン \"{pattern}\" のアクションはトークンを受理も無視もしませんでした")]
    Undecided { pattern: String },

    /// 空マッチを無視・受理したのに状態もタグも変わらなかった
    #[error("パターン \"{pattern}\" が空文字列にマッチしたまま位置が進みません")]
    EmptyMatch { pattern: String },

    /// アクション自身が返したエラー
    #[error("アクションが失敗しました: {message}")]
    Action { message: String },
}

/// ルール登録時のエラーの詳細
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("不正なパターン '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("状態指定 '{entry}' にはちょうど1つの状態名が必要です")]
    InvalidStateSpec { entry: String },

    #[error("状態指定 '{entry}' に空のタグがあります")]
    EmptyTag { entry: String },
}

/// 操作エラーの詳細
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("{operation} に必要なトークンが足りません")]
    NotEnoughTokens { operation: &'static str },

    #[error("{operation} できません: 有効なトランザクションがありません")]
    NoActiveTransaction { operation: &'static str },

    #[error("これ以上ポップできる状態がありません")]
    NoMoreStates,

    #[error("選択肢が1つも与えられていません")]
    NoAlternatives,
}

/// 解析エラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// どのルールも現在位置にマッチしなかった
    Unrecognized,
    /// `consume` で期待と異なるトークンが見つかった
    UnexpectedToken,
    /// 利用者が `error()` で作成したもの
    Custom,
}

/// 位置情報と元の入力を持つ解析エラー
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// 入力先頭からのバイトオフセット
    pub pos: usize,
    pub line: usize,
    pub column: usize,
    pub input: Arc<str>,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        pos: usize,
        line: usize,
        column: usize,
        input: Arc<str>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            pos,
            line,
            column,
            input,
        }
    }
}

impl LexError {
    /// 解析エラーであればその詳細を返す
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            LexError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Result型のエイリアス
pub type LexResult<T> = Result<T, LexError>;

/// エラー変換用のヘルパートレイト
pub trait IntoLexError {
    fn into_lex_error(self) -> LexError;
}

impl IntoLexError for anyhow::Error {
    fn into_lex_error(self) -> LexError {
        // アクション内で `?` により包まれた自前のエラーはそのまま戻す
        match self.downcast::<LexError>() {
            Ok(e) => e,
            Err(other) => LexError::Action {
                message: format!("{:#}", other),
            },
        }
    }
}

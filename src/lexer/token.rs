//! トークン型の定義

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// 入力終端を表すトークン種別
pub const EOF: &str = "EOF";

/// 位置情報付きトークン
///
/// `value` はアクションが自由に決められる値で、省略時はマッチしたテキストになる。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
    pub text: String,
    /// 入力先頭からのバイトオフセット
    pub pos: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: impl Into<String>,
        value: Value,
        text: impl Into<String>,
        pos: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind: kind.into(),
            value,
            text: text.into(),
            pos,
            line,
            column,
        }
    }

    /// 入力終端トークンを作成
    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self::new(EOF, Value::String(String::new()), "", pos, line, column)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }

    /// 種別（と、指定があれば値）が一致するか
    pub fn is_a(&self, kind: &str, value: Option<&Value>) -> bool {
        if self.kind != kind {
            return false;
        }
        value.map_or(true, |v| *v == self.value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<type: {}, value: {}, text: {:?}, pos: {}, line: {}, column: {}>",
            self.kind, self.value, self.text, self.pos, self.line, self.column
        )
    }
}

/// デバッグ用：トークン列をJSONとして出力
pub fn dump_tokens(tokens: &[Token]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tokens)
}

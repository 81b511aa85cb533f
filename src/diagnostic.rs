//! 診断メッセージの整形
//!
//! 解析エラーの位置の前後20文字を抜き出し、制御文字をエスケープして
//! キャレット付きで表示する。codespan-reportingの `Diagnostic` にも変換できる。

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::NoColor};

use crate::error::{ParseError, ParseErrorKind};

/// 抜き出し幅（文字数）
const CONTEXT_CHARS: usize = 20;

/// エラー位置周辺のテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// 前方が切り詰められているか
    pub prolog_truncated: bool,
    pub prolog: String,
    /// エラー位置の1文字
    pub token: String,
    pub epilog: String,
    /// 後方が切り詰められているか
    pub epilog_truncated: bool,
}

/// `pos`（バイトオフセット）周辺の抜粋を作成
pub fn excerpt(input: &str, pos: usize) -> Excerpt {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let at = input.get(..pos).map_or(len, |s| s.chars().count()).min(len);

    let begin = at.saturating_sub(CONTEXT_CHARS);
    let end = (at + CONTEXT_CHARS).min(len);
    let after = (at + 1).min(len);

    Excerpt {
        prolog_truncated: begin > 0,
        prolog: escape(&chars[begin..at]),
        token: escape(&chars[at..after]),
        epilog: escape(&chars[after..end.max(after)]),
        epilog_truncated: end < len,
    }
}

/// 制御文字と非ASCII文字をエスケープ
fn escape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    for &ch in chars {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{0C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{00}'..='\u{1F}' | '\u{80}'..='\u{FF}' => {
                out.push_str(&format!("\\x{:02X}", ch as u32));
            }
            '\u{100}'..='\u{FFFF}' => out.push_str(&format!("\\u{:04X}", ch as u32)),
            '\u{10000}'..=char::MAX => out.push_str(&format!("\\u{{{:X}}}", ch as u32)),
            _ => out.push(ch),
        }
    }
    out
}

/// 解析エラーを抜粋とキャレット付きの文字列に整形
pub fn render(error: &ParseError) -> String {
    let e = excerpt(&error.input, error.pos);
    let prefix = format!("line {} (column {}): ", error.line, error.column);
    let indent = " ".repeat(prefix.chars().count() + e.prolog.chars().count());
    format!(
        "解析エラー: {}\n{}{}{}{}\n{}^",
        error.message, prefix, e.prolog, e.token, e.epilog, indent
    )
}

impl ParseError {
    /// 人間向けの表示（抜粋とキャレット付き）
    pub fn render(&self) -> String {
        render(self)
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        // 文字境界でない位置は幅0のラベルにする
        let width = self
            .input
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let label = Label::primary(file_id, self.pos..self.pos + width);
        let label = match self.kind {
            ParseErrorKind::Unrecognized => label.with_message("ここに一致するルールがありません"),
            ParseErrorKind::UnexpectedToken => label.with_message("このトークンは期待されていません"),
            ParseErrorKind::Custom => label,
        };

        Diagnostic::error()
            .with_message(self.message.clone())
            .with_labels(vec![label])
    }
}

/// 診断を色なしの文字列として出力
pub fn emit_to_string(name: &str, error: &ParseError) -> anyhow::Result<String> {
    let mut files = SimpleFiles::new();
    let file_id = files.add(name.to_owned(), error.input.to_string());
    let diagnostic = error.to_diagnostic(file_id);

    let mut writer = NoColor::new(Vec::new());
    let config = term::Config::default();
    term::emit(&mut writer, &config, &files, &diagnostic)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

//! ルール照合ループ
//!
//! 現在の位置・状態・タグから、最初に適用可能でかつ現在位置にマッチするルールを
//! 探し、そのアクションの判定に従って位置を進める。

use super::context::{ActionContext, Location, Verdict};
use super::token::Token;
use super::Lexer;
use crate::diagnostic::excerpt;
use crate::error::{IntoLexError, LexError, LexResult, ParseErrorKind};

impl Lexer {
    /// 1つ以上のトークンが保留されるか、入力が尽きるまで走査する
    pub(super) fn tokenize(&mut self) -> LexResult<()> {
        if self.pos >= self.input.len() {
            if !self.eof {
                self.eof = true;
                self.pending
                    .push_back(Token::eof(self.pos, self.line, self.column));
            }
            return Ok(());
        }

        let debug = self.options.debug;

        'scan: loop {
            if debug {
                self.log_input();
            }

            for index in 0..self.rules.len() {
                let rule = &mut self.rules[index];
                if debug {
                    log::debug!(
                        "  RULE: state(s): <{}>, pattern: {}",
                        rule.describe_states(),
                        rule.source()
                    );
                }

                let store = &self.store;
                if !rule.applies(store.current(), |tag| store.tagged(tag)) {
                    continue;
                }

                let Some(captures) = rule.match_at(&self.input, self.pos) else {
                    continue;
                };
                let Some(end) = captures.get_match().map(|m| m.end()) else {
                    continue;
                };
                if debug {
                    log::debug!("    MATCHED: {:?}", &self.input[self.pos..end]);
                }

                // 空マッチで状態もタグも変わらなければ同じ位置で同じ判定が繰り返される
                let snapshot = (end == self.pos).then(|| self.store.clone());
                let location = Location {
                    pos: self.pos,
                    line: self.line,
                    column: self.column,
                };
                let mut ctx = ActionContext::new(
                    captures,
                    &self.input,
                    &mut self.store,
                    &mut self.data,
                    location,
                    debug,
                );
                let outcome = (rule.action)(&mut ctx);
                let verdict = ctx.finish();
                outcome.map_err(IntoLexError::into_lex_error)?;
                let stalled = snapshot.is_some_and(|before| before == self.store);

                match verdict {
                    Verdict::Ignore | Verdict::Accept(_) if stalled => {
                        return Err(LexError::EmptyMatch {
                            pattern: rule.source().to_owned(),
                        });
                    }
                    Verdict::Reject => continue,
                    Verdict::Repeat => continue 'scan,
                    Verdict::Ignore => {
                        self.progress(end);
                        if self.pos >= self.input.len() {
                            return Ok(());
                        }
                        continue 'scan;
                    }
                    Verdict::Accept(tokens) => {
                        self.pending.extend(tokens);
                        self.progress(end);
                        return Ok(());
                    }
                    Verdict::Undecided => {
                        return Err(LexError::Undecided {
                            pattern: rule.source().to_owned(),
                        });
                    }
                }
            }

            return Err(self.error_with(ParseErrorKind::Unrecognized, "認識できないトークン"));
        }
    }

    /// `pos` から `until` までを消費し、行と列を更新する
    fn progress(&mut self, until: usize) {
        let (line, column) = (self.line, self.column);
        let width = self.options.effective_tab_width();

        for ch in self.input[self.pos..until].chars() {
            match ch {
                '\r' => self.column = 1,
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                '\t' => self.column = ((self.column - 1) / width + 1) * width + 1,
                _ => self.column += 1,
            }
        }

        if self.options.debug {
            log::debug!(
                "    PROGRESS: characters: {}, from: <line {}, column {}>, to: <line {}, column {}>",
                self.input[self.pos..until].chars().count(),
                line,
                column,
                self.line,
                self.column
            );
        }
        self.pos = until;
    }

    fn log_input(&self) {
        let e = excerpt(&self.input, self.pos);
        log::debug!(
            "INPUT: state: <{}>, tags: <{}>, text: {}{}<{}>{}{}, at: <line {}, column {}>",
            self.store.current(),
            self.store.describe_tags(),
            if e.prolog_truncated { "..." } else { "\"" },
            e.prolog,
            e.token,
            e.epilog,
            if e.epilog_truncated { "..." } else { "\"" },
            self.line,
            self.column
        );
    }
}

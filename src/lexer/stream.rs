//! トークンストリーム操作: token / tokens / peek / skip / consume

use serde_json::Value;

use super::token::Token;
use super::Lexer;
use crate::error::{LexResult, ParseError, ParseErrorKind, UsageError};

impl Lexer {
    /// 保留中のトークンが `count` 個になるか、EOFが出るまで走査する
    fn fill(&mut self, count: usize) -> LexResult<()> {
        while self.pending.len() < count && !self.eof {
            self.tokenize()?;
        }
        Ok(())
    }

    /// 次のトークンを取得
    ///
    /// EOFトークンを返したあとは `None`。トランザクション中であれば、
    /// 返したトークンは最も内側のトランザクションに記録される。
    pub fn token(&mut self) -> LexResult<Option<Token>> {
        self.fill(1)?;

        let Some(token) = self.pending.pop_front() else {
            return Ok(None);
        };
        if let Some(buffer) = self.transactions.last_mut() {
            buffer.push(token.clone());
        }
        if self.options.debug {
            log::debug!("TOKEN: {}", token);
        }
        Ok(Some(token))
    }

    /// すべてのトークンを収集（最後は必ずEOF）
    pub fn tokens(&mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// `offset` 番目の先読みトークンを消費せずに参照する
    pub fn peek(&mut self, offset: usize) -> LexResult<&Token> {
        self.fill(offset + 1)?;

        let token = self
            .pending
            .get(offset)
            .ok_or(UsageError::NotEnoughTokens { operation: "peek" })?;
        if self.options.debug {
            log::debug!("PEEK: {}", token);
        }
        Ok(token)
    }

    /// `count` 個のトークンを読み捨てる
    pub fn skip(&mut self, count: usize) -> LexResult<()> {
        self.fill(count)?;
        if self.pending.len() < count {
            return Err(UsageError::NotEnoughTokens { operation: "skip" }.into());
        }
        for _ in 0..count {
            self.token()?;
        }
        Ok(())
    }

    /// 指定した種別のトークンを1つ消費する
    pub fn consume(&mut self, kind: &str) -> LexResult<Token> {
        self.expect(kind, None)
    }

    /// 指定した種別と値のトークンを1つ消費する
    pub fn consume_value(&mut self, kind: &str, value: impl Into<Value>) -> LexResult<Token> {
        self.expect(kind, Some(value.into()))
    }

    fn expect(&mut self, kind: &str, value: Option<Value>) -> LexResult<Token> {
        let token = self
            .token()?
            .ok_or(UsageError::NotEnoughTokens {
                operation: "consume",
            })?;
        if self.options.debug {
            log::debug!("CONSUME: {}", token);
        }

        if token.is_a(kind, value.as_ref()) {
            return Ok(token);
        }

        let expected = match &value {
            Some(v) => format!("<type: {}, value: {}>", kind, v),
            None => format!("<type: {}, value: *>", kind),
        };
        let found = format!("<type: {}, value: {}>", token.kind, token.value);
        Err(ParseError::new(
            ParseErrorKind::UnexpectedToken,
            format!("{}を期待しましたが、{}が見つかりました", expected, found),
            token.pos,
            token.line,
            token.column,
            self.input.clone(),
        )
        .into())
    }
}

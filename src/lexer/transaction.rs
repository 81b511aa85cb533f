//! トランザクションと選択肢
//!
//! トランザクション中に `token()` が返したトークンはバッファに記録され、
//! ロールバックすると元の順序のまま保留キューの先頭に戻される。
//! これがバックトラッキングの基本操作になる。

use super::Lexer;
use crate::error::{LexError, LexResult, UsageError};

/// `alternatives` に渡す選択肢の型
pub type Alternative<'a, T> = Box<dyn FnOnce(&mut Lexer) -> LexResult<T> + 'a>;

impl Lexer {
    /// トランザクションを開始
    pub fn begin(&mut self) -> &mut Self {
        if self.options.debug {
            log::debug!("BEGIN: level {}", self.transactions.len());
        }
        self.transactions.push(Vec::new());
        self
    }

    /// 最も内側のトランザクションで消費したトークン数
    pub fn depth(&self) -> LexResult<usize> {
        self.transactions
            .last()
            .map(Vec::len)
            .ok_or_else(|| UsageError::NoActiveTransaction { operation: "depth" }.into())
    }

    /// トランザクションを確定し、記録したトークンを破棄する
    ///
    /// 外側のトランザクションには引き継がないため、外側の `depth()` は
    /// 内側で消費したトークンを数えない。
    pub fn commit(&mut self) -> LexResult<&mut Self> {
        self.transactions
            .pop()
            .ok_or(UsageError::NoActiveTransaction { operation: "commit" })?;
        if self.options.debug {
            log::debug!("COMMIT: level {}", self.transactions.len());
        }
        Ok(self)
    }

    /// トランザクションを取り消し、消費したトークンを戻す
    pub fn rollback(&mut self) -> LexResult<&mut Self> {
        let buffer = self
            .transactions
            .pop()
            .ok_or(UsageError::NoActiveTransaction {
                operation: "rollback",
            })?;
        for token in buffer.into_iter().rev() {
            self.pending.push_front(token);
        }
        if self.options.debug {
            log::debug!("ROLLBACK: level {}", self.transactions.len());
        }
        Ok(self)
    }

    /// 選択肢を順に試し、最初に成功したものの結果を返す
    ///
    /// すべて失敗した場合は、失敗時点の消費トークン数が最も少なかった
    /// 選択肢のエラーを返す（同数なら先に試したもの）。
    pub fn alternatives<T, I, F>(&mut self, alternatives: I) -> LexResult<T>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(&mut Lexer) -> LexResult<T>,
    {
        let level = self.transactions.len();
        let mut failure: Option<(usize, LexError)> = None;

        for (index, alternative) in alternatives.into_iter().enumerate() {
            self.begin();
            match alternative(&mut *self) {
                Ok(result) => {
                    // 選択肢の中で閉じられなかったトランザクションも確定する
                    while self.transactions.len() > level + 1 {
                        self.commit()?;
                    }
                    self.commit()?;
                    return Ok(result);
                }
                Err(err) => {
                    while self.transactions.len() > level + 1 {
                        self.rollback()?;
                    }
                    let depth = self.depth()?;
                    self.rollback()?;
                    if self.options.debug {
                        log::debug!("ALTERNATIVE {} FAILED at depth {}: {}", index, depth, err);
                    }
                    if failure.as_ref().map_or(true, |(best, _)| depth < *best) {
                        failure = Some((depth, err));
                    }
                }
            }
        }

        Err(failure.map_or_else(|| UsageError::NoAlternatives.into(), |(_, err)| err))
    }
}

//! テスト共通のヘルパー

#![allow(dead_code)]

use ruleflex::Lexer;

/// `RUST_LOG=debug` でテスト中の走査ログを表示できるようにする
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 英字・数字・空白だけを扱う簡単なレキサー
pub fn symbols_and_numbers() -> Lexer {
    init_logger();
    let mut lexer = Lexer::new();
    lexer
        .rule("default", r"[a-zA-Z]+", |ctx| {
            ctx.accept("symbol");
            Ok(())
        })
        .unwrap()
        .rule("default", r"[0-9]+", |ctx| {
            let n: i64 = ctx.text().parse()?;
            ctx.accept_value("number", n);
            Ok(())
        })
        .unwrap()
        .rule("default", r"[ \t\r\n]+", |ctx| {
            ctx.ignore();
            Ok(())
        })
        .unwrap();
    lexer
}

//! レキサーテスト
//!
//! ルール照合、状態とタグ、行・列の追跡、EOFの扱いを網羅する。

mod common;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use ruleflex::{LexError, Lexer, ParseErrorKind, SyntaxConfig, Token};
    use serde_json::json;
    use test_case::test_case;

    use super::common::{init_logger, symbols_and_numbers};

    /// 文字列・コメントを含む設定例
    fn configured() -> Lexer {
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
            .rule("default", r#""((?:\\"|[^\r\n]+)+)""#, |ctx| {
                let body = ctx.group(1).unwrap_or_default().replace("\\\"", "\"");
                ctx.accept_value("string", body);
                Ok(())
            })
            .unwrap()
            .rule("default", r"/\*", |ctx| {
                ctx.push("comment").tag("bar").ignore();
                Ok(())
            })
            .unwrap()
            .rule("comment #foo #bar", r"\*/", |_ctx| {
                anyhow::bail!("should never enter")
            })
            .unwrap()
            .rule("comment #bar", r"\*/", |ctx| {
                ctx.untag("bar");
                ctx.pop()?;
                ctx.ignore();
                Ok(())
            })
            .unwrap()
            .rule("comment #bar", r".", |ctx| {
                ctx.ignore();
                Ok(())
            })
            .unwrap()
            .rule("default", r"\s*,\s*", |ctx| {
                ctx.ignore();
                Ok(())
            })
            .unwrap();
        lexer
    }

    #[test]
    fn test_full_configuration() {
        let mut lexer = configured();
        lexer.debug(true);
        lexer.input("foo42,\n \"bar baz\",\n quux/* */");
        let tokens = lexer.tokens().unwrap();

        let expected = vec![
            Token::new("symbol", json!("foo"), "foo", 0, 1, 1),
            Token::new("number", json!(42), "42", 3, 1, 4),
            Token::new("string", json!("bar baz"), "\"bar baz\"", 8, 2, 2),
            Token::new("symbol", json!("quux"), "quux", 20, 3, 2),
            Token::eof(29, 3, 11),
        ];
        assert_eq!(tokens, expected);
        assert_eq!(lexer.state(), "default");
        assert!(!lexer.tagged("bar"));
    }

    #[test]
    fn test_symbol_then_number() {
        let mut lexer = symbols_and_numbers();
        lexer.input("foo42");
        let tokens = lexer.tokens().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("symbol", json!("foo"), "foo", 0, 1, 1),
                Token::new("number", json!(42), "42", 3, 1, 4),
                Token::eof(5, 1, 6),
            ]
        );
    }

    #[test]
    fn test_no_rule_matches() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer.input("hello");
        let err = lexer.tokens().unwrap_err();
        match err {
            LexError::Parse(e) => {
                assert_eq!(e.kind, ParseErrorKind::Unrecognized);
                assert_eq!((e.pos, e.line, e.column), (0, 1, 1));
                assert_eq!(&*e.input, "hello");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_after_progress_reports_position() {
        let mut lexer = symbols_and_numbers();
        lexer.input("ab\n  12 ?");
        assert_eq!(lexer.token().unwrap().unwrap().text, "ab");
        assert_eq!(lexer.token().unwrap().unwrap().text, "12");
        let err = lexer.token().unwrap_err();
        let e = err.as_parse_error().unwrap();
        assert_eq!((e.pos, e.line, e.column), (8, 2, 6));
    }

    #[test_case("" ; "empty input")]
    #[test_case("abc" ; "single token")]
    #[test_case("a 1 b 2   " ; "trailing whitespace")]
    #[test_case("\n\n" ; "only ignored text")]
    fn test_exactly_one_eof(input: &str) {
        let mut lexer = symbols_and_numbers();
        lexer.input(input);
        let tokens = lexer.tokens().unwrap();
        assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
        assert!(tokens.last().unwrap().is_eof());
        assert_eq!(tokens.last().unwrap().pos, input.len());
        assert_eq!(lexer.token().unwrap(), None);
    }

    #[test]
    fn test_deterministic() {
        let mut lexer = configured();
        let input = "a1, \"x\" /* c */ b";
        lexer.input(input);
        let first = lexer.tokens().unwrap();
        lexer.input(input);
        let second = lexer.tokens().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_consumed_length_equals_input_length() {
        init_logger();
        let consumed = Arc::new(AtomicUsize::new(0));
        let mut lexer = Lexer::new();
        let counter = Arc::clone(&consumed);
        lexer
            .rule_any(r"[a-z]+", move |ctx| {
                counter.fetch_add(ctx.info().len, Ordering::SeqCst);
                ctx.accept("word");
                Ok(())
            })
            .unwrap();
        let counter = Arc::clone(&consumed);
        lexer
            .rule_any(r"[^a-z]+", move |ctx| {
                counter.fetch_add(ctx.info().len, Ordering::SeqCst);
                ctx.ignore();
                Ok(())
            })
            .unwrap();

        let input = "one, two;\tthree\n four ";
        lexer.input(input);
        let tokens = lexer.tokens().unwrap();
        assert_eq!(consumed.load(Ordering::SeqCst), input.len());
        assert_eq!(tokens.last().unwrap().pos, input.len());
    }

    #[test]
    fn test_tag_gates_rule() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer
            .rule("default", r"\[", |ctx| {
                ctx.push("inner").ignore();
                Ok(())
            })
            .unwrap()
            .rule("inner #bar", r"[a-z]", |ctx| {
                ctx.accept("tagged");
                Ok(())
            })
            .unwrap()
            .rule("inner", r"[a-z]", |ctx| {
                ctx.tag("bar").accept("plain");
                Ok(())
            })
            .unwrap();
        lexer.input("[ab");
        let kinds: Vec<String> = lexer
            .tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(kinds, vec!["plain", "tagged", "EOF"]);
    }

    #[test]
    fn test_tag_then_repeat() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer
            .rule("default #on", r"x", |ctx| {
                ctx.accept("on");
                Ok(())
            })
            .unwrap()
            .rule("default", r"x", |ctx| {
                ctx.tag("on").repeat();
                Ok(())
            })
            .unwrap();
        lexer.input("xx");
        let kinds: Vec<String> = lexer
            .tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(kinds, vec!["on", "on", "EOF"]);
    }

    #[test]
    fn test_multiple_states_in_one_rule() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer
            .rule("default", r"\(", |ctx| {
                ctx.push("paren").accept("open");
                Ok(())
            })
            .unwrap()
            .rule("paren", r"\)", |ctx| {
                ctx.pop()?;
                ctx.accept("close");
                Ok(())
            })
            .unwrap()
            .rule("default, paren", r"[a-z]+", |ctx| {
                let kind = if ctx.state() == "paren" { "inner" } else { "outer" };
                ctx.accept(kind);
                Ok(())
            })
            .unwrap();
        lexer.input("a(b)c");
        let kinds: Vec<String> = lexer
            .tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(kinds, vec!["outer", "open", "inner", "close", "outer", "EOF"]);
    }

    #[test]
    fn test_case_insensitive_regex_rule() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer
            .rule_with_syntax("*", "select", SyntaxConfig::new().case_insensitive(true), |ctx| {
                ctx.accept_value("keyword", ctx.text().to_lowercase());
                Ok(())
            })
            .unwrap();
        lexer.input("SeLeCt");
        let token = lexer.token().unwrap().unwrap();
        assert_eq!(token.value, json!("select"));
        assert_eq!(token.text, "SeLeCt");
    }

    #[test]
    fn test_user_data_survives_between_matches() {
        init_logger();
        let mut lexer = Lexer::new();
        lexer
            .rule_any(r"\(", |ctx| {
                let depth = ctx.data("depth").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
                ctx.set_data("depth", depth);
                ctx.accept_value("open", depth);
                Ok(())
            })
            .unwrap();
        lexer.input("(((");
        let values: Vec<_> = lexer
            .tokens()
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_eof())
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }
}

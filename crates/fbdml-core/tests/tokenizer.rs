//! Tests for the public lexer API.

use fbdml_core::lexer::{Channel, CharStream, Lookahead};
use fbdml_core::{Keyword, Lexer, Span, TokenKind};

fn kinds(sql: &str) -> Vec<TokenKind> {
    Lexer::new(sql).tokenize().into_iter().map(|t| t.kind).collect()
}

#[test]
fn quoted_identifier_decodes_doubled_quotes() {
    let sql = r#""He said ""hi""""#;
    let tokens = Lexer::new(sql).tokenize();
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[0].kind,
        TokenKind::QuotedIdentifier(String::from(r#"He said "hi""#))
    );
    assert_eq!(tokens[0].span, Span::new(0, sql.len()));
}

#[test]
fn keywords_ignore_case_identifiers_keep_it() {
    let sql = "insert INTO InSeRt MyTable";
    let tokens = Lexer::new(sql).tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Insert));
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Into));
    assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::Insert));
    assert_eq!(tokens[3].kind, TokenKind::Identifier(String::from("MyTable")));
    assert_eq!(tokens[2].text(sql), "InSeRt");
}

#[test]
fn maximal_munch_prefers_longer_identifier() {
    assert_eq!(
        kinds("RETURNING RETURNING_ID"),
        vec![
            TokenKind::Keyword(Keyword::Returning),
            TokenKind::Identifier(String::from("RETURNING_ID")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn hidden_tokens_are_kept_by_tokenize_all() {
    let tokens = Lexer::new("DELETE -- x\nFROM /* y */ T").tokenize_all();
    let hidden: Vec<_> = tokens
        .iter()
        .filter(|t| t.channel == Channel::Hidden)
        .map(|t| t.kind.clone())
        .collect();
    assert_eq!(
        hidden,
        vec![
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::Whitespace,
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::Whitespace,
        ]
    );
}

#[test]
fn lexer_keeps_going_after_errors() {
    let mut lexer = Lexer::new("a # b & c");
    let tokens = lexer.tokenize();
    assert_eq!(tokens.iter().filter(|t| t.is_error()).count(), 2);
    assert_eq!(lexer.diagnostics().mismatch_count(), 2);
    assert!(tokens.last().is_some_and(|t| t.is_eof()));
}

#[test]
fn char_stream_rewinds() {
    let mut stream = CharStream::new("''x");
    assert!(stream.speculate(|s| s.match_str("''")));
    assert_eq!(stream.la(1), Lookahead::Char('x'));
    assert_eq!(stream.la(-1), Lookahead::Char('\''));
    assert!(!stream.speculate(|s| {
        s.consume();
        false
    }));
    assert_eq!(stream.index(), 2);
}

//! DML parser implementation.

use tracing::{debug, trace};

use super::error::ParseError;
use super::pratt::{COLLATE_BINDING_POWER, infix_binding_power, prefix_binding_power};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::model::{ParsedStatement, StatementModel, StatementType};

/// Deepest nesting of values the parser follows before giving up.
pub const MAX_DEPTH: usize = 256;

/// DML statement parser.
///
/// The parser walks the statement once and fills a [`StatementModel`] as
/// rules match. It recovers from a single stray or missing token the way
/// a generated recognizer would; anything worse is recorded as a syntax
/// diagnostic and the rest of the statement is skipped.
pub struct Parser<'a> {
    source: &'a str,
    /// Default-channel tokens without lexical errors. Always ends with EOF.
    tokens: Vec<Token>,
    pos: usize,
    model: StatementModel,
    diagnostics: Diagnostics,
    /// Number of enclosing speculative attempts.
    speculating: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let tokens = lexer
            .tokenize()
            .into_iter()
            .filter(|token| !token.is_error())
            .collect();
        Self {
            source: input,
            tokens,
            pos: 0,
            model: StatementModel::new(),
            diagnostics: lexer.into_diagnostics(),
            speculating: 0,
            depth: 0,
        }
    }

    /// Parses a single DML statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is empty, is not an INSERT,
    /// UPDATE or DELETE statement, or nests values deeper than
    /// [`MAX_DEPTH`]. Other problems are reported through the diagnostics
    /// of the returned statement.
    pub fn parse_statement(mut self) -> Result<ParsedStatement, ParseError> {
        let first = self.current().clone();
        let result = match first.kind {
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert_statement(),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete_statement(),
            TokenKind::Keyword(Keyword::Update) if self.check_keyword_at(1, Keyword::Or) => {
                self.parse_update_or_insert_statement()
            }
            TokenKind::Keyword(Keyword::Update) => self.parse_update_statement(),
            TokenKind::Eof => return Err(ParseError::Empty),
            found => {
                return Err(ParseError::Unsupported {
                    found,
                    span: first.span,
                });
            }
        };

        match result.and_then(|()| self.parse_statement_end()) {
            Ok(()) => {}
            Err(ParseError::Syntax { message, span }) => {
                debug!(%message, start = span.start, "syntax error, skipping to end of statement");
                self.diagnostics.record(DiagnosticKind::Syntax, message, span);
                self.synchronize();
            }
            Err(err) => return Err(err),
        }

        debug!(
            statement_type = ?self.model.statement_type(),
            mismatches = self.diagnostics.mismatch_count(),
            "parsed statement"
        );
        Ok(ParsedStatement {
            model: self.model,
            diagnostics: self.diagnostics,
        })
    }

    /// Parses `';'? EOF`.
    fn parse_statement_end(&mut self) -> Result<(), ParseError> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if self.current().is_eof() {
            Ok(())
        } else {
            Err(self.unexpected("end of statement"))
        }
    }

    /// Skips to the next `;` or the end of input.
    fn synchronize(&mut self) {
        while !self.current().is_eof() && !self.check(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    // Statements

    /// Parses `INSERT INTO table [columns] (VALUES ... | SELECT ... | DEFAULT VALUES) [RETURNING ...]`.
    fn parse_insert_statement(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        self.parse_table_name()?;

        if self.check(&TokenKind::LeftParen) {
            self.parse_insert_columns()?;
        }

        if self.check_keyword(Keyword::Values) {
            self.parse_insert_values()?;
        } else if self.check_keyword(Keyword::Select) {
            self.advance();
            self.skip_to_returning();
        } else if self.check_keyword(Keyword::Default) {
            self.parse_default_values_clause()?;
        } else {
            return Err(self.unexpected("VALUES, SELECT, or DEFAULT VALUES"));
        }

        if self.check_keyword(Keyword::Returning) {
            self.parse_returning_clause()?;
        }

        self.set_statement_type(StatementType::Insert);
        Ok(())
    }

    /// Parses `DELETE FROM table ... [RETURNING ...]`.
    fn parse_delete_statement(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        self.parse_table_name()?;
        self.skip_to_returning();

        if self.check_keyword(Keyword::Returning) {
            self.parse_returning_clause()?;
        }

        self.set_statement_type(StatementType::Delete);
        Ok(())
    }

    /// Parses `UPDATE table SET assignments ... [RETURNING ...]`.
    fn parse_update_statement(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Update)?;
        self.parse_table_name()?;
        self.expect_keyword(Keyword::Set)?;
        self.parse_assignments()?;
        self.skip_to_returning();

        if self.check_keyword(Keyword::Returning) {
            self.parse_returning_clause()?;
        }

        self.set_statement_type(StatementType::Update);
        Ok(())
    }

    /// Parses `UPDATE OR INSERT INTO table [columns] VALUES (...) [MATCHING ...] [RETURNING ...]`.
    fn parse_update_or_insert_statement(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Update)?;
        self.expect_keyword(Keyword::Or)?;
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        self.parse_table_name()?;

        if self.check(&TokenKind::LeftParen) {
            self.parse_insert_columns()?;
        }
        self.parse_insert_values()?;

        if self.check_keyword(Keyword::Matching) {
            self.parse_matching_clause()?;
        }
        if self.check_keyword(Keyword::Returning) {
            self.parse_returning_clause()?;
        }

        self.set_statement_type(StatementType::UpdateOrInsert);
        Ok(())
    }

    // Clauses

    fn parse_assignments(&mut self) -> Result<(), ParseError> {
        loop {
            self.parse_assignment()?;
            if !self.check(&TokenKind::Comma) {
                return Ok(());
            }
            self.advance();
        }
    }

    /// Parses `column = value`.
    fn parse_assignment(&mut self) -> Result<(), ParseError> {
        let column = self.parse_column_name()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_captured_value()?;
        self.with_model(|model| {
            model.add_column(column);
            model.add_value(value);
        });
        Ok(())
    }

    /// Parses `( column, ... )`, recording each column.
    fn parse_insert_columns(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        for column in self.parse_column_list()? {
            self.with_model(|model| model.add_column(column));
        }
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `VALUES ( value, ... )`, recording the text of each value.
    fn parse_insert_values(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Values)?;
        self.expect(&TokenKind::LeftParen)?;
        loop {
            let value = self.parse_captured_value()?;
            self.with_model(|model| model.add_value(value));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)
    }

    fn parse_default_values_clause(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Default)?;
        self.expect_keyword(Keyword::Values)?;
        self.with_model(StatementModel::set_default_values);
        Ok(())
    }

    /// Parses `MATCHING (columns)` or `MATCHING columns`. The columns are not recorded.
    fn parse_matching_clause(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Matching)?;
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            self.parse_column_list()?;
            self.expect(&TokenKind::RightParen)
        } else {
            self.parse_column_list().map(drop)
        }
    }

    /// Parses `RETURNING item, ...` where an item is `*` or a column with an
    /// optional alias.
    fn parse_returning_clause(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Returning)?;
        loop {
            let column = if self.check(&TokenKind::Star) {
                self.advance();
                String::from("*")
            } else {
                let column = self.parse_column_name()?;
                if self.check_keyword(Keyword::As) {
                    self.advance();
                    self.parse_simple_identifier()?;
                } else if self.is_identifier() {
                    self.parse_simple_identifier()?;
                }
                column
            };
            self.with_model(|model| model.add_returning_column(column));

            if !self.check(&TokenKind::Comma) {
                return Ok(());
            }
            self.advance();
        }
    }

    /// Skips tokens up to a RETURNING, `;` or EOF outside any parentheses.
    fn skip_to_returning(&mut self) {
        let mut depth = 0_usize;
        loop {
            match &self.current().kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon | TokenKind::Keyword(Keyword::Returning) if depth == 0 => {
                    return;
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    // Names

    fn parse_table_name(&mut self) -> Result<(), ParseError> {
        let span = self.parse_simple_identifier()?;
        let name = span.slice(self.source);
        self.with_model(|model| model.set_table_name(name));
        Ok(())
    }

    /// Parses `column, ...` and returns the source text of each column.
    fn parse_column_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut columns = vec![self.parse_column_name()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            columns.push(self.parse_column_name()?);
        }
        Ok(columns)
    }

    /// Parses `name` or `qualifier.name` and returns its source text.
    fn parse_column_name(&mut self) -> Result<String, ParseError> {
        let mut span = self.parse_simple_identifier()?;
        if self.check(&TokenKind::Dot) && self.is_identifier_at(1) {
            self.advance();
            span = span.merge(self.parse_simple_identifier()?);
        }
        Ok(span.slice(self.source).to_owned())
    }

    /// Parses an unquoted or quoted identifier and returns its span.
    fn parse_simple_identifier(&mut self) -> Result<Span, ParseError> {
        if self.is_identifier() {
            let span = self.current().span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    // Values

    /// Parses a value and returns its source text.
    fn parse_captured_value(&mut self) -> Result<String, ParseError> {
        let start = self.current().span.start;
        self.parse_value()?;
        let end = self.previous().span.end.max(start);
        Ok(Span::new(start, end).slice(self.source).to_owned())
    }

    fn parse_value(&mut self) -> Result<(), ParseError> {
        self.parse_value_bp(0)
    }

    fn parse_value_bp(&mut self, min_bp: u8) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = self.parse_value_inner(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_value_inner(&mut self, min_bp: u8) -> Result<(), ParseError> {
        self.parse_prefix()?;

        loop {
            if self.check_keyword(Keyword::Collate) {
                if COLLATE_BINDING_POWER < min_bp {
                    break;
                }
                self.advance();
                self.parse_simple_identifier()?;
                continue;
            }

            // `a -1` lexes the minus into the literal; read it as a subtraction.
            if self.is_negative_number() {
                let Some((l_bp, r_bp)) = infix_binding_power(&TokenKind::Minus) else {
                    break;
                };
                if l_bp < min_bp {
                    break;
                }
                self.parse_value_bp(r_bp)?;
                continue;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(&self.current().kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            self.parse_value_bp(r_bp)?;
        }

        Ok(())
    }

    fn parse_prefix(&mut self) -> Result<(), ParseError> {
        if let Some(bp) = prefix_binding_power(&self.current().kind) {
            self.advance();
            return self.parse_value_bp(bp);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<(), ParseError> {
        match &self.current().kind {
            TokenKind::Integer
            | TokenKind::Real
            | TokenKind::String(_)
            | TokenKind::Question
            | TokenKind::Keyword(
                Keyword::Null
                | Keyword::DbKey
                | Keyword::CurrentUser
                | Keyword::CurrentRole
                | Keyword::CurrentDate
                | Keyword::CurrentTime
                | Keyword::CurrentTimestamp,
            ) => {
                self.advance();
                Ok(())
            }
            TokenKind::LeftParen => {
                self.advance();
                self.parse_value()?;
                self.expect(&TokenKind::RightParen)
            }
            TokenKind::Keyword(Keyword::Substring) => self.parse_substring_function(),
            TokenKind::Keyword(Keyword::Trim) => self.parse_trim_function(),
            TokenKind::Keyword(Keyword::Extract) => self.parse_extract_function(),
            TokenKind::Keyword(
                Keyword::Sum | Keyword::Count | Keyword::Avg | Keyword::Minimum | Keyword::Maximum,
            ) => self.parse_aggregate_function(),
            TokenKind::Keyword(Keyword::Next) => self.parse_next_value_expression(),
            TokenKind::Keyword(Keyword::GenId) => self.parse_gen_id(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                self.parse_identifier_value()
            }
            _ => Err(self.unexpected("value")),
        }
    }

    /// Parses a value starting with an identifier: a function call, an array
    /// element, a DB_KEY reference or a plain column.
    fn parse_identifier_value(&mut self) -> Result<(), ParseError> {
        self.parse_simple_identifier()?;

        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if !self.check(&TokenKind::RightParen) {
                self.parse_value_list()?;
            }
            return self.expect(&TokenKind::RightParen);
        }

        if self.check(&TokenKind::LeftBracket) {
            self.advance();
            self.parse_value_list()?;
            return self.expect(&TokenKind::RightBracket);
        }

        if self.check(&TokenKind::Dot) {
            if self.check_keyword_at(1, Keyword::DbKey) {
                self.advance();
                self.advance();
            } else if self.is_identifier_at(1) {
                self.advance();
                self.parse_simple_identifier()?;
            }
        }
        Ok(())
    }

    fn parse_value_list(&mut self) -> Result<(), ParseError> {
        self.parse_value()?;
        while self.check(&TokenKind::Comma) {
            self.advance();
            self.parse_value()?;
        }
        Ok(())
    }

    /// Parses `SUBSTRING(value FROM value [FOR value])`.
    fn parse_substring_function(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Substring)?;
        self.expect(&TokenKind::LeftParen)?;
        self.parse_value()?;
        self.expect_keyword(Keyword::From)?;
        self.parse_value()?;
        if self.check_keyword(Keyword::For) {
            self.advance();
            self.parse_value()?;
        }
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `TRIM([BOTH | LEADING | TRAILING] value [FROM value])`.
    fn parse_trim_function(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Trim)?;
        self.expect(&TokenKind::LeftParen)?;
        if matches!(
            self.current().as_keyword(),
            Some(Keyword::Both | Keyword::Leading | Keyword::Trailing)
        ) {
            self.advance();
        }
        self.parse_value()?;
        if self.check_keyword(Keyword::From) {
            self.advance();
            self.parse_value()?;
        }
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `EXTRACT(part FROM value)`.
    fn parse_extract_function(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Extract)?;
        self.expect(&TokenKind::LeftParen)?;
        self.parse_value()?;
        self.expect_keyword(Keyword::From)?;
        self.parse_value()?;
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `SUM`, `COUNT`, `AVG`, `MIN` or `MAX` over `[ALL | DISTINCT] value`.
    fn parse_aggregate_function(&mut self) -> Result<(), ParseError> {
        let is_count = self.check_keyword(Keyword::Count);
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        if is_count && self.check(&TokenKind::Star) {
            self.advance();
        } else {
            if matches!(
                self.current().as_keyword(),
                Some(Keyword::All | Keyword::Distinct)
            ) {
                self.advance();
            }
            self.parse_value()?;
        }
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `NEXT VALUE FOR sequence`.
    fn parse_next_value_expression(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Next)?;
        self.expect_keyword(Keyword::Value)?;
        self.expect_keyword(Keyword::For)?;
        self.parse_simple_identifier().map(drop)
    }

    /// Parses `GEN_ID(generator, increment)`.
    fn parse_gen_id(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::GenId)?;
        self.expect(&TokenKind::LeftParen)?;
        self.parse_simple_identifier()?;
        self.expect(&TokenKind::Comma)?;
        self.expect(&TokenKind::Integer)?;
        self.expect(&TokenKind::RightParen)
    }

    /// Parses `CAST(value AS type)`.
    fn parse_cast_expression(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        self.parse_value()?;
        self.expect_keyword(Keyword::As)?;
        self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)
    }

    // Data types

    /// Parses a data type, trying the array form first.
    fn parse_data_type(&mut self) -> Result<(), ParseError> {
        let is_array = self.predicts(|p| {
            p.parse_scalar_type(false)?;
            p.expect(&TokenKind::LeftBracket)
        });

        if is_array {
            self.parse_scalar_type(false)?;
            self.parse_array_spec()?;
            self.parse_optional_charset()
        } else {
            self.parse_scalar_type(true)
        }
    }

    /// Parses a non-array type. The character set clause of CHAR and VARCHAR
    /// is only read when `with_charset` is set.
    fn parse_scalar_type(&mut self, with_charset: bool) -> Result<(), ParseError> {
        match self.current().as_keyword() {
            Some(Keyword::Char | Keyword::Varchar) => {
                self.advance();
                self.parse_optional_length()?;
                if with_charset {
                    self.parse_optional_charset()?;
                }
                Ok(())
            }
            Some(Keyword::Decimal | Keyword::Numeric) => {
                self.advance();
                self.parse_optional_precision_scale()
            }
            Some(
                Keyword::Bigint
                | Keyword::Integer
                | Keyword::Int
                | Keyword::Smallint
                | Keyword::Float
                | Keyword::Date
                | Keyword::Time
                | Keyword::Timestamp,
            ) => {
                self.advance();
                Ok(())
            }
            Some(Keyword::Double) => {
                self.advance();
                self.expect_keyword(Keyword::Precision)
            }
            Some(Keyword::Blob) => self.parse_blob_type(),
            _ => Err(self.unexpected("data type")),
        }
    }

    /// Parses `BLOB [SUB_TYPE t] [SEGMENT SIZE n] [CHARACTER SET cs]` or `BLOB(n[, t])`.
    fn parse_blob_type(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::Blob)?;

        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if self.check(&TokenKind::Integer) {
                self.advance();
            }
            if self.check(&TokenKind::Comma) {
                self.advance();
                self.expect(&TokenKind::Integer)?;
            }
            return self.expect(&TokenKind::RightParen);
        }

        if self.check_keyword(Keyword::SubType) {
            self.advance();
            if self.check(&TokenKind::Integer) {
                self.advance();
            } else {
                self.parse_simple_identifier()?;
            }
        }
        if self.check_keyword(Keyword::Segment) {
            self.advance();
            self.expect_keyword(Keyword::Size)?;
            self.expect(&TokenKind::Integer)?;
        }
        self.parse_optional_charset()
    }

    /// Parses an optional `(length)`.
    fn parse_optional_length(&mut self) -> Result<(), ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            self.expect(&TokenKind::Integer)?;
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(())
    }

    /// Parses an optional `(precision[, scale])`.
    fn parse_optional_precision_scale(&mut self) -> Result<(), ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            self.expect(&TokenKind::Integer)?;
            if self.check(&TokenKind::Comma) {
                self.advance();
                self.expect(&TokenKind::Integer)?;
            }
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(())
    }

    /// Parses an optional `CHARACTER SET name`.
    fn parse_optional_charset(&mut self) -> Result<(), ParseError> {
        if self.check_keyword(Keyword::Character) {
            self.advance();
            self.expect_keyword(Keyword::Set)?;
            self.parse_simple_identifier()?;
        }
        Ok(())
    }

    /// Parses `[range, ...]`.
    fn parse_array_spec(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::LeftBracket)?;
        self.parse_array_range()?;
        while self.check(&TokenKind::Comma) {
            self.advance();
            self.parse_array_range()?;
        }
        self.expect(&TokenKind::RightBracket)
    }

    /// Parses `lower[:upper]`.
    ///
    /// Without spaces `1:10` lexes as an integer followed by the identifier
    /// `:10`, which is accepted as the upper bound.
    fn parse_array_range(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::Integer)?;
        if self.check(&TokenKind::Colon) {
            self.advance();
            self.expect(&TokenKind::Integer)?;
        } else if self.is_colon_bound() {
            self.advance();
        }
        Ok(())
    }

    fn is_colon_bound(&self) -> bool {
        matches!(
            &self.current().kind,
            TokenKind::Identifier(name)
                if name.strip_prefix(':').is_some_and(|digits| {
                    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
                })
        )
    }

    // Semantic actions

    fn with_model(&mut self, action: impl FnOnce(&mut StatementModel)) {
        if self.speculating == 0 {
            action(&mut self.model);
        }
    }

    fn set_statement_type(&mut self, statement_type: StatementType) {
        self.with_model(|model| model.set_statement_type(statement_type));
    }

    // Speculation

    /// Runs `attempt` and rewinds the token position unless it succeeds.
    ///
    /// While an attempt runs, semantic actions are skipped and mismatches
    /// fail immediately instead of being recovered.
    fn speculate(&mut self, attempt: impl FnOnce(&mut Self) -> Result<(), ParseError>) -> bool {
        let mark = self.pos;
        self.speculating += 1;
        let matched = attempt(self).is_ok();
        self.speculating -= 1;
        if !matched {
            self.pos = mark;
        }
        trace!(matched, start = mark, "speculative parse");
        matched
    }

    /// Returns true if `attempt` would succeed here, leaving the token
    /// position unchanged either way.
    fn predicts(&mut self, attempt: impl FnOnce(&mut Self) -> Result<(), ParseError>) -> bool {
        let mark = self.pos;
        let matched = self.speculate(attempt);
        self.pos = mark;
        matched
    }

    // Token helpers

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the token `n` positions ahead, or EOF.
    fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Returns the most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advances to the next token. Stays on EOF.
    fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    /// Checks if the current token is of the given kind.
    ///
    /// Payloads are ignored except for keywords, which must be equal.
    fn check(&self, kind: &TokenKind) -> bool {
        self.check_at(0, kind)
    }

    fn check_at(&self, n: usize, kind: &TokenKind) -> bool {
        match (&self.peek(n).kind, kind) {
            (TokenKind::Keyword(found), TokenKind::Keyword(expected)) => found == expected,
            (found, expected) => {
                core::mem::discriminant(found) == core::mem::discriminant(expected)
            }
        }
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check_keyword_at(0, keyword)
    }

    fn check_keyword_at(&self, n: usize, keyword: Keyword) -> bool {
        matches!(&self.peek(n).kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    fn is_identifier(&self) -> bool {
        self.is_identifier_at(0)
    }

    fn is_identifier_at(&self, n: usize) -> bool {
        matches!(
            self.peek(n).kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        )
    }

    fn is_negative_number(&self) -> bool {
        let token = self.current();
        matches!(token.kind, TokenKind::Integer | TokenKind::Real)
            && token.text(self.source).starts_with('-')
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::unexpected(expected, &token.kind, token.span)
    }

    /// Expects the current token to be the given kind.
    ///
    /// Outside speculation a single stray token in front of the expected
    /// one is dropped, and a `)` missing at end of input is assumed; both
    /// are recorded as recovered mismatches.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            return Ok(());
        }

        if self.speculating == 0 {
            let found = self.current().clone();
            if !found.is_eof() && self.check_at(1, kind) {
                debug!(start = found.span.start, "dropping extraneous token");
                self.diagnostics.record(
                    DiagnosticKind::RecoverableMismatch,
                    format!("Extraneous input {}, expected {kind}", found.kind),
                    found.span,
                );
                self.advance();
                self.advance();
                return Ok(());
            }
            if found.is_eof() && matches!(kind, TokenKind::RightParen) {
                debug!(start = found.span.start, "assuming missing ')'");
                self.diagnostics.record(
                    DiagnosticKind::RecoverableMismatch,
                    format!("Missing {kind} at end of input"),
                    found.span,
                );
                return Ok(());
            }
        }

        Err(ParseError::unexpected(
            kind,
            &self.current().kind,
            self.current().span,
        ))
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.expect(&TokenKind::Keyword(keyword))
    }
}

//! Recursive-descent parser for the SQL subset.

use sql_adapter_core::{AdapterError, Value};

use crate::ast::{
    BinaryOp, ColumnRef, DeleteStmt, Expr, InList, InsertBody, InsertStmt, JoinClause, OrderKey,
    Projection, SelectStmt, SqlStatement, UpdateStmt,
};
use crate::lexer::{tokenize, Token};

/// Parses a statement.
///
/// # Returns
/// `Result<SqlStatement, AdapterError>`; anything outside the supported
/// subset produces a syntax error naming what was seen.
pub fn parse(sql: &str) -> Result<SqlStatement, AdapterError> {
    let tokens = tokenize(sql)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        placeholders: 0,
    };
    let statement = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(statement)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    placeholders: usize,
}

impl Parser {
    fn parse_statement(&mut self) -> Result<SqlStatement, AdapterError> {
        if self.accept_keyword("SELECT") {
            return Ok(SqlStatement::Select(self.parse_select_body()?));
        }
        if self.accept_keyword("INSERT") {
            return Ok(SqlStatement::Insert(self.parse_insert_body()?));
        }
        if self.accept_keyword("UPDATE") {
            return Ok(SqlStatement::Update(self.parse_update_body()?));
        }
        if self.accept_keyword("DELETE") {
            return Ok(SqlStatement::Delete(self.parse_delete_body()?));
        }
        if self.accept_keyword("SET") {
            return Ok(SqlStatement::Insert(self.parse_identity_wrapped_insert()?));
        }
        Err(self.unexpected("a statement"))
    }

    /// `SET IDENTITY_INSERT <t> ON <insert> SET IDENTITY_INSERT <t> OFF`
    ///
    /// The toggles themselves are a no-op here; only the inner INSERT runs.
    fn parse_identity_wrapped_insert(&mut self) -> Result<InsertStmt, AdapterError> {
        self.expect_keyword("IDENTITY_INSERT")?;
        self.identifier()?;
        self.expect_keyword("ON")?;

        self.expect_keyword("INSERT")?;
        let insert = self.parse_insert_body()?;

        self.expect_keyword("SET")?;
        self.expect_keyword("IDENTITY_INSERT")?;
        self.identifier()?;
        self.expect_keyword("OFF")?;
        Ok(insert)
    }

    fn parse_select_body(&mut self) -> Result<SelectStmt, AdapterError> {
        let projection = if self.accept(&Token::Star) {
            Projection::Star
        } else {
            let mut columns = vec![self.column_ref()?];
            while self.accept(&Token::Comma) {
                columns.push(self.column_ref()?);
            }
            Projection::Columns(columns)
        };

        self.expect_keyword("FROM")?;
        let table = self.identifier()?;

        let mut joins = Vec::new();
        loop {
            if self.accept_keyword("INNER") {
                self.expect_keyword("JOIN")?;
            } else if !self.accept_keyword("JOIN") {
                break;
            }
            let join_table = self.identifier()?;
            self.expect_keyword("ON")?;
            let left = self.column_ref()?;
            self.expect(&Token::Eq)?;
            let right = self.column_ref()?;
            joins.push(JoinClause {
                table: join_table,
                left,
                right,
            });
        }

        let filter = if self.accept_keyword("WHERE") {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let mut order = Vec::new();
        if self.accept_keyword("ORDER") {
            self.expect_keyword("BY")?;
            loop {
                let column = self.column_ref()?;
                let descending = if self.accept_keyword("DESC") {
                    true
                } else {
                    self.accept_keyword("ASC");
                    false
                };
                order.push(OrderKey { column, descending });
                if !self.accept(&Token::Comma) {
                    break;
                }
            }
        }

        let mut limit = None;
        let mut offset = None;
        loop {
            if self.accept_keyword("LIMIT") {
                limit = Some(self.unsigned_integer()?);
            } else if self.accept_keyword("OFFSET") {
                offset = Some(self.unsigned_integer()?);
                if !self.accept_keyword("ROWS") {
                    self.accept_keyword("ROW");
                }
            } else if self.accept_keyword("FETCH") {
                if !self.accept_keyword("FIRST") {
                    self.expect_keyword("NEXT")?;
                }
                limit = Some(self.unsigned_integer()?);
                if !self.accept_keyword("ROWS") {
                    self.accept_keyword("ROW");
                }
                self.expect_keyword("ONLY")?;
            } else {
                break;
            }
        }

        Ok(SelectStmt {
            projection,
            table,
            joins,
            filter,
            order,
            limit,
            offset,
        })
    }

    fn parse_insert_body(&mut self) -> Result<InsertStmt, AdapterError> {
        self.expect_keyword("INTO")?;
        let table = self.identifier()?;

        let body = if self.accept(&Token::LParen) {
            let mut columns = Vec::new();
            if !self.accept(&Token::RParen) {
                columns.push(self.identifier()?);
                while self.accept(&Token::Comma) {
                    columns.push(self.identifier()?);
                }
                self.expect(&Token::RParen)?;
            }
            self.expect_keyword("VALUES")?;
            let rows = self.parse_value_rows()?;
            InsertBody::Values { columns, rows }
        } else if self.accept_keyword("DEFAULT") {
            self.expect_keyword("VALUES")?;
            InsertBody::DefaultValues
        } else if self.accept_keyword("VALUES") {
            let rows = self.parse_value_rows()?;
            InsertBody::Values {
                columns: Vec::new(),
                rows,
            }
        } else {
            return Err(self.unexpected("a column list, VALUES, or DEFAULT VALUES"));
        };

        let returning = if self.accept_keyword("RETURNING") {
            Some(self.identifier()?)
        } else {
            None
        };

        Ok(InsertStmt {
            table,
            body,
            returning,
        })
    }

    fn parse_value_rows(&mut self) -> Result<Vec<Vec<Expr>>, AdapterError> {
        let mut rows = vec![self.parse_value_row()?];
        while self.accept(&Token::Comma) {
            rows.push(self.parse_value_row()?);
        }
        Ok(rows)
    }

    fn parse_value_row(&mut self) -> Result<Vec<Expr>, AdapterError> {
        self.expect(&Token::LParen)?;
        let mut row = Vec::new();
        if self.accept(&Token::RParen) {
            return Ok(row);
        }
        row.push(self.parse_expr()?);
        while self.accept(&Token::Comma) {
            row.push(self.parse_expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(row)
    }

    fn parse_update_body(&mut self) -> Result<UpdateStmt, AdapterError> {
        let table = self.identifier()?;
        self.expect_keyword("SET")?;

        let mut assignments = Vec::new();
        loop {
            let column = self.identifier()?;
            self.expect(&Token::Eq)?;
            assignments.push((column, self.parse_expr()?));
            if !self.accept(&Token::Comma) {
                break;
            }
        }

        let filter = if self.accept_keyword("WHERE") {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(UpdateStmt {
            table,
            assignments,
            filter,
        })
    }

    fn parse_delete_body(&mut self) -> Result<DeleteStmt, AdapterError> {
        self.expect_keyword("FROM")?;
        let table = self.identifier()?;
        let filter = if self.accept_keyword("WHERE") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(DeleteStmt { table, filter })
    }

    fn parse_expr(&mut self) -> Result<Expr, AdapterError> {
        let mut expr = self.parse_and_expr()?;
        while self.accept_keyword("OR") {
            let right = self.parse_and_expr()?;
            expr = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, AdapterError> {
        let mut expr = self.parse_not_expr()?;
        while self.accept_keyword("AND") {
            let right = self.parse_not_expr()?;
            expr = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_not_expr(&mut self) -> Result<Expr, AdapterError> {
        if self.accept_keyword("NOT") {
            let operand = self.parse_not_expr()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<Expr, AdapterError> {
        let operand = self.parse_primary()?;

        if self.accept_keyword("IS") {
            let negated = self.accept_keyword("NOT");
            self.expect_keyword("NULL")?;
            return Ok(Expr::IsNull {
                operand: Box::new(operand),
                negated,
            });
        }

        if self.accept_keyword("NOT") {
            self.expect_keyword("IN")?;
            return self.parse_in_predicate(operand, true);
        }

        if self.accept_keyword("IN") {
            return self.parse_in_predicate(operand, false);
        }

        let op = match self.peek() {
            Some(Token::Eq) => Some(BinaryOp::Eq),
            Some(Token::Ne) => Some(BinaryOp::Ne),
            Some(Token::Lt) => Some(BinaryOp::Lt),
            Some(Token::Le) => Some(BinaryOp::Le),
            Some(Token::Gt) => Some(BinaryOp::Gt),
            Some(Token::Ge) => Some(BinaryOp::Ge),
            _ => None,
        };
        if let Some(op) = op {
            self.position += 1;
            let right = self.parse_primary()?;
            return Ok(Expr::Binary {
                op,
                left: Box::new(operand),
                right: Box::new(right),
            });
        }

        Ok(operand)
    }

    fn parse_in_predicate(&mut self, operand: Expr, negated: bool) -> Result<Expr, AdapterError> {
        self.expect(&Token::LParen)?;

        if self.accept_keyword("SELECT") {
            let subquery = self.parse_select_body()?;
            self.expect(&Token::RParen)?;
            return Ok(Expr::In {
                operand: Box::new(operand),
                list: InList::Subquery(Box::new(subquery)),
                negated,
            });
        }

        let mut values = vec![self.parse_expr()?];
        while self.accept(&Token::Comma) {
            values.push(self.parse_expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(Expr::In {
            operand: Box::new(operand),
            list: InList::Values(values),
            negated,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, AdapterError> {
        match self.peek().cloned() {
            Some(Token::Placeholder) => {
                self.position += 1;
                let index = self.placeholders;
                self.placeholders += 1;
                Ok(Expr::Placeholder(index))
            }
            Some(Token::Integer(value)) => {
                self.position += 1;
                Ok(Expr::Literal(Value::Integer(value)))
            }
            Some(Token::Float(value)) => {
                self.position += 1;
                Ok(Expr::Literal(Value::Float(value)))
            }
            Some(Token::StringLiteral(value)) => {
                self.position += 1;
                Ok(Expr::Literal(Value::Text(value)))
            }
            Some(Token::LParen) => {
                self.position += 1;
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Identifier(word)) => {
                if word.eq_ignore_ascii_case("NULL") {
                    self.position += 1;
                    Ok(Expr::Literal(Value::Null))
                } else if word.eq_ignore_ascii_case("TRUE") {
                    self.position += 1;
                    Ok(Expr::Literal(Value::Boolean(true)))
                } else if word.eq_ignore_ascii_case("FALSE") {
                    self.position += 1;
                    Ok(Expr::Literal(Value::Boolean(false)))
                } else if word.eq_ignore_ascii_case("DEFAULT") {
                    self.position += 1;
                    Ok(Expr::Default)
                } else {
                    Ok(Expr::Column(self.column_ref()?))
                }
            }
            Some(Token::QuotedIdentifier(_)) => Ok(Expr::Column(self.column_ref()?)),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn column_ref(&mut self) -> Result<ColumnRef, AdapterError> {
        let first = self.identifier()?;
        if self.accept(&Token::Dot) {
            let column = self.identifier()?;
            Ok(ColumnRef {
                table: Some(first),
                column,
            })
        } else {
            Ok(ColumnRef {
                table: None,
                column: first,
            })
        }
    }

    fn identifier(&mut self) -> Result<String, AdapterError> {
        match self.peek().cloned() {
            Some(Token::Identifier(word)) => {
                self.position += 1;
                Ok(word)
            }
            Some(Token::QuotedIdentifier(word)) => {
                self.position += 1;
                Ok(word)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn unsigned_integer(&mut self) -> Result<u64, AdapterError> {
        match self.peek().cloned() {
            Some(Token::Integer(value)) if value >= 0 => {
                self.position += 1;
                Ok(value as u64)
            }
            _ => Err(self.unexpected("a non-negative integer")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn accept(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn accept_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().map(|t| t.is_keyword(keyword)).unwrap_or(false) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), AdapterError> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{:?}", token)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), AdapterError> {
        if self.accept_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn expect_end(&self) -> Result<(), AdapterError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(AdapterError::syntax(format!(
                "unexpected trailing {:?}",
                token
            ))),
        }
    }

    fn unexpected(&self, expected: &str) -> AdapterError {
        match self.peek() {
            Some(token) => {
                AdapterError::syntax(format!("expected {}, found {:?}", expected, token))
            }
            None => AdapterError::syntax(format!("expected {}, found end of statement", expected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mysql_all_default_insert() {
        let statement = parse("INSERT INTO `articles` () VALUES ()").unwrap();
        match statement {
            SqlStatement::Insert(insert) => {
                assert_eq!(insert.table, "articles");
                match insert.body {
                    InsertBody::Values { columns, rows } => {
                        assert!(columns.is_empty());
                        assert_eq!(rows, vec![Vec::new()]);
                    }
                    other => panic!("unexpected body: {:?}", other),
                }
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parses_default_values_with_returning() {
        let statement = parse("INSERT INTO \"articles\" DEFAULT VALUES RETURNING \"id\"").unwrap();
        match statement {
            SqlStatement::Insert(insert) => {
                assert!(matches!(insert.body, InsertBody::DefaultValues));
                assert_eq!(insert.returning.as_deref(), Some("id"));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parses_oracle_values_default() {
        let statement =
            parse("INSERT INTO \"ARTICLES\" (\"ID\") VALUES (DEFAULT) RETURNING \"ID\"").unwrap();
        match statement {
            SqlStatement::Insert(insert) => {
                assert_eq!(insert.table, "ARTICLES");
                match insert.body {
                    InsertBody::Values { columns, rows } => {
                        assert_eq!(columns, vec!["ID"]);
                        assert!(matches!(rows[0][0], Expr::Default));
                    }
                    other => panic!("unexpected body: {:?}", other),
                }
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parses_identity_wrapped_insert() {
        let statement = parse(
            "SET IDENTITY_INSERT [articles] ON \
             INSERT INTO [articles] ([id]) VALUES (?) \
             SET IDENTITY_INSERT [articles] OFF",
        )
        .unwrap();
        match statement {
            SqlStatement::Insert(insert) => {
                assert_eq!(insert.table, "articles");
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parses_in_subquery() {
        let statement = parse(
            "SELECT \"name\" FROM \"articles\" \
             WHERE \"parent_name\" IN (SELECT \"name\" FROM \"articles\")",
        )
        .unwrap();
        match statement {
            SqlStatement::Select(select) => match select.filter.unwrap() {
                Expr::In { list, negated, .. } => {
                    assert!(!negated);
                    assert!(matches!(list, InList::Subquery(_)));
                }
                other => panic!("unexpected filter: {:?}", other),
            },
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_indices_follow_statement_order() {
        let statement = parse("SELECT a FROM t WHERE a = ? AND b IN (?, ?)").unwrap();
        match statement {
            SqlStatement::Select(select) => {
                let filter = select.filter.unwrap();
                match filter {
                    Expr::Binary { right, .. } => match *right {
                        Expr::In { list, .. } => match list {
                            InList::Values(values) => {
                                assert!(matches!(values[0], Expr::Placeholder(1)));
                                assert!(matches!(values[1], Expr::Placeholder(2)));
                            }
                            other => panic!("unexpected list: {:?}", other),
                        },
                        other => panic!("unexpected rhs: {:?}", other),
                    },
                    other => panic!("unexpected filter: {:?}", other),
                }
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_join_clause() {
        let statement = parse(
            "SELECT \"authors\".\"name\" FROM \"authors\" \
             INNER JOIN \"articles\" ON \"authors\".\"article_name\" = \"articles\".\"name\" \
             WHERE \"articles\".\"name\" = ?",
        )
        .unwrap();
        match statement {
            SqlStatement::Select(select) => {
                assert_eq!(select.joins.len(), 1);
                assert_eq!(select.joins[0].table, "articles");
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_trailing_tokens() {
        assert!(parse("DELETE FROM t WHERE a = 1 garbage garbage").is_err());
    }

    #[test]
    fn test_limit_offset_and_fetch_forms() {
        let statement = parse("SELECT a FROM t ORDER BY a DESC LIMIT 4 OFFSET 1").unwrap();
        match statement {
            SqlStatement::Select(select) => {
                assert_eq!(select.limit, Some(4));
                assert_eq!(select.offset, Some(1));
                assert!(select.order[0].descending);
            }
            other => panic!("unexpected statement: {:?}", other),
        }

        let statement = parse("SELECT a FROM t OFFSET 1 ROWS FETCH NEXT 4 ROWS ONLY").unwrap();
        match statement {
            SqlStatement::Select(select) => {
                assert_eq!(select.limit, Some(4));
                assert_eq!(select.offset, Some(1));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }
}

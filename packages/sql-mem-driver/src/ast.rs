//! Parsed statement forms for the SQL subset the memory backend executes.

use sql_adapter_core::Value;

/// A parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlStatement {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

/// Column reference, optionally qualified with a table name.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

/// SELECT projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    Star,
    /// Explicit column list in request order
    Columns(Vec<ColumnRef>),
}

/// `INNER JOIN <table> ON <left> = <right>`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// Sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub column: ColumnRef,
    pub descending: bool,
}

/// Parsed SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub projection: Projection,
    pub table: String,
    pub joins: Vec<JoinClause>,
    pub filter: Option<Expr>,
    pub order: Vec<OrderKey>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// INSERT body.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertBody {
    /// `DEFAULT VALUES`
    DefaultValues,
    /// `(columns…) VALUES (exprs…), …`; both lists may be empty
    Values {
        columns: Vec<String>,
        rows: Vec<Vec<Expr>>,
    },
}

/// Parsed INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: String,
    pub body: InsertBody,
    pub returning: Option<String>,
}

/// Parsed UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
}

/// Parsed DELETE.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: String,
    pub filter: Option<Expr>,
}

/// Comparison and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Right-hand side of an IN predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    Values(Vec<Expr>),
    Subquery(Box<SelectStmt>),
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Value),
    /// `DEFAULT` inside an INSERT value list
    Default,
    /// Positional `?` placeholder, 0-based in statement order
    Placeholder(usize),
    /// Column reference
    Column(ColumnRef),
    /// `NOT <expr>`
    Not(Box<Expr>),
    /// Binary comparison or logical connective
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `<expr> IS [NOT] NULL`
    IsNull { operand: Box<Expr>, negated: bool },
    /// `<expr> [NOT] IN (…)`
    In {
        operand: Box<Expr>,
        list: InList,
        negated: bool,
    },
}

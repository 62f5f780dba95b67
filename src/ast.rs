//! The AST node model shared by the interpreter and the code generator.
//!
//! Nodes own their children outright, so the tree is exactly that: no
//! sharing, no cycles. Names are owned strings because the token stream
//! they came from may be dropped long before the tree is.

/// The language's sole value type: a 64-bit signed integer.
pub type Word = i64;

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
  Neg,
  Not,
}

/// Tree produced by the parser. `Program` only ever appears at the root;
/// `Block` is the same statement sequence nested inside braces.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
  Program { statements: Vec<AstNode> },
  Block { statements: Vec<AstNode> },
  ExprStmt { expr: Box<AstNode> },
  VarDecl { name: String },
  Assign { name: String, value: Box<AstNode> },
  Binary { op: BinaryOp, lhs: Box<AstNode>, rhs: Box<AstNode> },
  Unary { op: UnaryOp, operand: Box<AstNode> },
  Num { value: Word },
  Var { name: String },
}

impl AstNode {
  pub fn number(value: Word) -> Self {
    Self::Num { value }
  }

  pub fn var(name: impl Into<String>) -> Self {
    Self::Var { name: name.into() }
  }

  pub fn unary(op: UnaryOp, operand: AstNode) -> Self {
    Self::Unary {
      op,
      operand: Box::new(operand),
    }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  pub fn assign(name: impl Into<String>, value: AstNode) -> Self {
    Self::Assign {
      name: name.into(),
      value: Box::new(value),
    }
  }

  pub fn expr_stmt(expr: AstNode) -> Self {
    Self::ExprStmt {
      expr: Box::new(expr),
    }
  }

  /// Node-kind name used in invalid-node diagnostics.
  pub fn describe(&self) -> &'static str {
    match self {
      Self::Program { .. } => "program",
      Self::Block { .. } => "block",
      Self::ExprStmt { .. } => "expression statement",
      Self::VarDecl { .. } => "variable declaration",
      Self::Assign { .. } => "assignment",
      Self::Binary { .. } => "binary operation",
      Self::Unary { .. } => "unary operation",
      Self::Num { .. } => "literal",
      Self::Var { .. } => "variable",
    }
  }
}

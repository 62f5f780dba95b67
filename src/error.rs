//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics anchored to a source position follow the classic
//! `file:line: error: message` shape. Semantic and internal errors carry a
//! bare message because no position survives into the AST.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// Grammar violations and escalated lexical errors.
  #[snafu(display("{file}:{line}: error: {message}"))]
  Syntax {
    file: String,
    line: u32,
    message: String,
  },

  /// Violations of the language rules found while consuming the AST,
  /// e.g. a duplicate declaration or a read of an undeclared name.
  #[snafu(display("error: {message}"))]
  Semantic { message: String },

  /// Invariant violations inside the compiler itself.
  #[snafu(display("error: {message}"))]
  Internal { message: String },
}

impl CompileError {
  /// Construct a syntax error anchored at a line of the named source file.
  pub fn syntax(file: &str, line: u32, message: impl Into<String>) -> Self {
    Self::Syntax {
      file: file.to_string(),
      line,
      message: message.into(),
    }
  }

  pub fn semantic(message: impl Into<String>) -> Self {
    Self::Semantic {
      message: message.into(),
    }
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self::Internal {
      message: message.into(),
    }
  }
}

//! Code generation: lower the parsed AST into AT&T x86-64 assembly.
//!
//! Expressions run on a stack machine: every expression pushes exactly one
//! value and every consumer pops its operands, so the emitter keeps a
//! running depth counter and insists it returns to zero before the
//! epilogue. Locals live in the frame and are addressed relative to
//! `%rbp`; the frame grows by one word at each declaration rather than
//! being reserved up front.

use rustc_hash::FxHashMap;

use crate::ast::{AstNode, BinaryOp, UnaryOp};
use crate::error::{CompileError, CompileResult};

/// Bytes occupied by one Word-sized frame slot.
const WORD_SIZE: i64 = 8;

/// Emit the whole translation unit for a `Program` root.
pub fn generate(program: &AstNode) -> CompileResult<String> {
  let AstNode::Program { statements } = program else {
    return Err(CompileError::internal(format!(
      "code generator expects a program root, got a {} node",
      program.describe()
    )));
  };

  let mut emitter = Emitter::new();
  emitter.asm.push_str(".global main\n");
  emitter.asm.push_str("main:\n");
  emitter.asm.push_str("    push %rbp\n");
  emitter.asm.push_str("    mov %rsp, %rbp\n");

  for statement in statements {
    emitter.emit_stmt(statement)?;
  }

  // Discard values left by bare expression statements so the stack
  // balances before the frame is released.
  while emitter.depth > 0 {
    emitter.pop("%rdi");
  }
  if emitter.depth != 0 {
    return Err(CompileError::internal(format!(
      "stack depth is {} before the epilogue",
      emitter.depth
    )));
  }

  emitter.asm.push_str("    mov $0, %rax\n");
  emitter.asm.push_str("    mov %rbp, %rsp\n");
  emitter.asm.push_str("    pop %rbp\n");
  emitter.asm.push_str("    ret\n");

  Ok(emitter.asm)
}

/// Per-invocation emitter state: output buffer, symbol table, cumulative
/// frame size and the push/pop depth counter.
struct Emitter {
  asm: String,
  locals: FxHashMap<String, i64>,
  frame_size: i64,
  depth: i64,
}

impl Emitter {
  fn new() -> Self {
    Self {
      asm: String::new(),
      locals: FxHashMap::default(),
      frame_size: 0,
      depth: 0,
    }
  }

  fn push(&mut self, reg: &str) {
    self.asm.push_str(&format!("    push {reg}\n"));
    self.depth += 1;
  }

  fn pop(&mut self, reg: &str) {
    self.asm.push_str(&format!("    pop {reg}\n"));
    self.depth -= 1;
  }

  /// Frame offset of a declared name, or the undeclared-identifier error.
  fn slot(&self, name: &str) -> CompileResult<i64> {
    self
      .locals
      .get(name)
      .copied()
      .ok_or_else(|| CompileError::semantic(format!("undeclared identifier '{name}'")))
  }

  fn declare(&mut self, name: &str) -> CompileResult<()> {
    if self.locals.contains_key(name) {
      return Err(CompileError::semantic(format!(
        "identifier '{name}' already declared"
      )));
    }
    self.frame_size += WORD_SIZE;
    self.locals.insert(name.to_string(), self.frame_size);
    self.asm.push_str(&format!("    sub ${WORD_SIZE}, %rsp\n"));
    Ok(())
  }

  fn emit_stmt(&mut self, node: &AstNode) -> CompileResult<()> {
    match node {
      AstNode::Block { statements } => {
        for statement in statements {
          self.emit_stmt(statement)?;
        }
        Ok(())
      }
      AstNode::ExprStmt { expr } => self.emit_expr(expr),
      AstNode::VarDecl { name } => self.declare(name),
      _ => Err(CompileError::internal(format!(
        "{} node in statement position",
        node.describe()
      ))),
    }
  }

  /// Emit stack-based code for a single expression node. Every arm leaves
  /// exactly one value pushed.
  fn emit_expr(&mut self, node: &AstNode) -> CompileResult<()> {
    match node {
      AstNode::Num { value } => {
        self.asm.push_str(&format!("    mov ${value}, %rax\n"));
        self.push("%rax");
      }
      AstNode::Var { name } => {
        let offset = self.slot(name)?;
        self.asm.push_str(&format!("    mov -{offset}(%rbp), %rax\n"));
        self.push("%rax");
      }
      AstNode::Assign { name, value } => {
        self.emit_expr(value)?;
        let offset = self.slot(name)?;
        self.pop("%rax");
        self.asm.push_str(&format!("    mov %rax, -{offset}(%rbp)\n"));
        // The stored value stays available, so chained assignments like
        // `a = b = 10` store through every target.
        self.push("%rax");
      }
      AstNode::Binary { op, lhs, rhs } => {
        self.emit_expr(lhs)?;
        self.emit_expr(rhs)?;
        self.pop("%rdi");
        self.pop("%rax");
        match op {
          BinaryOp::Add => self.asm.push_str("    add %rdi, %rax\n"),
          BinaryOp::Sub => self.asm.push_str("    sub %rdi, %rax\n"),
          BinaryOp::Mul => self.asm.push_str("    imul %rdi, %rax\n"),
          BinaryOp::Div => {
            self.asm.push_str("    cqo\n");
            self.asm.push_str("    idiv %rdi\n");
          }
          BinaryOp::Rem => {
            self.asm.push_str("    cqo\n");
            self.asm.push_str("    idiv %rdi\n");
            self.asm.push_str("    mov %rdx, %rax\n");
          }
          BinaryOp::Eq => {
            self.asm.push_str("    cmp %rdi, %rax\n");
            self.asm.push_str("    sete %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
          BinaryOp::Ne => {
            self.asm.push_str("    cmp %rdi, %rax\n");
            self.asm.push_str("    setne %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
          BinaryOp::Lt => {
            self.asm.push_str("    cmp %rdi, %rax\n");
            self.asm.push_str("    setl %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
          BinaryOp::Le => {
            self.asm.push_str("    cmp %rdi, %rax\n");
            self.asm.push_str("    setle %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
          BinaryOp::Gt => {
            self.asm.push_str("    cmp %rax, %rdi\n");
            self.asm.push_str("    setl %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
          BinaryOp::Ge => {
            self.asm.push_str("    cmp %rax, %rdi\n");
            self.asm.push_str("    setle %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
        }
        self.push("%rax");
      }
      AstNode::Unary { op, operand } => {
        self.emit_expr(operand)?;
        self.pop("%rax");
        match op {
          UnaryOp::Neg => self.asm.push_str("    neg %rax\n"),
          UnaryOp::Not => {
            self.asm.push_str("    cmp $0, %rax\n");
            self.asm.push_str("    sete %al\n");
            self.asm.push_str("    movzbl %al, %eax\n");
          }
        }
        self.push("%rax");
      }
      _ => {
        return Err(CompileError::internal(format!(
          "{} node in expression position",
          node.describe()
        )));
      }
    }
    Ok(())
  }
}

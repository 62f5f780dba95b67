//! Recursive-descent parser producing the program AST.
//!
//! Each grammar level owns one precedence tier and delegates tighter
//! binding to the level below, folding left-associative operators into the
//! running left operand as it goes. Any grammar violation aborts the whole
//! parse with a `file:line` diagnostic; there is no recovery and no
//! partial tree.

use crate::ast::{AstNode, BinaryOp, UnaryOp, Word};
use crate::error::{CompileError, CompileResult};
use crate::lexer::{Token, TokenKind, describe_token};

/// Parse a token stream into a `Program` root node.
///
/// `file` is only used for diagnostics; the tokens must come from a
/// single `lexer::lex` pass so that `Eof` terminates the stream.
pub fn parse(file: &str, tokens: Vec<Token>) -> CompileResult<AstNode> {
  let mut parser = Parser::new(file, tokens);

  let mut statements = Vec::new();
  while !parser.is_eof() {
    statements.push(parser.declaration()?);
  }

  Ok(AstNode::Program { statements })
}

/// Lightweight cursor over the token vector.
struct Parser<'a> {
  tokens: Vec<Token<'a>>,
  file: &'a str,
  pos: usize,
}

impl<'a> Parser<'a> {
  fn new(file: &'a str, tokens: Vec<Token<'a>>) -> Self {
    Self {
      tokens,
      file,
      pos: 0,
    }
  }

  fn declaration(&mut self) -> CompileResult<AstNode> {
    if self.matches(TokenKind::Auto) {
      let name = self.expect(TokenKind::Identifier, "an identifier after 'auto'")?;
      let node = AstNode::VarDecl {
        name: name.text.to_string(),
      };
      self.expect(TokenKind::Semicolon, "';' after declaration")?;
      return Ok(node);
    }

    self.statement()
  }

  fn statement(&mut self) -> CompileResult<AstNode> {
    if self.matches(TokenKind::LeftBrace) {
      let mut statements = Vec::new();
      while !self.check(TokenKind::RightBrace) && !self.is_eof() {
        statements.push(self.declaration()?);
      }
      self.expect(TokenKind::RightBrace, "'}' after block")?;
      return Ok(AstNode::Block { statements });
    }

    let expr = self.expression()?;
    self.expect(TokenKind::Semicolon, "';' after expression")?;
    Ok(AstNode::expr_stmt(expr))
  }

  fn expression(&mut self) -> CompileResult<AstNode> {
    self.assignment()
  }

  fn assignment(&mut self) -> CompileResult<AstNode> {
    let node = self.equality()?;

    if self.check(TokenKind::Equal) {
      let equals = self.advance();
      let value = self.assignment()?;
      // Only a bare variable reference may be rewritten into an
      // assignment target.
      return match node {
        AstNode::Var { name } => Ok(AstNode::assign(name, value)),
        _ => Err(self.error_at(&equals, "invalid assignment target")),
      };
    }

    Ok(node)
  }

  fn equality(&mut self) -> CompileResult<AstNode> {
    let mut node = self.comparison()?;

    loop {
      let op = match self.peek().kind {
        TokenKind::EqualEqual => BinaryOp::Eq,
        TokenKind::NotEqual => BinaryOp::Ne,
        _ => break,
      };
      self.advance();
      let rhs = self.comparison()?;
      node = AstNode::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn comparison(&mut self) -> CompileResult<AstNode> {
    let mut node = self.term()?;

    loop {
      let op = match self.peek().kind {
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Le,
        _ => break,
      };
      self.advance();
      let rhs = self.term()?;
      node = AstNode::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn term(&mut self) -> CompileResult<AstNode> {
    let mut node = self.factor()?;

    loop {
      let op = match self.peek().kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        _ => break,
      };
      self.advance();
      let rhs = self.factor()?;
      node = AstNode::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn factor(&mut self) -> CompileResult<AstNode> {
    let mut node = self.unary()?;

    loop {
      let op = match self.peek().kind {
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Percent => BinaryOp::Rem,
        _ => break,
      };
      self.advance();
      let rhs = self.unary()?;
      node = AstNode::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn unary(&mut self) -> CompileResult<AstNode> {
    let op = match self.peek().kind {
      TokenKind::Minus => Some(UnaryOp::Neg),
      TokenKind::Not => Some(UnaryOp::Not),
      _ => None,
    };

    if let Some(op) = op {
      self.advance();
      let operand = self.primary()?;
      return Ok(AstNode::unary(op, operand));
    }

    self.primary()
  }

  fn primary(&mut self) -> CompileResult<AstNode> {
    if self.matches(TokenKind::LeftParen) {
      let node = self.expression()?;
      self.expect(TokenKind::RightParen, "closing parenthesis")?;
      return Ok(node);
    }

    let token = self.peek();
    match token.kind {
      TokenKind::WordLiteral => {
        let token = self.advance();
        let value = token.text.parse::<Word>().map_err(|err| {
          self.error_at(
            &token,
            format!("invalid word literal \"{}\": {err}", token.text),
          )
        })?;
        Ok(AstNode::number(value))
      }
      TokenKind::Identifier => {
        let token = self.advance();
        Ok(AstNode::var(token.text))
      }
      // Lexical errors surface here: the token text is the message.
      TokenKind::Error => Err(self.error_at(&token, token.text)),
      _ => Err(self.error_at(
        &token,
        format!("invalid token: \"{}\"", describe_token(&token)),
      )),
    }
  }

  fn peek(&self) -> Token<'a> {
    self.tokens[self.pos]
  }

  /// Consume and return the current token, never moving past `Eof`.
  fn advance(&mut self) -> Token<'a> {
    let token = self.peek();
    if token.kind != TokenKind::Eof {
      self.pos += 1;
    }
    token
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.peek().kind == kind
  }

  /// Consume the current token if it matches the expected kind.
  fn matches(&mut self, kind: TokenKind) -> bool {
    if self.check(kind) {
      self.advance();
      return true;
    }
    false
  }

  fn expect(&mut self, kind: TokenKind, what: &str) -> CompileResult<Token<'a>> {
    if self.check(kind) {
      return Ok(self.advance());
    }

    let token = self.peek();
    if token.kind == TokenKind::Error {
      return Err(self.error_at(&token, token.text));
    }
    Err(self.error_at(
      &token,
      format!("expected {what}, but got \"{}\"", describe_token(&token)),
    ))
  }

  fn is_eof(&self) -> bool {
    self.check(TokenKind::Eof)
  }

  fn error_at(&self, token: &Token, message: impl Into<String>) -> CompileError {
    CompileError::syntax(self.file, token.line, message)
  }
}

//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The lexer is total. Malformed input becomes `TokenKind::Error` tokens
//! whose text is the diagnostic message, and the parser decides whether
//! that is fatal. Two-character operators are resolved with one character
//! of lookahead so `==` always wins over two `=` tokens.

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Eof,

  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  LeftBracket,
  RightBracket,
  Comma,
  Dot,
  QuestionMark,
  Semicolon,
  Colon,

  Slash,
  Asterisk,
  Percent,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Not,
  NotEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  Ampersand,
  AmpersandAmpersand,
  Pipe,
  PipePipe,

  Identifier,
  StringLiteral,
  WordLiteral,

  Auto,
  Extrn,
  If,
  Else,
  Switch,
  Case,
  Goto,
  While,
  Return,

  Error,
}

/// One lexeme: its kind, the source slice that produced it, and the
/// 1-based line it appears on.
///
/// `text` borrows from the source buffer, except for `Error` tokens where
/// it is the diagnostic message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
  pub kind: TokenKind,
  pub text: &'a str,
  pub line: u32,
}

/// Lex the input into a flat vector of tokens terminated by exactly one
/// `Eof` marker. Never fails; lexical errors are tokens of `Error` kind.
pub fn lex(source: &str) -> Vec<Token<'_>> {
  let mut lexer = Lexer::new(source);
  let mut tokens = Vec::new();

  loop {
    let token = lexer.next_token();
    let done = token.kind == TokenKind::Eof;
    tokens.push(token);
    if done {
      break;
    }
  }

  tokens
}

/// Human-friendly rendering used in diagnostics.
pub fn describe_token(token: &Token) -> String {
  match token.kind {
    TokenKind::Eof => "EOF".to_string(),
    _ => token.text.to_string(),
  }
}

/// Cursor state for one pass over one source buffer.
struct Lexer<'a> {
  source: &'a str,
  start: usize,
  current: usize,
  line: u32,
}

impl<'a> Lexer<'a> {
  fn new(source: &'a str) -> Self {
    Self {
      source,
      start: 0,
      current: 0,
      line: 1,
    }
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn peek(&self) -> u8 {
    if self.is_at_end() {
      0
    } else {
      self.source.as_bytes()[self.current]
    }
  }

  fn advance(&mut self) -> u8 {
    let c = self.source.as_bytes()[self.current];
    if c == b'\n' {
      self.line += 1;
    }
    self.current += 1;
    c
  }

  /// Consume the next character only if it matches, resolving the
  /// two-character operators by maximal munch.
  fn advance_if(&mut self, expected: u8) -> bool {
    if self.is_at_end() || self.peek() != expected {
      return false;
    }
    self.current += 1;
    true
  }

  fn make_token(&self, kind: TokenKind) -> Token<'a> {
    Token {
      kind,
      text: &self.source[self.start..self.current],
      line: self.line,
    }
  }

  fn error_token(&self, message: &'static str) -> Token<'a> {
    Token {
      kind: TokenKind::Error,
      text: message,
      line: self.line,
    }
  }

  fn skip_whitespace(&mut self) {
    while matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\n') {
      self.advance();
    }
  }

  fn next_token(&mut self) -> Token<'a> {
    self.skip_whitespace();
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenKind::Eof);
    }

    let c = self.advance();
    match c {
      b'(' => self.make_token(TokenKind::LeftParen),
      b')' => self.make_token(TokenKind::RightParen),
      b'{' => self.make_token(TokenKind::LeftBrace),
      b'}' => self.make_token(TokenKind::RightBrace),
      b'[' => self.make_token(TokenKind::LeftBracket),
      b']' => self.make_token(TokenKind::RightBracket),
      b',' => self.make_token(TokenKind::Comma),
      b'.' => self.make_token(TokenKind::Dot),
      b'?' => self.make_token(TokenKind::QuestionMark),
      b';' => self.make_token(TokenKind::Semicolon),
      b':' => self.make_token(TokenKind::Colon),
      b'/' => self.make_token(TokenKind::Slash),
      b'*' => self.make_token(TokenKind::Asterisk),
      b'%' => self.make_token(TokenKind::Percent),
      b'+' => {
        if self.advance_if(b'+') {
          self.make_token(TokenKind::PlusPlus)
        } else {
          self.make_token(TokenKind::Plus)
        }
      }
      b'-' => {
        if self.advance_if(b'-') {
          self.make_token(TokenKind::MinusMinus)
        } else {
          self.make_token(TokenKind::Minus)
        }
      }
      b'!' => {
        if self.advance_if(b'=') {
          self.make_token(TokenKind::NotEqual)
        } else {
          self.make_token(TokenKind::Not)
        }
      }
      b'=' => {
        if self.advance_if(b'=') {
          self.make_token(TokenKind::EqualEqual)
        } else {
          self.make_token(TokenKind::Equal)
        }
      }
      b'>' => {
        if self.advance_if(b'=') {
          self.make_token(TokenKind::GreaterEqual)
        } else {
          self.make_token(TokenKind::Greater)
        }
      }
      b'<' => {
        if self.advance_if(b'=') {
          self.make_token(TokenKind::LessEqual)
        } else {
          self.make_token(TokenKind::Less)
        }
      }
      b'&' => {
        if self.advance_if(b'&') {
          self.make_token(TokenKind::AmpersandAmpersand)
        } else {
          self.make_token(TokenKind::Ampersand)
        }
      }
      b'|' => {
        if self.advance_if(b'|') {
          self.make_token(TokenKind::PipePipe)
        } else {
          self.make_token(TokenKind::Pipe)
        }
      }
      b'"' => self.read_string(),
      b'0'..=b'9' => self.read_word(),
      c if c == b'_' || c.is_ascii_alphabetic() => self.read_identifier(),
      _ => self.error_token("unknown token"),
    }
  }

  fn read_word(&mut self) -> Token<'a> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }
    self.make_token(TokenKind::WordLiteral)
  }

  fn read_identifier(&mut self) -> Token<'a> {
    while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
      self.advance();
    }

    let kind = match &self.source[self.start..self.current] {
      "auto" => TokenKind::Auto,
      "extrn" => TokenKind::Extrn,
      "if" => TokenKind::If,
      "else" => TokenKind::Else,
      "switch" => TokenKind::Switch,
      "case" => TokenKind::Case,
      "goto" => TokenKind::Goto,
      "while" => TokenKind::While,
      "return" => TokenKind::Return,
      _ => TokenKind::Identifier,
    };
    self.make_token(kind)
  }

  fn read_string(&mut self) -> Token<'a> {
    // The opening quote is already consumed; the token text excludes
    // both quotes.
    self.start = self.current;

    while !self.is_at_end() && self.peek() != b'"' {
      self.advance();
    }

    if self.is_at_end() {
      return self.error_token("unterminated string");
    }

    let token = self.make_token(TokenKind::StringLiteral);
    self.advance(); // closing quote
    token
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|token| token.kind).collect()
  }

  #[test]
  fn lexes_single_character_punctuation() {
    assert_eq!(
      kinds("( ) { } ; %"),
      vec![
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::Semicolon,
        TokenKind::Percent,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn maximal_munch_prefers_two_character_operators() {
    assert_eq!(
      kinds("== = != ! >= > <= < && & || | ++ + -- -"),
      vec![
        TokenKind::EqualEqual,
        TokenKind::Equal,
        TokenKind::NotEqual,
        TokenKind::Not,
        TokenKind::GreaterEqual,
        TokenKind::Greater,
        TokenKind::LessEqual,
        TokenKind::Less,
        TokenKind::AmpersandAmpersand,
        TokenKind::Ampersand,
        TokenKind::PipePipe,
        TokenKind::Pipe,
        TokenKind::PlusPlus,
        TokenKind::Plus,
        TokenKind::MinusMinus,
        TokenKind::Minus,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn adjacent_equals_lex_as_one_token() {
    // "===" must munch "==" first, leaving a single "=".
    assert_eq!(
      kinds("==="),
      vec![TokenKind::EqualEqual, TokenKind::Equal, TokenKind::Eof]
    );
  }

  #[test]
  fn keywords_are_exact_case_sensitive_matches() {
    assert_eq!(
      kinds("auto extrn if else switch case goto while return"),
      vec![
        TokenKind::Auto,
        TokenKind::Extrn,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Switch,
        TokenKind::Case,
        TokenKind::Goto,
        TokenKind::While,
        TokenKind::Return,
        TokenKind::Eof,
      ]
    );
    assert_eq!(
      kinds("Auto autos _auto"),
      vec![
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn word_literals_and_identifiers_keep_their_text() {
    let tokens = lex("count1 = 42;");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "count1");
    assert_eq!(tokens[1].kind, TokenKind::Equal);
    assert_eq!(tokens[2].kind, TokenKind::WordLiteral);
    assert_eq!(tokens[2].text, "42");
  }

  #[test]
  fn string_literal_text_excludes_quotes() {
    let tokens = lex("\"hello\";");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].text, "hello");
    assert_eq!(tokens[1].kind, TokenKind::Semicolon);
  }

  #[test]
  fn unterminated_string_becomes_an_error_token() {
    let tokens = lex("\"oops");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].text, "unterminated string");
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
  }

  #[test]
  fn unknown_character_becomes_an_error_token() {
    let tokens = lex("1 @ 2;");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].text, "unknown token");
  }

  #[test]
  fn lines_are_one_based_and_non_decreasing() {
    let tokens = lex("auto x;\nx = 1;\n\nx + 2;");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[3].line, 2); // x
    assert_eq!(tokens[7].line, 4); // x again, past the blank line
    for pair in tokens.windows(2) {
      assert!(pair[0].line <= pair[1].line);
    }
  }

  #[test]
  fn stream_ends_with_exactly_one_eof() {
    for source in ["", "   ", "1 + 2;", "auto x;\n"] {
      let tokens = lex(source);
      let eofs = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Eof)
        .count();
      assert_eq!(eofs, 1, "source {source:?}");
      assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
    }
  }

  #[test]
  fn lexing_is_deterministic() {
    let source = "auto x; x = 5 * (2 + 1); \"str\"; @";
    assert_eq!(lex(source), lex(source));
  }
}

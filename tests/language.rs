//! End-to-end tests driving the public pipeline over small B programs:
//! lexing, parsing, and both back ends.

use rbbc::ast::Word;
use rbbc::{generate_assembly, interpret};
use test_case::test_case;

fn eval(source: &str) -> Word {
  interpret("test.b", source).expect("program should evaluate")
}

#[test_case("2 + 3 * 4;", 14; "mul binds tighter than add")]
#[test_case("(2 + 3) * 4;", 20; "grouping overrides precedence")]
#[test_case("10 - 3 - 2;", 5; "sub folds left")]
#[test_case("100 / 5 / 2;", 10; "div folds left")]
#[test_case("-2 * 3;", -6; "neg binds tighter than mul")]
#[test_case("!0;", 1; "not zero")]
#[test_case("!5;", 0; "not nonzero")]
#[test_case("3 < 5;", 1; "less than")]
#[test_case("3 >= 5;", 0; "greater or equal fails")]
#[test_case("4 == 4;", 1; "equal")]
#[test_case("4 != 4;", 0; "not equal fails")]
#[test_case("7 % 3;", 1; "modulo")]
#[test_case("1 + 2 == 3;", 1; "arithmetic binds tighter than equality")]
#[test_case("2 < 3 == 1;", 1; "comparison binds tighter than equality")]
#[test_case("1 + 2; 10 * 2;", 20; "last statement wins")]
fn interpreter_results(source: &str, expected: Word) {
  assert_eq!(eval(source), expected);
}

// Both back ends consume the same tree; the arithmetic-only subset must
// be accepted by each without the other having run.
#[test_case("2 + 3 * 4;"; "precedence")]
#[test_case("(2 + 3) * 4;"; "grouping")]
#[test_case("10 - 3 - 2;"; "left fold")]
#[test_case("-2 * 3; !0;"; "unary operators")]
#[test_case("7 % 3; 100 / 5 / 2;"; "div and mod")]
fn both_back_ends_accept_the_arithmetic_subset(source: &str) {
  interpret("test.b", source).expect("interpreter should accept");
  generate_assembly("test.b", source).expect("code generator should accept");
}

#[test]
fn lexing_twice_parses_to_the_same_tree() {
  let source = "auto x;\nx = 5 * (2 + 1);\nx % 4;";
  let first = rbbc::parser::parse("test.b", rbbc::lexer::lex(source)).unwrap();
  let second = rbbc::parser::parse("test.b", rbbc::lexer::lex(source)).unwrap();
  assert_eq!(first, second);
}

#[test]
fn declared_variables_flow_through_their_frame_slot() {
  let asm = generate_assembly("test.b", "auto x; x = 5; x + 1;").unwrap();
  assert!(asm.contains("sub $8, %rsp"), "frame never grew:\n{asm}");
  assert!(asm.contains("mov %rax, -8(%rbp)"), "no store:\n{asm}");
  assert!(asm.contains("mov -8(%rbp), %rax"), "no load:\n{asm}");
  assert_eq!(asm.matches("push").count(), asm.matches("pop").count());
}

#[test_case("auto x; auto x;", "error: identifier 'x' already declared"; "duplicate declaration")]
#[test_case("y = 1;", "error: undeclared identifier 'y'"; "assignment to undeclared name")]
#[test_case("auto x; x = y;", "error: undeclared identifier 'y'"; "read of undeclared name")]
fn code_generator_semantic_errors(source: &str, expected: &str) {
  let err = generate_assembly("test.b", source).unwrap_err();
  assert_eq!(err.to_string(), expected);
}

#[test_case("5 = 3;", "test.b:1: error: invalid assignment target"; "literal target")]
#[test_case("(1 + 2;", "test.b:1: error: expected closing parenthesis, but got \";\""; "missing paren")]
#[test_case("1 + 2", "test.b:1: error: expected ';' after expression, but got \"EOF\""; "missing semicolon")]
#[test_case("auto 5;", "test.b:1: error: expected an identifier after 'auto', but got \"5\""; "declaring a literal")]
#[test_case("\"oops", "test.b:1: error: unterminated string"; "unterminated string")]
#[test_case("1 $ 2;", "test.b:1: error: unknown token"; "unknown character")]
fn syntax_errors_carry_file_and_line(source: &str, expected: &str) {
  let err = interpret("test.b", source).unwrap_err();
  assert_eq!(err.to_string(), expected);
}

#[test]
fn errors_on_later_lines_report_that_line() {
  let err = interpret("test.b", "1 + 1;\n2 +\n;").unwrap_err();
  assert_eq!(err.to_string(), "test.b:3: error: invalid token: \";\"");
}

#[test]
fn failed_parses_never_reach_a_back_end() {
  // Both entry points fail identically: the parse error propagates and
  // no partial AST is consumed.
  let from_interp = interpret("test.b", "(1 + 2;").unwrap_err();
  let from_codegen = generate_assembly("test.b", "(1 + 2;").unwrap_err();
  assert_eq!(from_interp.to_string(), from_codegen.to_string());
}

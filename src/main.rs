use std::env;
use std::fs;
use std::process;

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() < 2 || args.len() > 3 {
    let program = args.first().map(String::as_str).unwrap_or("rbbc");
    eprintln!("usage: {program} <input.b> [output.s]");
    process::exit(1);
  }

  let input = &args[1];
  let source = match fs::read_to_string(input) {
    Ok(source) => source,
    Err(_) => {
      eprintln!("error: failed to open file: {input}");
      process::exit(1);
    }
  };

  match args.get(2) {
    // No output path: evaluate with the tree-walking back end.
    None => match rbbc::interpret(input, &source) {
      Ok(result) => println!("Result: {result}"),
      Err(err) => {
        eprintln!("{err}");
        process::exit(1);
      }
    },
    // Output path given: emit assembly for the native back end.
    Some(output) => match rbbc::generate_assembly(input, &source) {
      Ok(asm) => {
        if fs::write(output, asm).is_err() {
          eprintln!("error: failed to write file: {output}");
          process::exit(1);
        }
      }
      Err(err) => {
        eprintln!("{err}");
        process::exit(1);
      }
    },
  }
}

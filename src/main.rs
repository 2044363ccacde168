//! Parseon CLI and REPL
//!
//! Usage:
//!   parseon run <file.eng>   - Execute a Parseon file
//!   parseon repl             - Start interactive REPL
//!   parseon help             - Show help message

use std::env;
use std::fs;
use std::process;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use parseon::{CancelFlag, Interpreter, Lexer, Parser, StdinInput, VERSION};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("{}: missing file argument", "error".red());
                eprintln!("Usage: parseon run <file.eng>");
                process::exit(1);
            }
            run_file(&args[2]);
        }
        "repl" => run_repl(),
        "help" | "--help" | "-h" => print_help(),
        "version" | "--version" | "-v" => println!("Parseon {}", VERSION),
        _ => {
            // Assume it's a file
            if args[1].ends_with(".eng") {
                run_file(&args[1]);
            } else {
                eprintln!("{}: unknown command '{}'", "error".red(), args[1]);
                print_help();
                process::exit(1);
            }
        }
    }
}

fn print_help() {
    println!("{}", "Parseon".cyan().bold());
    println!("An English-keyword scripting language");
    println!("{} {}\n", "Version".cyan(), VERSION);
    println!("{}", "USAGE:".yellow());
    println!("  parseon run <file.eng>   Execute a Parseon file");
    println!("  parseon repl             Start interactive REPL");
    println!("  parseon help             Show this help message");
    println!("  parseon version          Show version\n");
    println!("{}", "EXAMPLES:".yellow());
    println!("  parseon run demos/hello.eng");
    println!("  parseon repl\n");
    println!("{}", "LANGUAGE FEATURES:".yellow());
    println!("  set x = 10               Mutable binding");
    println!("  keep pi = 3.14           Immutable binding");
    println!("  say \"hello\"              Print a value");
    println!("  ask name                 Read one input value");
    println!("  when x > 5 do ... end    Conditional");
    println!("  loop i = 1 to 10 do ... end    Range loop");
    println!("  repeat (x < 3) do ... end      While loop");
}

fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{}: cannot read file '{}': {}", "error".red(), path, e);
            process::exit(1);
        }
    };

    let mut lexer = Lexer::new(&source);
    let tokens = match lexer.tokenize() {
        Ok(t) => t,
        Err(e) => {
            let err = e.with_source(&source);
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(p) => p,
        Err(e) => {
            let err = e.with_source(&source);
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(StdinInput, CancelFlag::new());
    let result = interpreter.execute(&program);

    for line in interpreter.output() {
        println!("{}", line);
    }

    if let Err(e) = result {
        let err = e.with_source(&source);
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run_repl() {
    println!("{} {} - {}",
        "Parseon".cyan().bold(),
        VERSION.cyan(),
        "An English-keyword scripting language".dimmed()
    );
    println!("Type {} to exit, {} for help\n",
        "exit".yellow(),
        "help".yellow()
    );

    let mut rl = DefaultEditor::new().expect("Failed to create REPL");

    // One interpreter for the whole session so bindings persist across
    // lines; ask reads from stdin in between readline prompts
    let mut interpreter = Interpreter::new(StdinInput, CancelFlag::new());

    loop {
        match rl.readline(&format!("{} ", "eng>".green().bold())) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Handle special commands
                match line {
                    "exit" | "quit" => {
                        println!("{}", "Goodbye!".cyan());
                        break;
                    }
                    "help" => {
                        print_repl_help();
                        continue;
                    }
                    "clear" => {
                        interpreter = Interpreter::new(StdinInput, CancelFlag::new());
                        println!("{}", "State cleared.".dimmed());
                        continue;
                    }
                    _ => {}
                }

                // Tokenize
                let mut lexer = Lexer::new(line);
                let tokens = match lexer.tokenize() {
                    Ok(t) => t,
                    Err(e) => {
                        let err = e.with_source(line);
                        eprintln!("{}", format!("{}", err).red());
                        continue;
                    }
                };

                // Parse
                let mut parser = Parser::new(tokens);
                let program = match parser.parse() {
                    Ok(p) => p,
                    Err(e) => {
                        let err = e.with_source(line);
                        eprintln!("{}", format!("{}", err).red());
                        continue;
                    }
                };

                // Execute; output produced before a failure is still shown
                let result = interpreter.execute(&program);
                for out in interpreter.take_output() {
                    println!("{}", out);
                }
                if let Err(e) = result {
                    let err = e.with_source(line);
                    eprintln!("{}", format!("{}", err).red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Err(err) => {
                eprintln!("{}: {:?}", "error".red(), err);
                break;
            }
        }
    }
}

fn print_repl_help() {
    println!("{}", "REPL Commands:".yellow());
    println!("  exit, quit   Exit the REPL");
    println!("  clear        Reset all variable bindings");
    println!("  help         Show this help\n");
    println!("{}", "Language Examples:".yellow());
    println!("  set x = 10");
    println!("  keep greeting = \"Hello \"");
    println!("  say greeting + \"World\"");
    println!("  loop i = 1 to 5 do show i end");
    println!("  show sqrt(144)");
}

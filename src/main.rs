use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cheesepp::{parse, parse_interactive, Runtime};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        if let Err(err) = run_repl() {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    } else if let Err(message) = run_script(&args[1]) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn run_script(filename: &str) -> Result<(), String> {
    let source = std::fs::read_to_string(filename)
        .map_err(|_| format!("{filename} not found. No such file or directory."))?;
    let program = parse(&source).map_err(|err| err.to_string())?;
    let mut runtime = Runtime::new();
    let result = runtime.run(&program, Some(&source));
    // Output buffered before a failure is still printed.
    let output = runtime.output();
    if !output.is_empty() {
        println!("{output}");
    }
    result.map_err(|err| err.to_string())
}

fn run_repl() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut runtime = Runtime::new();
    let mut printed = 0;
    loop {
        let readline = rl.readline("cheese++> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;
                match parse_interactive(&line) {
                    Ok(program) => {
                        if let Err(err) = runtime.run(&program, None) {
                            println!("{err}");
                        }
                    }
                    Err(err) => println!("{err}"),
                }
                for line in &runtime.output_lines()[printed..] {
                    println!("{line}");
                }
                printed = runtime.output_lines().len();
            }
            Err(ReadlineError::Interrupted) => {
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap::Subcommand;
use decimal_eval::harness;
use decimal_eval::{EvalError, Evaluator, Lexer};
use log::debug;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate arithmetic expressions over exact decimals")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate a single expression
    Eval { expression: String },
    /// Evaluate every line of a file
    Run { filename: PathBuf },
    /// Print the tokens of every line of a file
    Tokenize { filename: PathBuf },
    /// Run a file of `expression,expected` cases
    Check { filename: PathBuf },
}

fn read(filename: &Path) -> miette::Result<String> {
    debug!("reading {}", filename.display());
    fs::read_to_string(filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading `{}` failed", filename.display()))
}

fn report(line: usize, e: EvalError) -> ! {
    eprintln!("[line {line}] Error: {e}");
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(65);
}

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match args.command {
        Commands::Eval { expression } => match decimal_eval::evaluate(&expression) {
            Ok(value) => println!("{value}"),
            Err(e) => report(e.line(), e),
        },
        Commands::Run { filename } => {
            let file_contents = read(&filename)?;
            let name = filename.to_str();

            for (index, line) in file_contents.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match Evaluator::new(name, line).run() {
                    Ok(value) => println!("{value}"),
                    Err(e) => report(index + 1, e),
                }
            }
        }
        Commands::Tokenize { filename } => {
            let file_contents = read(&filename)?;
            let name = filename.to_str();

            for (index, line) in file_contents.lines().enumerate() {
                for token in Lexer::new(name, line) {
                    match token {
                        Ok(token) => println!("{token}"),
                        Err(e) => report(index + 1, e),
                    }
                }
            }
            println!("EOF  null");
        }
        Commands::Check { filename } => {
            let file_contents = read(&filename)?;
            let cases = harness::parse_cases(&file_contents)
                .into_diagnostic()
                .wrap_err_with(|| format!("parsing `{}` failed", filename.display()))?;

            let mut passed = 0;
            for case in &cases {
                let outcome = case.check();
                debug!("line {}: {outcome:?}", case.line);
                if outcome.is_correct() {
                    passed += 1;
                }
                println!("{outcome}");
            }
            println!("{passed}/{} passed", cases.len());

            if passed != cases.len() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

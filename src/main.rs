mod logs;

use std::{error::Error, fs, io::Read, process::ExitCode};

use first_follow_helper::Grammar;
use tracing::info;

fn print_help() {
    println!("Usage: first-follow-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  ff: FIRST and FOLLOW sets");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("Reads the grammar from stdin when no file is given.");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn run(
    outputs: &[&str],
    output_format: &OutputFormat,
    path: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let input: String = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().lock().read_to_string(&mut input)?;
            input
        }
    };

    let g = Grammar::parse(&input)?;
    info!(non_terminals = g.non_terminals.len(), "grammar parsed");

    for output in outputs {
        if *output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t)?,
                }
            );
        }
        if *output == "ff" {
            let sets = g.calculate_first_follow()?;
            let t = g.to_non_terminal_output_vec(&sets);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t)?,
                }
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    logs::init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut outputs: Vec<&str> = Vec::new();
    let mut i: usize = 0;
    while i < args.len() && ["prod", "ff"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;

    while i < args.len() && ["-h", "--help", "-l", "-j"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return ExitCode::SUCCESS;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::JSON;
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return ExitCode::FAILURE;
    }

    match run(&outputs, &output_format, args.get(i).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

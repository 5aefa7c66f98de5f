use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

use vmil_translator::Config;

#[derive(Parser)]
#[command(name = "vmil-translator")]
#[command(about = "Translate VM intermediate language into Hack assembly", long_about = None)]
struct Cli {
    /// A .vm file, or a directory whose .vm files are translated together
    input: PathBuf,

    /// Output file (defaults to X.asm beside X.vm, or D/D.asm for a directory D)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit bootstrap code that sets SP to 256 and calls Sys.init
    #[arg(long)]
    bootstrap: bool,
}

fn main() -> ExitCode {
    pretty_env_logger::init_timed();

    let cli = Cli::parse();
    let config = Config {
        input: cli.input,
        output: cli.output,
        bootstrap: cli.bootstrap,
    };

    match vmil_translator::run(&config) {
        Ok(output) => {
            println!("Translated: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use programma_cli::{Cli, execute, failure_message};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = execute(&cli) {
        println!("{}", failure_message(&err));
        std::process::exit(1);
    }
}

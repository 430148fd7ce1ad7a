mod cmd;

use clap::Parser;
use cmd::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Show(a) => a.run(),
        Commands::Optimize(a) => a.run(),
        Commands::CheckEquivalence(a) => a.run(),
    };
    if let Err(e) = res {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

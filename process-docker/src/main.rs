mod cli;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    // Juju reads plugin output from stdout, errors included.
    if let Err(e) = cli::run(cli) {
        println!("{e:#}");
        std::process::exit(1);
    }
}

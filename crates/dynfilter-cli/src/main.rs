use clap::Parser;
use dynfilter_cli::{logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(out) => {
            if !out.is_empty() {
                println!("{}", out);
            }
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    }
}

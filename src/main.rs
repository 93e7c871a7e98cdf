use clap::Parser;
use ipcount::{Config, ParserKind, Strategy};
use log::info;
use std::{path::PathBuf, process, time::Instant};

/// Counts distinct IPv4 addresses in a file with one address per line.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Config file, defaults to config.toml when present
    #[arg(short, long, default_value = "")]
    config: String,

    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    #[arg(short, long, value_enum)]
    parser: Option<ParserKind>,

    /// Worker threads for the concurrent strategy, 0 picks one per core
    #[arg(short, long)]
    workers: Option<usize>,

    file: PathBuf,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ipcount::Error> {
    let mut config = Config::parse(&args.config)?;
    config.apply_overrides(args.strategy, args.parser, args.workers);

    info!("{:?}", config);

    let start = Instant::now();
    let mut counter = config.strategy.build(&config);
    let tally = counter.count_file(&args.file)?;

    println!("Unique IPs: {}", tally.unique);
    println!("Malformed lines: {}", tally.malformed);
    println!("Time taken: {:?}", start.elapsed());

    Ok(())
}

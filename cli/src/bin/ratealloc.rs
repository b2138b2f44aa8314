use definitions::{Allocation, AllocationInput};
use std::io::{BufReader, BufWriter, Write};
#[macro_use]
extern crate log;

fn main() -> std::io::Result<()> {
    let matches = ratealloc_cli::commands::ratealloc_parser().get_matches();
    if let Some((_, sub_m)) = matches.subcommand() {
        let level = match sub_m.get_count("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }
    match matches.subcommand() {
        Some(("distribute", sub_m)) => distribute(sub_m),
        _ => unreachable!(),
    }
}

fn distribute(matches: &clap::ArgMatches) -> std::io::Result<()> {
    let input = get_input(matches.get_one::<String>("input").unwrap())?;
    let algorithm: &String = matches.get_one("algorithm").unwrap();
    let seed: u64 = *matches.get_one("seed").unwrap();
    // The parser restricts the algorithm to the registered names.
    let distributor = allocator::distributor_by_name(algorithm, seed).unwrap();
    debug!("START\tDistribute\t{}", distributor.name());
    let allocation =
        match distributor.compute_distribution(&input.choices, &input.ratings, &input.raters) {
            Ok(allocation) => allocation,
            Err(why) => {
                eprintln!("Allocation failed: {}", why);
                std::process::exit(1);
            }
        };
    let summary = allocator::satisfaction::summarize(&input, &allocation);
    info!(
        "DISTRIBUTE\t{}\tPlaced\t{}\tUnplaced",
        summary.placed,
        summary.unplaced.len()
    );
    if log_enabled!(log::Level::Info) {
        let stderr = std::io::stderr();
        summary.write(stderr.lock())?;
    }
    flush_allocation(&allocation, matches.get_one::<String>("output"))
}

fn get_input(path: &str) -> std::io::Result<AllocationInput> {
    let parsed: Result<AllocationInput, _> = if path == "-" {
        let stdin = std::io::stdin();
        serde_json::de::from_reader(BufReader::new(stdin.lock()))
    } else {
        let rdr = std::fs::File::open(path).map(BufReader::new)?;
        serde_json::de::from_reader(rdr)
    };
    match parsed {
        Err(why) => {
            eprintln!("{:?}", why);
            eprintln!("Invalid input message.");
            Err(std::io::Error::from(std::io::ErrorKind::Other))
        }
        Ok(input) => Ok(input),
    }
}

fn flush_allocation(allocation: &Allocation, output: Option<&String>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            let mut wtr = std::fs::File::create(path).map(BufWriter::new)?;
            serde_json::ser::to_writer_pretty(&mut wtr, allocation)?;
            writeln!(&mut wtr)
        }
        None => {
            let stdout = std::io::stdout();
            let mut wtr = BufWriter::new(stdout.lock());
            serde_json::ser::to_writer_pretty(&mut wtr, allocation)?;
            writeln!(&mut wtr)
        }
    }
}

use clap::{Arg, ArgAction, Command};

pub fn ratealloc_parser() -> Command {
    Command::new("ratealloc")
        .version("0.1.0")
        .about("Distribute raters into capacity-limited choices based on their ratings.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(subcommand_distribute())
}

fn subcommand_distribute() -> Command {
    Command::new("distribute")
        .version("0.1")
        .about("Run one allocation over a JSON input message.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Debug mode"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .value_name("JSON")
                .required(true)
                .help("Input JSON file. Use '-' for STDIN."),
        )
        .arg(
            Arg::new("algorithm")
                .long("algorithm")
                .short('a')
                .value_name("NAME")
                .default_value(allocator::edmonds_karp::NAME)
                .value_parser(allocator::ALGORITHM_NAMES)
                .help("Allocation strategy."),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .default_value("0")
                .value_parser(clap::value_parser!(u64))
                .help("Seed of the deferred-acceptance ranking shuffle."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("JSON")
                .help("Output JSON file. Defaults to STDOUT."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn distribute_parses() {
        let matches = ratealloc_parser()
            .try_get_matches_from(["ratealloc", "distribute", "-i", "input.json", "-vv"])
            .unwrap();
        let (name, sub_m) = matches.subcommand().unwrap();
        assert_eq!(name, "distribute");
        assert_eq!(sub_m.get_count("verbose"), 2);
        assert_eq!(
            sub_m.get_one::<String>("algorithm").unwrap(),
            allocator::edmonds_karp::NAME
        );
        assert_eq!(*sub_m.get_one::<u64>("seed").unwrap(), 0);
    }
    #[test]
    fn unknown_algorithm_is_rejected() {
        let result = ratealloc_parser().try_get_matches_from([
            "ratealloc",
            "distribute",
            "-i",
            "input.json",
            "-a",
            "simplex",
        ]);
        assert!(result.is_err());
    }
    #[test]
    fn input_is_required() {
        let result = ratealloc_parser().try_get_matches_from(["ratealloc", "distribute"]);
        assert!(result.is_err());
    }
}

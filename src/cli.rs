use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

#[derive(Debug, Default)]
pub struct CliOptions {
    pub log_file: Option<PathBuf>,
}

fn command() -> Command {
    Command::new("connwatch")
        .version("0.1.0")
        .about("Live view of network connections and the processes that own them")
        .arg(
            Arg::new("log-file")
                .short('l')
                .long("log-file")
                .help("Append diagnostics to this file (filtered by RUST_LOG, default info)")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
}

pub fn parse_args() -> CliOptions {
    options_from(command().get_matches())
}

fn options_from(matches: clap::ArgMatches) -> CliOptions {
    CliOptions {
        log_file: matches.get_one::<PathBuf>("log-file").cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_disables_log_file() {
        let matches = command().try_get_matches_from(["connwatch"]).expect("parse");
        assert!(options_from(matches).log_file.is_none());
    }

    #[test]
    fn log_file_is_parsed_as_path() {
        let matches = command()
            .try_get_matches_from(["connwatch", "--log-file", "/tmp/connwatch.log"])
            .expect("parse");
        assert_eq!(options_from(matches).log_file, Some(PathBuf::from("/tmp/connwatch.log")));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(command().try_get_matches_from(["connwatch", "--interval", "5"]).is_err());
    }

    #[test]
    fn command_definition_is_valid() {
        command().debug_assert();
    }
}

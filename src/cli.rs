use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// RIFF or BW64 input file
    pub input: PathBuf,

    /// Byte offset of the RIFF data inside the file
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Validate the whole chunk tree instead of dumping it
    #[arg(long)]
    pub validate: bool,

    /// Count the chunks in the top level instead of dumping the tree
    #[arg(long, conflicts_with = "validate")]
    pub count: bool,

    /// Suppress structural diagnostics
    #[arg(long)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}

#[cfg(test)]
mod tests {
    use super::CliOptions;
    use clap::Parser;

    #[test]
    fn parses_plain_input() {
        let opts = CliOptions::try_parse_from(["riffpull", "take.wav"]).expect("parse");
        assert_eq!(opts.input.to_str(), Some("take.wav"));
        assert_eq!(opts.offset, 0);
        assert!(!opts.validate);
        assert!(!opts.count);
    }

    #[test]
    fn parses_validate_flag() {
        let opts =
            CliOptions::try_parse_from(["riffpull", "take.wav", "--validate"]).expect("parse");
        assert!(opts.validate);
    }

    #[test]
    fn parses_offset() {
        let opts = CliOptions::try_parse_from(["riffpull", "movie.avi", "--offset", "512"])
            .expect("parse");
        assert_eq!(opts.offset, 512);
    }

    #[test]
    fn validate_and_count_conflict() {
        let result =
            CliOptions::try_parse_from(["riffpull", "take.wav", "--validate", "--count"]);
        assert!(result.is_err());
    }
}

//! Command-line argument parsing for the haptic clip player.

use haptic_clip::SinkKind;
use std::env;

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Clip files to play, in order
    pub files: Vec<String>,
    /// Configuration file
    pub config_path: Option<String>,
    /// Frame rate override
    pub tick_rate_hz: Option<f32>,
    /// Sink override
    pub sink: Option<SinkKind>,
    /// Record samples and print them after each clip
    pub dump: bool,
    /// Debug-level logging
    pub verbose: bool,
    /// Whether help was requested
    pub show_help: bool,
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments from an iterator (program name excluded).
    pub fn parse_from<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut args = Self::default();
        let mut iter = iter.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if arg.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            match flag.as_str() {
                "--help" | "-h" => args.show_help = true,
                "--dump" => args.dump = true,
                "--verbose" | "-v" => args.verbose = true,
                "--config" | "--rate" | "--sink" => {
                    let Some(value) = inline.or_else(|| iter.next()) else {
                        eprintln!("{} requires an argument", flag);
                        args.show_help = true;
                        continue;
                    };
                    args.apply_option(&flag, value);
                }
                _ if arg.starts_with('-') => {
                    eprintln!("Unknown flag: {}", arg);
                    args.show_help = true;
                }
                _ => args.files.push(arg),
            }
        }

        args
    }

    fn apply_option(&mut self, flag: &str, value: String) {
        match flag {
            "--config" => self.config_path = Some(value),
            "--rate" => match value.parse::<f32>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => self.tick_rate_hz = Some(rate),
                _ => {
                    eprintln!("Invalid tick rate: {}", value);
                    self.show_help = true;
                }
            },
            _ => match SinkKind::from_name(&value) {
                Some(kind) => self.sink = Some(kind),
                None => {
                    eprintln!("Unknown sink: {}", value);
                    self.show_help = true;
                }
            },
        }
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  haptic-clip [--config FILE] [--rate HZ] [--sink KIND] [--dump] <clip.haptic>...\n\n\
             Flags:\n\
             \x20 --config FILE   JSON engine configuration\n\
             \x20 --rate HZ       Playback frame rate (default 60)\n\
             \x20 --sink KIND     Actuator sink: null, log (default), recording\n\
             \x20 --dump          Print every emitted sample as CSV after each clip\n\
             \x20 -v, --verbose   Debug-level logging\n\
             \x20 -h, --help      Show this help\n\n\
             Examples:\n\
             \x20 haptic-clip knock.haptic\n\
             \x20 haptic-clip --rate 120 --dump knock.haptic rumble.haptic\n"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_flags_and_files() {
        let args = parse(&["--rate", "120", "--sink=null", "--dump", "a.haptic", "b.haptic"]);
        assert_eq!(args.tick_rate_hz, Some(120.0));
        assert_eq!(args.sink, Some(SinkKind::Null));
        assert!(args.dump);
        assert_eq!(args.files, vec!["a.haptic", "b.haptic"]);
        assert!(!args.show_help);
    }

    #[test]
    fn test_invalid_values_request_help() {
        assert!(parse(&["--rate", "fast", "a.haptic"]).show_help);
        assert!(parse(&["--sink", "android", "a.haptic"]).show_help);
        assert!(parse(&["--config"]).show_help);
        assert!(parse(&["--loop", "a.haptic"]).show_help);
    }
}

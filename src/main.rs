#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!(
        "The haptic-clip CLI requires the \"cli\" feature. Rebuild with `--features cli` to enable playback."
    );
}

#[cfg(feature = "cli")]
mod args;

#[cfg(feature = "cli")]
mod cli {
    use std::fs;
    use std::io;
    use std::thread;
    use std::time::{Duration, Instant};

    use anyhow::{anyhow, Context};
    use haptic_clip::{
        HapticConfig, HapticSession, HapticSource, PlaybackState, RecordedFrame, RecordingSink,
        SessionRegistry,
    };
    use log::{info, LevelFilter};
    use log4rs::append::console::{ConsoleAppender, Target};
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    use crate::args::CliArgs;

    fn init_logging(verbose: bool) -> anyhow::Result<()> {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{h({l:5})} {t} - {m}{n}")))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(level))
            .map_err(|e| anyhow!("Invalid logging configuration: {}", e))?;
        log4rs::init_config(config).map_err(|e| anyhow!("Failed to install logger: {}", e))?;
        Ok(())
    }

    fn load_config(args: &CliArgs) -> anyhow::Result<HapticConfig> {
        let mut config = match &args.config_path {
            Some(path) => HapticConfig::from_file(path)
                .with_context(|| format!("Failed to load config '{}'", path))?,
            None => HapticConfig::default(),
        };
        if let Some(rate) = args.tick_rate_hz {
            config.tick_rate_hz = rate;
        }
        if let Some(sink) = args.sink {
            config.sink = sink;
        }
        config.validate()?;
        Ok(config)
    }

    fn print_frames(channels: &[String], frames: &[RecordedFrame]) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_writer(io::stdout());
        writer.write_record(std::iter::once("time").chain(channels.iter().map(String::as_str)))?;
        for frame in frames {
            let record = std::iter::once(format!("{:.4}", frame.time))
                .chain(frame.values.iter().map(|v| format!("{:.4}", v)));
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn play_to_end(session: &HapticSession, interval: Duration) {
        while session.state() == PlaybackState::Playing {
            session.tick();
            thread::sleep(interval);
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let args = CliArgs::parse();
        if args.show_help || args.files.is_empty() {
            CliArgs::print_help();
            if args.show_help {
                return Ok(());
            }
            return Err(anyhow!("no clip file given"));
        }

        init_logging(args.verbose)?;
        let config = load_config(&args)?;
        let interval = Duration::from_secs_f64(config.tick_interval_secs());

        let registry = SessionRegistry::global();
        let recording = RecordingSink::new();
        let mut builder = HapticSession::builder(config.clone());
        if args.dump {
            builder = builder.sink(Box::new(recording.clone()));
        }
        let session = builder.register(registry)?;

        let mut sources = Vec::with_capacity(args.files.len());
        for path in &args.files {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read clip '{}'", path))?;
            sources.push(HapticSource::bind(registry, path.as_str(), data)?);
        }

        for source in &sources {
            source
                .play()
                .with_context(|| format!("Failed to play '{}'", source.name()))?;

            if let Some(metadata) = session.metadata().filter(|m| !m.is_empty()) {
                for (label, value) in [
                    ("Project", metadata.project),
                    ("Author", metadata.author),
                    ("Description", metadata.description),
                ] {
                    if let Some(value) = value {
                        println!("{:<12} {}", format!("{}:", label), value);
                    }
                }
            }
            let channels = session.channel_names();
            println!(
                "Playing {} ({:.3}s, channels: {}) at {} Hz",
                source.name(),
                session.duration().unwrap_or_default(),
                channels.join(", "),
                config.tick_rate_hz
            );

            let started = Instant::now();
            play_to_end(&session, interval);
            info!(
                "Finished {} after {:.3}s",
                source.name(),
                started.elapsed().as_secs_f64()
            );

            if args.dump {
                print_frames(&channels, &recording.take_frames())?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::run()
}

//! Mirador locomotion sandbox.
//!
//! Opens a window and drives the locomotion controller from the keyboard and
//! mouse, or with `--headless` runs a seeded random-input soak and reports any
//! invariant the controller broke.
//!
//! # Usage
//! ```text
//! mirador-locomotion [config.yaml] [--headless [seconds]] [--seed N]
//! ```
//! Without a path argument the config is read from `LOCOMOTION_CONFIG`, and
//! without either the built-in defaults are used. Logging honours `RUST_LOG`.

mod app;
mod headless;

use std::path::PathBuf;

use mirador_locomotion::LocomotionConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

const DEFAULT_SOAK_SECONDS: f32 = 10.0;

#[derive(Debug, thiserror::Error, PartialEq)]
enum UsageError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unexpected argument: {0}")]
    Unexpected(String),
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    headless: Option<f32>,
    seed: Option<u64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, UsageError> {
    let mut options = Options::default();
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => {
                let seconds = match args.peek().map(|next| next.parse::<f32>()) {
                    Some(Ok(seconds)) if seconds.is_finite() && seconds > 0.0 => {
                        args.next();
                        seconds
                    }
                    Some(Ok(_)) => {
                        return Err(UsageError::InvalidValue {
                            flag: "--headless",
                            value: args.next().unwrap_or_default(),
                        });
                    }
                    _ => DEFAULT_SOAK_SECONDS,
                };
                options.headless = Some(seconds);
            }
            "--seed" => {
                let value = args.next().ok_or(UsageError::MissingValue("--seed"))?;
                let seed = value.parse().map_err(|_| UsageError::InvalidValue {
                    flag: "--seed",
                    value: value.clone(),
                })?;
                options.seed = Some(seed);
            }
            _ if arg.starts_with("--") => return Err(UsageError::Unexpected(arg)),
            _ if options.config.is_none() => options.config = Some(PathBuf::from(arg)),
            _ => return Err(UsageError::Unexpected(arg)),
        }
    }
    Ok(options)
}

fn load_config(path: Option<PathBuf>) -> Result<LocomotionConfig, Box<dyn std::error::Error>> {
    let path = path.or_else(|| std::env::var_os("LOCOMOTION_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading locomotion config");
            Ok(LocomotionConfig::from_file(&path)?)
        }
        None => {
            info!("no config given, using defaults");
            Ok(LocomotionConfig::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    let config = load_config(options.config)?;

    if let Some(seconds) = options.headless {
        let seed = options.seed.unwrap_or_else(rand::random::<u64>);
        let report = headless::run(config, seconds, seed)?;
        if report.violations > 0 {
            return Err(format!("{} invariant violations", report.violations).into());
        }
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse_args(args(&[])), Ok(Options::default()));
    }

    #[test]
    fn test_config_and_headless_with_seconds() {
        let options = parse_args(args(&["tuning.yaml", "--headless", "2.5", "--seed", "9"])).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("tuning.yaml")));
        assert_eq!(options.headless, Some(2.5));
        assert_eq!(options.seed, Some(9));
    }

    #[test]
    fn test_headless_without_seconds_uses_default() {
        let options = parse_args(args(&["--headless", "tuning.yaml"])).unwrap();
        assert_eq!(options.headless, Some(DEFAULT_SOAK_SECONDS));
        assert_eq!(options.config, Some(PathBuf::from("tuning.yaml")));
    }

    #[test]
    fn test_bad_arguments() {
        assert_eq!(
            parse_args(args(&["--seed"])),
            Err(UsageError::MissingValue("--seed"))
        );
        assert!(matches!(
            parse_args(args(&["--seed", "abc"])),
            Err(UsageError::InvalidValue { flag: "--seed", .. })
        ));
        assert!(matches!(
            parse_args(args(&["--headless", "-1"])),
            Err(UsageError::InvalidValue { flag: "--headless", .. })
        ));
        assert_eq!(
            parse_args(args(&["a.yaml", "b.yaml"])),
            Err(UsageError::Unexpected("b.yaml".to_string()))
        );
        assert_eq!(
            parse_args(args(&["--fast"])),
            Err(UsageError::Unexpected("--fast".to_string()))
        );
    }
}

//! Shared flag parsing for the math-runner binaries.
//!
//! Flags are `--name value` pairs; unknown flags are ignored.

use rtp_core::MathConfig;

pub const DEFAULT_LIBRARY_DIR: &str = "math/library";

pub fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

pub fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// `--config FILE` if given, otherwise the built-in reference tables.
pub fn load_config(args: &[String]) -> anyhow::Result<MathConfig> {
    match str_arg(args, "--config") {
        Some(path) => MathConfig::load(path),
        None => Ok(MathConfig::reference()),
    }
}

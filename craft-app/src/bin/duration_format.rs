//! `duration-format --seconds <N> --locale {en|uk}`
//!
//! Prints the largest whole unit that fits in `N` seconds. Exits non-zero on
//! negative input or an unrecognised locale unless `--fallback-locale` is set.

use anyhow::Result;
use clap::Parser;
use craft_common::observability::{LogConfig, init_logging};
use craft_format::{DurationFormatter, Locale};

/// Render a number of seconds as its largest whole unit
#[derive(Parser, Debug)]
#[command(name = "duration-format", version)]
struct Args {
    /// Non-negative number of seconds
    #[arg(short, long, allow_negative_numbers = true)]
    seconds: i64,

    /// Locale tag: en or uk
    #[arg(short, long, default_value = "en")]
    locale: String,

    /// Locale used when --locale is not recognised
    #[arg(long, value_name = "en|uk")]
    fallback_locale: Option<Locale>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig {
        app_name: "duration-format",
        ..LogConfig::default()
    })?;

    let formatter = match args.fallback_locale {
        Some(locale) => DurationFormatter::new().with_fallback(locale),
        None => DurationFormatter::new(),
    };
    let phrase = formatter.format(args.seconds, &args.locale)?;
    tracing::debug!(target: "craft.duration", seconds = args.seconds, locale = %args.locale, "duration.formatted");
    println!("{phrase}");
    Ok(())
}

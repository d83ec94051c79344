/// Command line entry point for the banking day calculator
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use bankday::{config::load_settings, FedCalendar};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "bankday")]
#[command(about = "Next U.S. banking day per the Federal Reserve holiday calendar")]
struct Args {
    /// Reference instant (RFC 3339). Defaults to now.
    instant: Option<String>,

    /// Number of banking days to advance.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Keep the reference time of day instead of snapping to 9:00 AM Eastern.
    #[arg(long)]
    no_business_hours: bool,

    /// TOML config file.
    #[arg(short, long, env = "BANKDAY_CONFIG")]
    config: Option<PathBuf>,

    /// Print the observed Fed holidays of a year and exit.
    #[arg(long, value_name = "YEAR")]
    holidays: Option<i32>,

    /// Report whether the reference instant is itself a banking day.
    #[arg(long)]
    check: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_settings(args.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bankday={}", config.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Configuration loaded: {:?}", config);

    let mut options = config.advance_options();
    if args.no_business_hours {
        options.use_business_hours = false;
    }
    let calendar = FedCalendar::new(config)?;

    if let Some(year) = args.holidays {
        print_holidays(&calendar, year, args.json)?;
        return Ok(());
    }

    let reference = match &args.instant {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid RFC 3339 instant: {}", s))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    if args.check {
        let (is_banking_day, holiday) = calendar.check_if_banking_day(reference);
        if args.json {
            let out = serde_json::json!({
                "date": format_instant(reference),
                "is_banking_day": is_banking_day,
                "holiday": holiday,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            match holiday {
                Some(name) => println!("{}: holiday ({})", format_instant(reference), name),
                None if is_banking_day => println!("{}: banking day", format_instant(reference)),
                None => println!("{}: weekend", format_instant(reference)),
            }
        }
        return Ok(());
    }

    let result = match calendar.next_banking_day(reference, args.count, options) {
        Ok(result) => result,
        Err(e) => {
            if e.is_caller_error() {
                warn!("[{}] Rejected request: {}", e.error_code(), e);
            } else {
                error!("[{}] Calendar failure: {}", e.error_code(), e);
            }
            return Err(e.into());
        }
    };

    info!(
        "{} + {} banking day(s) -> {}",
        format_instant(reference),
        args.count,
        format_instant(result.date)
    );

    if args.json {
        let out = serde_json::json!({
            "reference": format_instant(reference),
            "count": args.count,
            "date": format_instant(result.date),
            "holiday": result.holiday,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match result.holiday {
            Some(name) => println!("{}  (skipped {})", format_instant(result.date), name),
            None => println!("{}", format_instant(result.date)),
        }
    }

    Ok(())
}

fn print_holidays(calendar: &FedCalendar, year: i32, json: bool) -> Result<()> {
    let holidays = calendar.holidays_in_year(year);

    if json {
        let out: Vec<_> = holidays
            .iter()
            .map(|(date, name)| serde_json::json!({ "date": date, "name": name }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Federal Reserve holidays {}", year);
        for (date, name) in &holidays {
            println!("  {} {}  {}", date.format("%Y-%m-%d"), date.format("%a"), name);
        }
    }

    Ok(())
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

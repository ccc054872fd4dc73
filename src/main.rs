//! Yearly command-line front end
//!
//! Records country visits and prints the yearly calendar and statistics.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yearly::{
    config::{AppConfig, LoggingConfig},
    models::{country::CountryDirectory, visit::CreateVisits},
    services::calendar::MonthView,
    AppError, AppState,
};

#[derive(Parser)]
#[command(name = "yearly")]
#[command(version)]
#[command(about = "Record the countries you visit each day of the year", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a country for a day or an inclusive range of days
    Add {
        /// Two-letter country code
        country: String,
        /// First day (YYYY-MM-DD)
        start: NaiveDate,
        /// Last day, defaults to the first
        end: Option<NaiveDate>,
    },
    /// Delete one visit
    Remove { id: String },
    /// Print every visit
    List,
    /// Statistics for a year
    Stats {
        year: i32,
        /// Entries per ranking, 0 for all
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Month grid
    Calendar {
        year: i32,
        /// Month (1-12)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
    /// Print the stored collection
    Export,
    /// Replace every visit with a file's contents
    Import { file: PathBuf },
    /// Delete every visit
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app) if app.is_user_error() => eprintln!("{}", app),
                _ => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::debug!("Starting Yearly v{}", env!("CARGO_PKG_VERSION"));

    let mut state = AppState::new(config)?;
    let services = &mut state.services;

    match cli.command {
        Commands::Add { country, start, end } => {
            let request =
                CreateVisits::new(country.to_ascii_uppercase(), start, end.unwrap_or(start));
            let added = services.visits.add(&request)?;
            println!(
                "Added {} day(s) in {}",
                added.len(),
                services.countries.display_name(&request.country_code)
            );
        }
        Commands::Remove { id } => {
            let removed = services.visits.remove(&id)?;
            println!("Removed {} on {}", removed.country_code, removed.date);
        }
        Commands::List => {
            println!("{}", serde_json::to_string_pretty(services.visits.list())?);
        }
        Commands::Stats { year, limit } => {
            println!("{}", serde_json::to_string_pretty(&services.year_stats(year, limit))?);
        }
        Commands::Calendar { year, month } => {
            let view = services.month_view(year, month - 1)?;
            print!("{}", render_month(&view, services.today()));
        }
        Commands::Export => {
            println!("{}", services.visits.export()?);
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = services.visits.import(&json)?;
            println!("Imported {} visit(s)", count);
        }
        Commands::Reset => {
            services.visits.reset()?;
            println!("All visits deleted");
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("yearly={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Text grid: day number followed by the codes recorded that day
fn render_month(view: &MonthView, today: Option<NaiveDate>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:04}-{:02}\n", view.year, view.month + 1));
    for label in view.weekdays {
        out.push_str(&format!("{:<10}", label));
    }
    out.push('\n');

    for week in &view.weeks {
        for cell in week {
            let text = match cell {
                Some(cell) => {
                    let marker = if Some(cell.date) == today { "*" } else { "" };
                    let codes: Vec<&str> =
                        cell.visits.iter().map(|v| v.country_code.as_str()).collect();
                    format!("{}{:>2} {}", marker, chrono::Datelike::day(&cell.date), codes.join(","))
                }
                None => String::new(),
            };
            out.push_str(&format!("{:<10}", text));
        }
        out.push('\n');
    }
    out
}

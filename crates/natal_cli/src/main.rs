use std::io::Write;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use natal_chart::chart::{parse_date, parse_time};
use natal_chart::{ChartBuilder, ChartRequest, HouseSolver, PlanetsResponse, format_deg_min};
use natal_config::NatalConfig;
use natal_ephem::{AnalyticModel, CelestialBody, EphemerisTable};
use natal_time::{TimeResolver, UtcTime, ZoneSpec};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "natal", about = "Natal chart engine CLI")]
struct Cli {
    /// Config file (defaults to $NATAL_CONFIG, then ./natal.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Planets, houses and aspects for a civil time and place
    Chart {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local time (HH:MM:SS)
        #[arg(long, default_value = "00:00:00")]
        time: String,
        /// Latitude in degrees, north positive
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees, east positive
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Print the full chart instead of the planets response
        #[arg(long)]
        raw: bool,
    },
    /// Sun position for a civil time in an explicit timezone
    Sun {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local time (HH:MM:SS)
        #[arg(long, default_value = "00:00:00")]
        time: String,
        /// IANA zone name or hour offset, e.g. Europe/Paris or -3.5
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        timezone: String,
    },
    /// House cusps only (no ephemeris needed)
    Houses {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local time (HH:MM:SS)
        #[arg(long, default_value = "00:00:00")]
        time: String,
        /// Latitude in degrees, north positive
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees, east positive
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Julian Day, Delta-T and sidereal time for a civil time
    Jd {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local time (HH:MM:SS)
        #[arg(long, default_value = "00:00:00")]
        time: String,
        /// IANA zone name or hour offset
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        timezone: String,
    },
    /// Write an ephemeris table sampled from the analytic model
    Tabulate {
        /// First date (YYYY-MM-DD, 0h TT)
        #[arg(long)]
        start: String,
        /// Last date to cover (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Sample spacing in days
        #[arg(long, default_value = "1.0")]
        step: f64,
        /// Comma-separated body names (default: all modelled bodies)
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<String>,
        /// Output file (stdout when absent)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Chart {
            date,
            time,
            lat,
            lon,
            raw,
        } => {
            let request = ChartRequest::parse(&date, Some(&time), lat, lon)
                .unwrap_or_else(|e| fail("Invalid request", e));
            let builder = load_builder(cli.config.as_ref());
            let chart = builder
                .build(&request)
                .unwrap_or_else(|e| fail("Chart failed", e));
            if raw {
                print_json(&chart, cli.pretty);
            } else {
                print_json(&PlanetsResponse::from(&chart), cli.pretty);
            }
        }

        Commands::Sun {
            date,
            time,
            timezone,
        } => {
            let (date, time) = require_date_time(&date, &time);
            let zone = require_zone(&timezone);
            let builder = load_builder(cli.config.as_ref());
            let report = builder
                .sun_report(date, time, &zone)
                .unwrap_or_else(|e| fail("Sun report failed", e));
            print_json(&report, cli.pretty);
        }

        Commands::Houses {
            date,
            time,
            lat,
            lon,
        } => {
            let (date, time) = require_date_time(&date, &time);
            let config = load_config(cli.config.as_ref());
            let resolver = TimeResolver::new(config.time);
            let moment = resolver
                .resolve(date, time, lat, lon)
                .unwrap_or_else(|e| fail("Time resolution failed", e));
            let solver =
                HouseSolver::new(config.houses).unwrap_or_else(|e| fail("Invalid config", e));
            let houses = solver
                .solve(&moment, lat)
                .unwrap_or_else(|e| fail("House computation failed", e));
            println!(
                "{} houses, {} (UTC {}), RAMC {:.4} deg, obliquity {:.4} deg",
                houses.system,
                moment.timezone,
                moment.utc,
                houses.ramc_deg,
                houses.obliquity_deg
            );
            for cusp in &houses.cusps {
                let label = match cusp.index {
                    1 => " (Asc)",
                    4 => " (IC)",
                    7 => " (Dsc)",
                    10 => " (MC)",
                    _ => "",
                };
                println!(
                    "{:>2}: {:>9.4} deg  {} {}{}",
                    cusp.index,
                    cusp.longitude,
                    format_deg_min(cusp.longitude),
                    natal_chart::Sign::from_longitude(cusp.longitude),
                    label
                );
            }
        }

        Commands::Jd {
            date,
            time,
            timezone,
        } => {
            let (date, time) = require_date_time(&date, &time);
            let zone = require_zone(&timezone);
            let config = load_config(cli.config.as_ref());
            let moment = TimeResolver::new(config.time)
                .resolve_in_zone(date, time, &zone)
                .unwrap_or_else(|e| fail("Time resolution failed", e));
            println!("UTC:      {}", UtcTime::from(moment.utc));
            println!("JD (UT):  {:.6}", moment.jd_ut);
            println!("JD (TT):  {:.6}", moment.jd_tt);
            println!("Delta-T:  {:.2} s", moment.delta_t_seconds);
            println!("GMST:     {:.6} deg", moment.gmst_deg);
        }

        Commands::Tabulate {
            start,
            end,
            step,
            bodies,
            out,
        } => {
            let start_jd = date_to_jd(&start);
            let end_jd = date_to_jd(&end);
            let bodies = if bodies.is_empty() {
                CelestialBody::all()
                    .iter()
                    .copied()
                    .filter(|b| AnalyticModel.supports(*b))
                    .collect()
            } else {
                bodies.iter().map(|s| require_body(s)).collect::<Vec<_>>()
            };
            let table = EphemerisTable::tabulate(&AnalyticModel, &bodies, start_jd, end_jd, step)
                .unwrap_or_else(|e| fail("Tabulation failed", e));
            match out {
                Some(path) => {
                    table
                        .save(&path)
                        .unwrap_or_else(|e| fail("Write failed", e));
                    info!(path = %path.display(), "table written");
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    table
                        .write_to(&mut lock)
                        .and_then(|()| lock.flush())
                        .unwrap_or_else(|e| fail("Write failed", e));
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

fn load_config(path: Option<&PathBuf>) -> NatalConfig {
    NatalConfig::load_or_default(path.map(PathBuf::as_path))
        .unwrap_or_else(|e| fail("Failed to load config", e))
}

fn load_builder(path: Option<&PathBuf>) -> ChartBuilder {
    load_config(path)
        .chart_builder()
        .unwrap_or_else(|e| fail("Failed to build ephemeris", e))
}

fn require_date_time(date: &str, time: &str) -> (NaiveDate, NaiveTime) {
    let date = parse_date(date).unwrap_or_else(|e| fail("Invalid date", e));
    let time = parse_time(time).unwrap_or_else(|e| fail("Invalid time", e));
    (date, time)
}

fn require_zone(s: &str) -> ZoneSpec {
    s.parse().unwrap_or_else(|e| fail("Invalid timezone", e))
}

fn require_body(s: &str) -> CelestialBody {
    s.parse().unwrap_or_else(|e| {
        let valid: Vec<_> = CelestialBody::all().iter().map(|b| b.name()).collect();
        eprintln!("Valid: {}", valid.join(", "));
        fail("Invalid body", e)
    })
}

/// JD (0h) of a calendar date.
fn date_to_jd(s: &str) -> f64 {
    let date = parse_date(s).unwrap_or_else(|e| fail("Invalid date", e));
    UtcTime::from(date.and_time(NaiveTime::MIN)).to_jd()
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match text {
        Ok(text) => println!("{text}"),
        Err(e) => fail("Serialization failed", e),
    }
}

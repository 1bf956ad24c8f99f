//! lotwatch – command-line dashboard for the license-plate recognition
//! backend.
//!
//! Lists parking lots and detections, and requests occupancy and vehicle
//! activity reports. Logs go to stderr, rendered views to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use lotwatch_common::config;
use lotwatch_common::filter::{FilterForm, ReportKind, VisitBounds};
use lotwatch_common::scope::Scope;
use lotwatch_common::time_range::{DateRange, TimeOfDay};
use lotwatch_dashboard::api::ApiClient;
use lotwatch_dashboard::listing::DetectionListing;
use lotwatch_dashboard::render;
use lotwatch_dashboard::report::{ReportClient, ReportOutcome, EMPTY_MESSAGE, RETRY_MESSAGE};

#[derive(Parser, Debug)]
#[command(name = "lotwatch")]
#[command(about = "Parking lot and license-plate detection dashboard")]
#[command(version)]
struct Cli {
    /// KEY=VALUE config file (default: /etc/lotwatch/lotwatch.conf if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and LOTWATCH_BACKEND_URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List parking lots and their cameras
    Lots,

    /// Show license-plate detections
    Detections {
        /// Parking lot id (all lots when omitted)
        #[arg(long)]
        lot: Option<u64>,

        /// Camera id, only applied together with --lot
        #[arg(long)]
        camera: Option<u64>,
    },

    /// Parking occupancy report
    Occupancy(ReportArgs),

    /// Vehicle activity report
    Activity {
        #[command(flatten)]
        report: ReportArgs,

        /// License plate to look up
        #[arg(long)]
        plate: Option<String>,

        #[arg(long)]
        min_visits: Option<u32>,

        #[arg(long)]
        max_visits: Option<u32>,

        /// Minimum visit duration in minutes
        #[arg(long)]
        min_duration: Option<u32>,

        /// Maximum visit duration in minutes
        #[arg(long)]
        max_duration: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Parking lot id
    #[arg(long)]
    lot: Option<u64>,

    /// last24, last7days or last30days
    #[arg(long)]
    range: Option<DateRange>,

    /// allDay, morning, afternoon or evening
    #[arg(long)]
    time: Option<TimeOfDay>,
}

impl ReportArgs {
    fn form(&self) -> FilterForm {
        FilterForm {
            parking_lot: self.lot,
            date_range: self.range,
            time_of_day: self.time,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // ── load config ──────────────────────────────────────────────────
    let config = config::resolve(cli.config.as_deref(), cli.backend_url.as_deref())
        .context("Config load failed")?;
    info!("lotwatch using backend {}", config.backend_url);

    let api = ApiClient::new(&config).context("Cannot create HTTP client")?;

    match cli.command {
        Command::Lots => lots(&api).await,
        Command::Detections { lot, camera } => detections(&api, lot, camera).await,
        Command::Occupancy(args) => submit(&api, ReportKind::Occupancy, &args.form()).await,
        Command::Activity {
            report,
            plate,
            min_visits,
            max_visits,
            min_duration,
            max_duration,
        } => {
            let form = FilterForm {
                license_plate: plate,
                visits: VisitBounds {
                    min_visits,
                    max_visits,
                    min_duration,
                    max_duration,
                },
                ..report.form()
            };
            submit(&api, ReportKind::VehicleActivity, &form).await
        }
    }
}

async fn lots(api: &ApiClient) -> Result<ExitCode> {
    let mut listing = DetectionListing::new();
    if !listing.load_lots(api).await {
        eprintln!("{RETRY_MESSAGE}");
        return Ok(ExitCode::FAILURE);
    }
    print!("{}", render::lots(listing.lots()));
    Ok(ExitCode::SUCCESS)
}

async fn detections(api: &ApiClient, lot: Option<u64>, camera: Option<u64>) -> Result<ExitCode> {
    let mut listing = DetectionListing::new();

    // The lot listing only supplies camera choices; detections load even if
    // it fails.
    listing.load_lots(api).await;

    let mut query = listing.select_lot(Scope::from(lot));
    if let Some(next) = listing.select_camera(Scope::from(camera)) {
        query = next;
    }
    listing.fetch(api, query).await;

    if listing.last_error().is_some() {
        eprintln!("{RETRY_MESSAGE}");
        return Ok(ExitCode::FAILURE);
    }
    print!("{}", render::detections(listing.detections()));
    Ok(ExitCode::SUCCESS)
}

async fn submit(api: &ApiClient, kind: ReportKind, form: &FilterForm) -> Result<ExitCode> {
    let reports = ReportClient::new(api.clone());
    match reports.submit(kind, form, &Local::now()).await {
        Ok(ReportOutcome::Data(value)) => {
            let out = match kind {
                ReportKind::Occupancy => render::occupancy(&value),
                ReportKind::VehicleActivity => render::vehicle_activity(&value),
            };
            print!("{out}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(ReportOutcome::Empty) => {
            println!("{EMPTY_MESSAGE}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

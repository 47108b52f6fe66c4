//! Address book command-line front end.
//!
//! Each invocation runs one request through `addressbook_api` and prints the
//! response body as JSON on stdout. Errors go to stderr.
//!
//! Exit codes: `0` success, `1` client error, `2` server or setup error.

use addressbook_api::{
    init_logging, AddressBookApi, ApiConfig, ApiResponse, ApiStatus, DistanceModel, NewAddress,
};
use addressbook_core::default_log_level;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_CLIENT_ERROR: u8 = 1;
const EXIT_SERVER_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DistanceModelArg {
    /// Vincenty inverse formula on the WGS-84 ellipsoid
    Vincenty,
    /// Haversine formula on the mean Earth sphere
    Haversine,
}

impl From<DistanceModelArg> for DistanceModel {
    fn from(value: DistanceModelArg) -> Self {
        match value {
            DistanceModelArg::Vincenty => DistanceModel::Vincenty,
            DistanceModelArg::Haversine => DistanceModel::Haversine,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "addressbook", version)]
#[command(about = "Store addresses and search them by distance", long_about = None)]
struct Cli {
    /// SQLite database file (overrides ADDRESSBOOK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Distance model for search (overrides ADDRESSBOOK_DISTANCE_MODEL)
    #[arg(long, value_enum, global = true)]
    distance_model: Option<DistanceModelArg>,

    /// Directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error (needs --log-dir)
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the binary is wired up
    Ping,
    /// Show one address
    Get { id: i64 },
    /// Add an address
    Create(AddressArgs),
    /// Replace every field of an address
    Update {
        id: i64,
        #[command(flatten)]
        address: AddressArgs,
    },
    /// Delete an address
    Delete { id: i64 },
    /// List all addresses
    List,
    /// List addresses within a radius of a point
    Search {
        /// Radius in kilometers
        #[arg(long)]
        radius_km: f64,
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
}

#[derive(Debug, Args)]
struct AddressArgs {
    #[arg(long)]
    locality: String,
    #[arg(long)]
    city: String,
    /// Degrees in [-90, 90]
    #[arg(long, allow_negative_numbers = true)]
    latitude: f64,
    /// Degrees in [-180, 180]
    #[arg(long, allow_negative_numbers = true)]
    longitude: f64,
}

impl From<AddressArgs> for NewAddress {
    fn from(value: AddressArgs) -> Self {
        NewAddress::new(value.locality, value.city, value.latitude, value.longitude)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_SERVER_ERROR);
        }
    }

    let mut config = ApiConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(model) = cli.distance_model {
        config.distance_model = model.into();
    }
    let api = AddressBookApi::new(config);

    match cli.command {
        Command::Ping => {
            println!("addressbook ping={}", api.ping());
            println!("addressbook version={}", api.core_version());
            ExitCode::SUCCESS
        }
        Command::Get { id } => report(api.get_address(id)),
        Command::Create(address) => report(api.create_address(&address.into())),
        Command::Update { id, address } => report(api.update_address(id, &address.into())),
        Command::Delete { id } => report(api.delete_address(id)),
        Command::List => report(api.list_addresses()),
        Command::Search {
            radius_km,
            latitude,
            longitude,
        } => report(api.find_nearby(radius_km, latitude, longitude)),
    }
}

fn exit_status(status: ApiStatus) -> u8 {
    if status.is_success() {
        EXIT_SUCCESS
    } else if status.is_client_error() {
        EXIT_CLIENT_ERROR
    } else {
        EXIT_SERVER_ERROR
    }
}

fn report<T: Serialize>(response: ApiResponse<T>) -> ExitCode {
    if !response.is_success() {
        eprintln!("error ({}): {}", response.status_code(), response.message);
        return ExitCode::from(exit_status(response.status));
    }

    match &response.body {
        Some(body) => match serde_json::to_string_pretty(body) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to encode response: {err}");
                return ExitCode::from(EXIT_SERVER_ERROR);
            }
        },
        None => eprintln!("{}", response.message),
    }
    ExitCode::SUCCESS
}

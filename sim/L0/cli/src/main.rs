//! `jointspace` - joint-space force decomposition from the command line.
//!
//! # Commands
//!
//! - `jointspace forces <MODEL> <GRF> <STATES> <ACCELERATIONS> <DYNAMICS> <OUT_DIR>`
//!   decomposes recorded net joint torques into inertia, Coriolis, gravity,
//!   ground-contact and actuation components.
//! - `jointspace jacobians <MODEL> <STATES> <POINTS_XML> <OUT_DIR>` writes the
//!   frame Jacobian of every configured point for every recorded state.
//!
//! Exit code 0 on success, 1 on any failure (including bad arguments).

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Joint-space force decomposition for recorded gait.
#[derive(Parser)]
#[command(name = "jointspace")]
#[command(about = "Decompose recorded joint torques into physical components", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose net joint torques frame by frame
    Forces(ForcesArgs),

    /// Export frame Jacobians for points listed in a settings file
    Jacobians(JacobiansArgs),
}

/// Arguments of `jointspace forces`.
#[derive(Args, Debug)]
pub struct ForcesArgs {
    /// MJCF model file
    #[arg(name = "MODEL")]
    pub model: PathBuf,

    /// Ground-reaction file (time + 18 channels)
    #[arg(name = "GRF")]
    pub grf: PathBuf,

    /// States file (time + 2·D values)
    #[arg(name = "STATES")]
    pub states: PathBuf,

    /// Accelerations file (time + D values, degrees except the unconverted mask)
    #[arg(name = "ACCELERATIONS")]
    pub accelerations: PathBuf,

    /// Inverse-dynamics net torques (time + D values)
    #[arg(name = "DYNAMICS")]
    pub dynamics: PathBuf,

    /// Directory for the output tables (created if missing)
    #[arg(name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Log every decomposed frame
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON analysis configuration. The defaults expect a 6-DOF floating
    /// base whose translations (coordinates 3..6) are not in degrees.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments of `jointspace jacobians`.
#[derive(Args, Debug)]
pub struct JacobiansArgs {
    /// MJCF model file
    #[arg(name = "MODEL")]
    pub model: PathBuf,

    /// States file (time + 2·D values)
    #[arg(name = "STATES")]
    pub states: PathBuf,

    /// Point settings XML
    #[arg(name = "POINTS_XML")]
    pub points: PathBuf,

    /// Directory for the output tables (created if missing)
    #[arg(name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Log progress details
    #[arg(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let result = match &cli.command {
        Commands::Forces(args) => {
            init_logging(args.verbose);
            commands::forces(args)
        }
        Commands::Jacobians(args) => {
            init_logging(args.verbose);
            commands::jacobians(args)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

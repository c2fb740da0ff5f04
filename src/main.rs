//! nisight command line entry point.
//!
//! Every invocation prints exactly one JSON envelope line on standard output
//! and exits with status 1 when that envelope reports an error. Logs go to
//! standard error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nisight::config::{LogLevel, Settings};
use nisight::envelope;
use nisight::error::{ExtractError, Result};
use nisight::extract::{self, ExtractOptions};

/// Extract surface meshes and per-element data from neuroimaging files
#[derive(Parser)]
#[command(name = "nisight", version, about)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Log verbosity (overrides the settings file and RUST_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    extract: ExtractArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a mesh and/or a data map (the default)
    Extract(ExtractArgs),
    /// Print the number of vertices or elements in a file
    Vertices {
        /// File to inspect
        #[arg(long)]
        file: PathBuf,
    },
    /// Decode a file for a viewer
    View {
        /// What kind of viewer the data is for
        #[arg(long = "type", value_enum)]
        kind: ViewKind,
        /// Volume (img) or surface mesh (surf)
        #[arg(long)]
        file: PathBuf,
        /// Overlay data map for a surface
        #[arg(long)]
        file2: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct ExtractArgs {
    /// Surface mesh file
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Data map file
    #[arg(long)]
    map: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewKind {
    /// First 3-D frame of a volume
    Img,
    /// Surface mesh with optional overlay
    Surf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            init_logging(cli.log_level);
            return finish(Err(err));
        }
    };
    init_logging(cli.log_level.or(settings.as_ref().map(|s| s.log_level)));

    let options = settings.unwrap_or_default().extract_options();
    finish(run(cli.command, cli.extract, &options))
}

fn load_settings(path: Option<&Path>) -> Result<Option<Settings>> {
    path.map(|path| Settings::load(path).map_err(ExtractError::from))
        .transpose()
}

/// Levels: `--log-level`, then the settings file, then `RUST_LOG`, then warn.
fn init_logging(level: Option<LogLevel>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level.to_level_filter());
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn run(command: Option<Command>, default_args: ExtractArgs, options: &ExtractOptions) -> Result<String> {
    match command.unwrap_or(Command::Extract(default_args)) {
        Command::Extract(args) => {
            let result = extract::extract(args.mesh.as_deref(), args.map.as_deref(), options)?;
            envelope::render_ok(&result)
        }
        Command::Vertices { file } => {
            let count = extract::count_elements(&file, options)?;
            envelope::render_ok(&count)
        }
        Command::View {
            kind: ViewKind::Img,
            file,
            ..
        } => envelope::render_ok(&extract::view_volume(&file)?),
        Command::View {
            kind: ViewKind::Surf,
            file,
            file2,
        } => envelope::render_ok(&extract::view_surface(&file, file2.as_deref(), options)?),
    }
}

fn finish(outcome: Result<String>) -> ExitCode {
    match outcome {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            println!("{}", envelope::render_error(&err));
            ExitCode::FAILURE
        }
    }
}

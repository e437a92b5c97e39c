mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_plan};
use output::{OutputFormat, print_error, render_error};

/// relbuild - Build release artifacts from a manifest
#[derive(Parser)]
#[command(name = "relbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every output requested by the manifest, then write provenance files
  Build {
    /// Path to the release manifest
    #[arg(default_value = "manifest.yaml")]
    manifest: PathBuf,

    /// Override the manifest's working directory
    #[arg(short, long)]
    directory: Option<PathBuf>,
  },

  /// Show which steps the manifest would run, without running them
  Plan {
    /// Path to the release manifest
    #[arg(default_value = "manifest.yaml")]
    manifest: PathBuf,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build { manifest, directory } => cmd_build(&manifest, directory.as_deref(), cli.output),
    Commands::Plan { manifest } => cmd_plan(&manifest, cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&render_error(&e));
      ExitCode::FAILURE
    }
  }
}

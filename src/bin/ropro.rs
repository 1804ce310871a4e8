use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ropro::app::App;
use ropro::blast::BlastnAligner;
use ropro::config::RunConfig;
use ropro::error::RoproError;
use ropro::output::JsonOutput;

#[derive(Parser)]
#[command(name = "ropro")]
#[command(about = "Report On Prokka: takes data from Prokka and reports the essential information")]
#[command(version, author)]
struct Cli {
    /// Directory holding Prokka output for one sample
    #[arg(short = 'i', long = "input-directory")]
    input_directory: String,

    /// Prefix for the output directory and report file
    #[arg(short = 'o', long = "output-prefix", default_value = "ropro")]
    output_prefix: String,

    /// Path under which the output directory is created
    #[arg(short = 'p', long = "output-path", default_value = ".")]
    output_path: String,

    /// Path to the blastn executable
    #[arg(short = 'b', long = "blastn-path")]
    blastn_path: Option<String>,

    /// Run BLAST alignment on the extracted marker sequences
    #[arg(long = "run-alignment", visible_alias = "ra")]
    run_alignment: bool,

    /// Enable debugging output
    #[arg(long)]
    debug: bool,

    /// Print a JSON run summary to stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(ropro) = report.downcast_ref::<RoproError>() {
            return ExitCode::from(map_exit_code(ropro));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &RoproError) -> u8 {
    match error {
        RoproError::MissingInput(_) | RoproError::NotADirectory(_) => 2,
        RoproError::MissingTool(_) | RoproError::Alignment(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::resolve(
        &cli.input_directory,
        &cli.output_path,
        &cli.output_prefix,
        cli.blastn_path.as_deref(),
        cli.run_alignment,
    )?;

    let aligner = match &config.blastn_path {
        Some(path) => Some(BlastnAligner::new(path)?),
        None => None,
    };

    let app = App::new(aligner);
    let summary = app.run(&config)?;

    if cli.json {
        JsonOutput::print_summary(&summary).map_err(|err| miette::Report::msg(err.to_string()))?;
    }

    Ok(())
}

extern crate pvflow;

use clap::Parser;
use pvflow::output::FileOutput;
use pvflow::{run_project, FlowAssumptions, FlowResultField, FlowRunResults, ProjectFlags};
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct PvFlowArgs {
    input_file: String,
    /// directory to write results to (defaults to `<input stem>__results` next to the input)
    #[arg(long, short)]
    output_dir: Option<String>,
    /// reject negative numbers and implausible inputs instead of clamping them
    #[arg(long, short, default_value_t = false)]
    strict: bool,
    /// annual charge allowance of the battery as a multiple of its usable capacity
    #[arg(long)]
    battery_annual_cycles: Option<f64>,
    /// also write the results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let args = PvFlowArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_file = Path::new(args.input_file.as_str());
    let input_file_stem = input_file
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("pvflow");

    let output_path = match args.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_file
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{input_file_stem}__results")),
    };
    fs::create_dir_all(&output_path)?;
    let output = FileOutput::new(output_path.clone(), format!("{input_file_stem}__{{}}.{{}}"));

    let mut flags = ProjectFlags::WRITE_CSV;
    if args.json {
        flags.insert(ProjectFlags::WRITE_JSON);
    }
    if args.strict {
        flags.insert(ProjectFlags::STRICT_VALIDATION);
    }

    let assumptions = args
        .battery_annual_cycles
        .map(|battery_annual_cycles| FlowAssumptions {
            battery_annual_cycles,
        });

    let FlowRunResults { result, report, .. } = run_project(
        BufReader::new(File::open(input_file)?),
        &output,
        assumptions,
        &flags,
    )?;

    if !report.is_clean() {
        warn!("Input was adjusted or looks implausible: {report}");
    }
    for field in FlowResultField::iter() {
        info!("{field}: {} {}", field.value(&result), field.units());
    }
    info!("Results written to {}", output_path.display());

    Ok(())
}

//! Thin CLI front end over [`uml_ingest_core`]: translate one or more
//! UML export files to a canonical JSON model, or report which
//! strategy would read a file without translating it.
//!
//! The ambient outer surface the core library deliberately excludes
//! ("CLI parsing (full argument surface)") -- this binary is that
//! excluded surface, grounded on the `clap::Parser`/`Subcommand` shape
//! used by the pack's own CLI crates rather than anything in the
//! teacher repo (which ships library crates and standalone `tools/`
//! binaries, not a `clap` CLI).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

#[derive(Parser, Debug)]
#[command(name = "umlars", version, about = "Translate UML exports into a canonical JSON model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one or more input files into a canonical model.
    Translate {
        /// Input file paths. Pass a Papyrus `.uml`/`.notation` pair
        /// together so they resolve into one shared model.
        inputs: Vec<PathBuf>,

        /// Pin the dialect instead of running detection.
        #[arg(long, value_enum)]
        format: Option<CliFormat>,

        /// Id to give the resulting model.
        #[arg(long, default_value = "model")]
        model_id: String,

        /// Write pretty-printed JSON instead of compact.
        #[arg(long)]
        pretty: bool,
    },

    /// Report which registered strategy would read a file, without
    /// translating it.
    Detect {
        /// Input file path.
        input: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CliFormat {
    EaXmi,
    Papyrus,
    Staruml,
}

impl From<CliFormat> for SupportedFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::EaXmi => SupportedFormat::EaXmi,
            CliFormat::Papyrus => SupportedFormat::Papyrus,
            CliFormat::Staruml => SupportedFormat::StarUml,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Translate {
            inputs,
            format,
            model_id,
            pretty,
        } => translate(inputs, format.map(Into::into), model_id, pretty),
        Command::Detect { input } => detect(input),
    }
}

fn translate(
    inputs: Vec<PathBuf>,
    format: Option<SupportedFormat>,
    model_id: String,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if inputs.is_empty() {
        return Err("at least one input file is required".into());
    }
    let sources = inputs.into_iter().map(DataSource::from_path);
    let deserializer = Deserializer::new();
    let model = deserializer.translate(model_id, sources, format)?;

    let json = if pretty {
        serde_json::to_string_pretty(&model)?
    } else {
        serde_json::to_string(&model)?
    };
    println!("{json}");
    Ok(())
}

fn detect(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = DataSource::from_path(&input);
    let deserializer = Deserializer::new();
    let strategy = deserializer.registry().detect(&source)?;
    println!("{}", strategy.name());
    Ok(())
}

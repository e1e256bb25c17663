//! SR command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use octofhir_sr::DocumentType;
use octofhir_sr::cli::extract::ExtractKind;
use octofhir_sr::cli::input::InputConfig;
use octofhir_sr::cli::output::{self, ColorChoice, OutputFormat};
use octofhir_sr::cli::{dump, encode, extract, query, stats, validate};
use octofhir_sr::model::DEFAULT_MAX_DEPTH;
use std::path::PathBuf;

/// DICOM SR command-line tool
#[derive(Parser)]
#[command(name = "sr")]
#[command(author, version, about = "DICOM Structured Reporting tools", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Substitute placeholders for malformed content instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Maximum content tree depth
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a DICOM JSON file and print its content tree
    Dump {
        /// DICOM JSON file
        file: PathBuf,
    },

    /// Validate documents against their profiles
    Validate {
        /// DICOM JSON files to validate
        files: Vec<PathBuf>,

        /// Document type to validate against, e.g. enhanced or comprehensive-3d
        #[arg(short, long)]
        profile: Option<DocumentType>,
    },

    /// Resolve an SRPath, e.g. /Findings/Finding[1]
    Query {
        /// DICOM JSON file
        file: PathBuf,

        /// Path to resolve
        path: String,

        /// Select every child matching the last component
        #[arg(short, long)]
        all: bool,
    },

    /// Item counts per value type and relationship
    Stats {
        /// DICOM JSON file
        file: PathBuf,
    },

    /// Print a CAD, key object or measurement view as JSON
    Extract {
        /// DICOM JSON file
        file: PathBuf,

        /// View to extract
        #[arg(short, long, value_enum)]
        kind: ExtractKind,
    },

    /// Decode and re-encode as normalized DICOM JSON
    Encode {
        /// DICOM JSON file
        file: PathBuf,

        /// Only write identifiers and the content tree
        #[arg(long)]
        content_only: bool,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let input = InputConfig {
        lenient: cli.lenient,
        max_depth: cli.max_depth,
    };
    let format = cli.format;
    let output_file = cli.output;

    match cli.command {
        Commands::Dump { file } => dump::dump(dump::DumpConfig {
            file,
            input,
            format,
            output_file,
        }),
        Commands::Validate { files, profile } => validate::validate(validate::ValidateConfig {
            files,
            profile,
            input,
            format,
            output_file,
        }),
        Commands::Query { file, path, all } => query::query(query::QueryConfig {
            file,
            path,
            all,
            input,
            format,
            output_file,
        }),
        Commands::Stats { file } => stats::stats(stats::StatsConfig {
            file,
            input,
            format,
            output_file,
        }),
        Commands::Extract { file, kind } => extract::extract(extract::ExtractConfig {
            file,
            kind,
            input,
            format,
            output_file,
        }),
        Commands::Encode { file, content_only } => encode::encode(encode::EncodeConfig {
            file,
            content_only,
            input,
            format,
            output_file,
        }),
    }
}

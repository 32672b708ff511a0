//! Command-line front end for the set-expression engine.
//!
//! The UCD snapshot directory comes from `GUNISET_DIR`, falling back to the
//! current directory. Output goes to stdout or `-o FILE`; errors and
//! diagnostics go to stderr through tracing and exit non-zero.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;
use tracing_subscriber::EnvFilter;

use guniset::set::{is_bmp, is_supplementary, parse_code_point};
use guniset::{expr, CodePointSet, EvalContext, GunisetError};

/// Evaluate set expressions over Unicode code points.
#[derive(Parser, Debug)]
#[command(name = "guniset", version, about)]
struct Cli {
    /// Output file (default stdout).
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a set expression and emit its ranges.
    Gen {
        /// Keep only code points in the Basic Multilingual Plane.
        #[arg(long, conflicts_with = "supplementary")]
        bmp: bool,
        /// Keep only code points above the BMP.
        #[arg(long)]
        supplementary: bool,
        /// The set expression, e.g. `cat:Lu + eaw:W - U+0041..U+005A`.
        set: String,
    },
    /// Evaluate a set expression and emit a uniform sample of it.
    Sample {
        /// Number of code points to draw.
        #[arg(long, default_value_t = 16)]
        limit: usize,
        /// Seed for reproducible draws; entropy-seeded when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// The set expression.
        set: String,
    },
    /// Report the properties of a single code point (`U+3042` or `3042`).
    Query { code_point: String },
    /// Show the UCD directory and the loaded file headers.
    Info,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    // The first subscriber wins; ignore a second init (e.g. in tests).
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn ucd_dir() -> Result<PathBuf, GunisetError> {
    match env::var_os("GUNISET_DIR") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(env::current_dir()?),
    }
}

fn write_ranges<W: Write>(set: &CodePointSet, writer: &mut W) -> io::Result<()> {
    for range in set.ranges() {
        writeln!(writer, "{{ 0x{:04X}, 0x{:04X} }},", range.first, range.last)?;
    }
    Ok(())
}

fn run() -> Result<(), GunisetError> {
    let cli = Cli::parse();
    let dir = ucd_dir()?;
    let ctx = EvalContext::from_dir(&dir)?;

    let mut writer: BufWriter<Box<dyn Write>> = BufWriter::new(match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    });

    match cli.command {
        Command::Gen {
            bmp,
            supplementary,
            set,
        } => {
            let mut result = expr::parse(&set, &ctx)?.eval(&ctx);
            if bmp {
                result.filter(is_bmp);
            } else if supplementary {
                result.filter(is_supplementary);
            }
            write_ranges(&result, &mut writer)?;
        }
        Command::Sample { limit, seed, set } => {
            let result = expr::parse(&set, &ctx)?.eval(&ctx);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let sampled = result.sample(&mut rng, limit);
            write_ranges(&sampled, &mut writer)?;
        }
        Command::Query { code_point } => {
            let r = parse_code_point(&code_point)?;
            ctx.write_query(r, &mut writer)?;
        }
        Command::Info => {
            writeln!(writer, "GUNISET_DIR: {}", dir.display())?;
            for header in ctx.headers() {
                writeln!(writer, "- {}\n  {}", header.filename, header.created)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ddlc::config::{OUT_DIR_ENV, default_out_dir};
use ddlc::inspect::inspect_payload;
use ddlc_codegen::{
    DEFAULT_DISSECTOR_TABLE, Generator, GeneratorConfig, OutputConfig, OutputMode,
    render_single_file, write_modules,
};
use ddlc_schema::{Direction, load_document};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status on success.
const EXIT_OK: u8 = 0;
/// Exit status for document, IO and decode errors.
const EXIT_FAILURE: u8 = 1;
/// Exit status when `--strict` is set and fields were replaced by placeholders.
const EXIT_DIAGNOSTICS: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "ddlc", version)]
#[command(about = "Compile DDL schema documents into Wireshark Lua dissectors")]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate dissector modules.
    Generate(GenerateArgs),
    /// Decode a captured payload with the schema layout.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// DDL document (JSON).
    schema: PathBuf,

    /// Output directory [default: Wireshark plugin dir]/quazal.
    #[arg(short, long, env = OUT_DIR_ENV)]
    out_dir: Option<PathBuf>,

    /// Write every namespace into one module.
    #[arg(long, default_value_t = false)]
    single_file: bool,

    /// Only generate these namespaces.
    #[arg(short, long = "namespace", value_name = "NS")]
    namespaces: Vec<String>,

    /// Dissector table protocols register in.
    #[arg(long, default_value = DEFAULT_DISSECTOR_TABLE)]
    dissector_table: String,

    /// Skip comment stubs for protocols without an id.
    #[arg(long, default_value_t = false)]
    no_stubs: bool,

    /// Print the generated Lua instead of writing files.
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// Exit with status 2 if any field was replaced by a placeholder.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// DDL document (JSON).
    schema: PathBuf,

    /// Protocol name, optionally `Namespace::Protocol`.
    #[arg(short, long)]
    protocol: String,

    /// Method ordinal (1-based).
    #[arg(short, long)]
    method: u32,

    /// Decode as a response instead of a request.
    #[arg(long, default_value_t = false)]
    response: bool,

    /// Payload bytes in hex, without the RMC header.
    #[arg(long)]
    payload: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Default filter when `RUST_LOG` is unset. Field diagnostics are `warn!`,
/// so `-q` never goes below that.
fn default_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = default_level(verbose, quiet);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<u8> {
    match command {
        Command::Generate(args) => run_generate(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<u8> {
    let registry = load_document(&args.schema)
        .with_context(|| format!("loading {}", args.schema.display()))?;

    let config = GeneratorConfig {
        dissector_table: args.dissector_table,
        emit_stubs: !args.no_stubs,
        namespaces: args.namespaces,
    };
    let modules = Generator::with_config(&registry, config).generate()?;
    let diagnostics: usize = modules.iter().map(|m| m.diagnostics.len()).sum();

    if args.stdout {
        print!("{}", render_single_file(&modules));
    } else {
        let Some(dir) = args.out_dir.or_else(default_out_dir) else {
            bail!("no output directory: pass --out-dir or set {OUT_DIR_ENV}");
        };
        let mode = if args.single_file {
            OutputMode::SingleFile
        } else {
            OutputMode::PerNamespace
        };
        let written = write_modules(&OutputConfig::new(dir).with_mode(mode), &modules)?;
        info!(
            files = written.len(),
            namespaces = modules.len(),
            diagnostics,
            "generation finished"
        );
    }

    if args.strict && diagnostics > 0 {
        eprintln!("{diagnostics} field(s) replaced by placeholders");
        return Ok(EXIT_DIAGNOSTICS);
    }
    Ok(EXIT_OK)
}

fn run_inspect(args: InspectArgs) -> Result<u8> {
    let registry = load_document(&args.schema)
        .with_context(|| format!("loading {}", args.schema.display()))?;

    let cleaned: String = args
        .payload
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let payload = hex::decode(&cleaned).context("payload is not valid hex")?;

    let direction = if args.response {
        Direction::Response
    } else {
        Direction::Request
    };
    let report = inspect_payload(&registry, &args.protocol, args.method, direction, &payload)?;
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}: {}", diagnostic.path, diagnostic.error);
    }
    println!("{report}");
    Ok(EXIT_OK)
}

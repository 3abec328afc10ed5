mod commands;

use clap::{Parser, Subcommand};
use commands::exit_code_for;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "aciforge",
    version,
    about = "Build and inspect appc container image manifests"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write an image manifest from a build spec.
    WriteManifest {
        /// Path to the build spec TOML file.
        #[arg(default_value = "aci-manifest.toml")]
        spec: PathBuf,
        /// Where to write the manifest.
        #[arg(short, long, default_value = "manifest")]
        output: PathBuf,
        /// Image name to record; defaults to the build spec's name without version.
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the manifest embedded in an image archive.
    Inspect {
        /// Path to the image archive.
        aci: PathBuf,
    },
    /// Print the `name[:version]` of an image archive.
    Fullname {
        /// Path to the image archive.
        aci: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ACIFORGE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::WriteManifest { spec, output, name } => {
            commands::write_manifest::run(&spec, &output, name.as_deref(), json_output)
        }
        Commands::Inspect { aci } => commands::inspect::run(&aci, json_output),
        Commands::Fullname { aci } => commands::fullname::run(&aci, json_output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

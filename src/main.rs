//! xc CLI
//!
//! Entry point for the `xc` command-line tool.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use xc_core::split_command_token;
use xc_launcher::destinations::{query_simulators, DestinationReport};
use xc_launcher::list::render_commands;
use xc_launcher::loader::ConfigLoader;
use xc_launcher::logging::init_tracing;
use xc_launcher::{launch, ExplainOutput, LaunchOptions, LaunchRequest, LoadedConfig, XcResult};

#[derive(Parser)]
#[command(name = "xc")]
#[command(about = "A better way to run xcodebuild", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a configured command
    Run(RunArgs),

    /// Show available commands and variants
    List {
        /// Path to project config file (default: nearest xc.yaml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List named destinations and available simulators
    Destinations {
        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Path to project config file (default: nearest xc.yaml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Show what a command resolves to without running it
    Explain {
        /// Command to explain, optionally with variant (e.g. build:release)
        command: String,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Override destination (name or raw destination string)
        #[arg(long)]
        dest: Option<String>,

        /// Path to project config file (default: nearest xc.yaml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Arguments appended to the invocation (after --)
        #[arg(last = true)]
        passthrough: Vec<String>,
    },

    /// `xc build:release` is shorthand for `xc run build:release`
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Command to run, optionally with variant (e.g. build, test, build:release)
    command: String,

    /// Show raw xcodebuild output without formatting
    #[arg(long)]
    raw: bool,

    /// Show the resolved xcodebuild invocation
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Print the resolved command and hooks without running them
    #[arg(long)]
    dry_run: bool,

    /// Override destination (name or raw destination string)
    #[arg(long)]
    dest: Option<String>,

    /// Path to project config file (default: nearest xc.yaml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Arguments passed through verbatim (after --)
    #[arg(last = true)]
    passthrough: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::External(tokens) => {
            let args = RunArgs::parse_from(std::iter::once("xc".to_string()).chain(tokens));
            run(args)
        }
        Commands::List { config } => {
            init_tracing(false);
            run_list(config.as_deref())
        }
        Commands::Destinations { json, config } => {
            init_tracing(false);
            run_destinations(json, config.as_deref())
        }
        Commands::Explain {
            command,
            human,
            dest,
            config,
            passthrough,
        } => {
            init_tracing(false);
            run_explain(command, human, dest, config.as_deref(), passthrough)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn load_config(path: Option<&Path>) -> XcResult<LoadedConfig> {
    let loader = ConfigLoader::new();
    match path {
        Some(path) => loader.load_file(path),
        None => loader.load(),
    }
}

fn run(args: RunArgs) -> XcResult<()> {
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let request = LaunchRequest {
        token: args.command,
        destination: args.dest,
        passthrough: args.passthrough,
    };
    let options = LaunchOptions {
        raw: args.raw,
        verbose: args.verbose,
        dry_run: args.dry_run,
    };

    launch(&request, &config, options)
}

fn run_list(config_path: Option<&Path>) -> XcResult<()> {
    let config = load_config(config_path)?;
    print!("{}", render_commands(&config.project));
    Ok(())
}

fn run_destinations(json_output: bool, config_path: Option<&Path>) -> XcResult<()> {
    // Named destinations are optional here; a missing or broken xc.yaml
    // still lists simulators.
    let named = load_config(config_path)
        .map(|c| c.project.destinations)
        .unwrap_or_default();

    let report = DestinationReport {
        named,
        simulators: query_simulators(),
    };

    if json_output {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.to_human());
    }
    Ok(())
}

fn run_explain(
    token: String,
    human: bool,
    dest: Option<String>,
    config_path: Option<&Path>,
    passthrough: Vec<String>,
) -> XcResult<()> {
    let config = load_config(config_path)?;
    let request = LaunchRequest {
        token,
        destination: dest,
        passthrough,
    };
    let resolved = request.resolve(&config)?;

    let (command, variant) = split_command_token(&request.token);
    let explanation = ExplainOutput::new(command, variant, resolved, config.sources.clone());

    if human {
        print!("{}", explanation.to_human());
    } else {
        match explanation.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
    Ok(())
}

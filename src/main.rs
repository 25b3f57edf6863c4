//! elm-infer - CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use elm_infer::frontend::Engine;
use elm_infer::util::config::{self, InferConfig};
use elm_infer::util::diagnostic::{Diagnostic, EmitterConfig, JsonEmitter, Source, TextEmitter};
use elm_infer::util::logger::{self, LogLevel};
use elm_infer::util::span::Span;
use elm_infer::{read_modules, Module, NAME, VERSION};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Type inference for Elm-like modules given as JSON syntax trees
#[derive(Parser, Debug)]
#[command(name = "elm-infer")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./elm-infer.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Diagnostic output format
    #[arg(long, global = true, value_enum, default_value_t = DiagnosticFormat::Text)]
    diagnostics: DiagnosticFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiagnosticFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Infer the modules in a JSON file and print each declaration's type
    Check {
        /// JSON file holding one module or a list of modules
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Original source, used for snippets in diagnostics
        #[arg(long, value_name = "SOURCE")]
        source: Option<PathBuf>,
    },

    /// Infer the modules in a JSON file and dump the typed result
    Types {
        /// JSON file holding one module or a list of modules
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dump the full typed tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let mut config = config::load_or_default(args.config.as_deref(), &cwd)
        .context("Failed to load configuration")?
        .with_env_overrides();
    if args.no_color {
        config.diagnostic.colors = false;
    }
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log.log_level()
    };
    logger::init_with_level(level).context("Failed to install logger")?;
    debug!("{} {} on {}", NAME, VERSION, std::env::consts::OS);

    match &args.command {
        Commands::Check { file, source } => check(&args, config, file, source.as_deref()),
        Commands::Types { file, json } => types(&args, config, file, *json),
        Commands::Config => {
            print!("{}", config.to_toml().context("Failed to render configuration")?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_input(file: &Path) -> Result<IndexMap<String, Module<Span>>> {
    let json = fs::read_to_string(file).with_context(|| format!("Failed to read: {}", file.display()))?;
    read_modules(&json).with_context(|| format!("Failed to parse: {}", file.display()))
}

fn check(
    args: &Args,
    config: InferConfig,
    file: &Path,
    source: Option<&Path>,
) -> Result<ExitCode> {
    let modules = read_input(file)?;
    let colors = config.diagnostic.colors;
    match Engine::with_config(config).infer(&modules) {
        Ok(typed) => {
            for (name, module) in &typed {
                if typed.len() > 1 {
                    println!("-- {}", name);
                }
                for decl in &module.declarations {
                    println!("{} : {}", decl.name, decl.meta.ty);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let content = match source {
                Some(path) => Some(
                    fs::read_to_string(path)
                        .with_context(|| format!("Failed to read: {}", path.display()))?,
                ),
                None => None,
            };
            let name = source.unwrap_or(file).display().to_string();
            report(
                args,
                colors,
                &Diagnostic::from(&err),
                Some(Source {
                    name: &name,
                    content: content.as_deref(),
                }),
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn types(
    args: &Args,
    config: InferConfig,
    file: &Path,
    json: bool,
) -> Result<ExitCode> {
    let modules = read_input(file)?;
    let colors = config.diagnostic.colors;
    match Engine::with_config(config).infer(&modules) {
        Ok(typed) if json => {
            let out = serde_json::to_string_pretty(&typed).context("Failed to serialize typed tree")?;
            println!("{}", out);
            Ok(ExitCode::SUCCESS)
        }
        Ok(typed) => {
            for (name, module) in &typed {
                for decl in &module.declarations {
                    println!("{}.{} : {}", name, decl.name, decl.meta.ty);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let name = file.display().to_string();
            report(
                args,
                colors,
                &Diagnostic::from(&err),
                Some(Source {
                    name: &name,
                    content: None,
                }),
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report(
    args: &Args,
    colors: bool,
    diagnostic: &Diagnostic,
    source: Option<Source<'_>>,
) {
    match args.diagnostics {
        DiagnosticFormat::Json => eprintln!("{}", JsonEmitter::render(diagnostic)),
        DiagnosticFormat::Text => {
            let emitter = TextEmitter::with_config(EmitterConfig {
                use_colors: colors,
                ..Default::default()
            });
            eprint!("{}", emitter.render_with_source(diagnostic, source));
        }
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use trie_router::config::load_config;
use trie_router::lifecycle::build_engine;
use trie_router::Router;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect the route table of a trie-router configuration", long_about = None)]
struct Cli {
    /// Path to the router configuration (TOML).
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered patterns, per method
    Routes {
        /// Only list routes of this method
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Resolve a request against the route table
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /p/go/doc
        path: String,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let engine = build_engine(&config);

    let (output, code) = execute(cli.command, engine.router())?;
    if code == ExitCode::SUCCESS {
        print!("{}", output);
    } else {
        eprint!("{}", output);
    }
    Ok(code)
}

/// Run `command` against `router`, returning the text to print and the exit
/// code. Output of a failed command belongs on stderr.
fn execute(command: Commands, router: &Router) -> Result<(String, ExitCode), serde_json::Error> {
    match command {
        Commands::Routes { method } => {
            let mut methods: Vec<&str> = match method.as_deref() {
                Some(m) => vec![m],
                None => router.methods().collect(),
            };
            methods.sort_unstable();

            let mut output = String::new();
            for method in methods {
                for pattern in router.patterns(method) {
                    output.push_str(&format!("{:<8} {}\n", method, pattern));
                }
            }
            Ok((output, ExitCode::SUCCESS))
        }
        Commands::Match { method, path } => match router.get_route(&method, &path) {
            Some((node, params)) => {
                let out = json!({
                    "method": method,
                    "path": path,
                    "pattern": node.pattern(),
                    "params": params,
                });
                let output = format!("{}\n", serde_json::to_string_pretty(&out)?);
                Ok((output, ExitCode::SUCCESS))
            }
            None => Ok((format!("No route matches {} {}\n", method, path), ExitCode::FAILURE)),
        },
    }
}

use crate::dispatcher::{handler, Response};
use crate::echo::echo_handler;
use crate::route_table::RouteTable;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "altrouter")]
#[command(about = "altrouter CLI", long_about = None, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route paths through a route table served by echo handlers
    Route {
        #[arg(short, long)]
        routes: PathBuf,

        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Compile a route table and print its combined pattern and group index
    Check {
        #[arg(short, long)]
        routes: PathBuf,
    },
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

/// Execute a parsed command, writing one JSON document per line to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Route {
            routes,
            method,
            paths,
        } => {
            let table = RouteTable::load(&routes)?;
            let router = table.build_router(&handler(echo_handler))?;
            let method = http::Method::from_bytes(method.as_bytes())
                .with_context(|| format!("Invalid method: {method}"))?;

            for path in paths {
                let request = http::Request::builder()
                    .method(method.clone())
                    .uri(path.as_str())
                    .body(Vec::new())
                    .with_context(|| format!("Invalid request path: {path}"))?;
                let mut res = Response::new();
                let dispatch = router.route(request, &mut res)?;
                let body = serde_json::from_slice::<Value>(res.body())
                    .unwrap_or_else(|_| Value::String(res.body_text()));
                let line = json!({
                    "method": method.as_str(),
                    "path": path,
                    "dispatch": dispatch,
                    "written": res.is_written(),
                    "status": res.status().as_u16(),
                    "body": body,
                });
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
        Commands::Check { routes } => {
            let table = RouteTable::load(&routes)?;
            let router = table.build_router(&handler(echo_handler))?;
            router.compile()?;
            router.dump_routes();

            let patterns = router.patterns();
            let index: Vec<Value> = router
                .index()
                .iter()
                .map(|(group, entry)| {
                    json!({
                        "group": group,
                        "route_slot": entry.route_slot,
                        "sub_groups": entry.sub_groups,
                        "pattern": patterns.get(entry.route_slot),
                    })
                })
                .collect();
            let line = json!({
                "routes": router.route_count(),
                "combined": router.combined_pattern(),
                "index": index,
            });
            writeln!(out, "{line}")?;
            Ok(())
        }
    }
}

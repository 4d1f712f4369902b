use crate::{
    hot_reload::watch_routes,
    router::SharedRouter,
    table::{load_router, load_table, parse_method},
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line interface for pathtrie
///
/// Loads a route table file and resolves paths against it.
#[derive(Parser, Debug)]
#[command(name = "pathtrie")]
#[command(about = "Route table inspection and matching", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one request against the table
    Match {
        /// Route table file (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method, case-insensitive
        method: String,

        /// Request path, e.g. /users/42
        path: String,
    },
    /// Print the registered routes and the per-method trees
    Routes {
        /// Route table file (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Validate every entry of the table and report all problems
    Check {
        /// Route table file (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Read `METHOD PATH` lines from stdin and resolve them, reloading the
    /// table whenever the file changes
    Watch {
        /// Route table file (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,
    },
}

/// Run a parsed command, writing its report to `out`.
///
/// Returns `Ok(false)` when the command completed but the outcome is negative
/// (no match, or problems found), so the binary can exit non-zero.
pub fn run_cli<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Match {
            routes,
            method,
            path,
        } => {
            let router = load_router(routes)?;
            let method = parse_method(method)
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;
            Ok(write_match(&router, &method, path, out)?)
        }
        Commands::Routes { routes } => {
            let router = load_router(routes)?;
            router.dump_routes(out)?;
            Ok(true)
        }
        Commands::Check { routes } => check(routes, out),
        Commands::Watch { routes } => {
            let shared = Arc::new(SharedRouter::new(load_router(routes)?));
            let _watcher = watch_routes(routes, Arc::clone(&shared))
                .with_context(|| format!("Failed to watch {}", routes.display()))?;
            let stdin = std::io::stdin();
            resolve_lines(&shared, stdin.lock(), out)?;
            Ok(true)
        }
    }
}

fn write_match<W: Write>(
    router: &crate::router::Router<String>,
    method: &Method,
    path: &str,
    out: &mut W,
) -> std::io::Result<bool> {
    match router.find(method, path) {
        Some(m) => {
            writeln!(out, "{method} {path} -> {}", m.payload)?;
            for (name, value) in &m.path_params {
                writeln!(out, "  {name} = {value}")?;
            }
            Ok(true)
        }
        None => {
            writeln!(out, "{method} {path} -> no match")?;
            Ok(false)
        }
    }
}

fn check<W: Write>(routes: &Path, out: &mut W) -> anyhow::Result<bool> {
    let table = load_table(routes)?;
    let problems = table.check();
    if problems.is_empty() {
        writeln!(out, "ok: {} routes", table.routes.len())?;
        return Ok(true);
    }
    for problem in &problems {
        writeln!(out, "error: {problem}")?;
    }
    writeln!(
        out,
        "{} of {} routes rejected",
        problems.len(),
        table.routes.len()
    )?;
    Ok(false)
}

/// Resolve each `METHOD PATH` line of `input` against the current router.
///
/// Blank lines are skipped; malformed lines are reported and skipped.
pub fn resolve_lines<R: BufRead, W: Write>(
    shared: &SharedRouter<String>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            if !line.trim().is_empty() {
                writeln!(out, "expected 'METHOD PATH', got '{}'", line.trim())?;
            }
            continue;
        };
        match parse_method(method) {
            Ok(method) => {
                let router = shared.load();
                write_match(&router, &method, path, out)?;
            }
            Err(_) => writeln!(out, "Invalid HTTP method '{method}'")?,
        }
    }
    Ok(())
}

//! # CLI Module
//!
//! Command-line access to a route table file: resolve a request, list the
//! table, validate it, or watch it while resolving requests from stdin.
//!
//! ## Commands
//!
//! ```bash
//! pathtrie match --routes routes.yaml GET /users/42
//! pathtrie routes --routes routes.yaml
//! pathtrie check --routes routes.toml
//! pathtrie watch --routes routes.yaml < requests.txt
//! ```
//!
//! `match` exits with status 1 when nothing matches; `check` exits with
//! status 1 when any entry is rejected. `--json-logs` switches the stderr log
//! format to JSON lines.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use pathtrie::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let ok = run_cli(&cli, &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{resolve_lines, run_cli, Cli, Commands};

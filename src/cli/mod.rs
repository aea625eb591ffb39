//! # CLI Module
//!
//! Command-line front end of the `viewful` binary. It builds a small demo
//! application (two view classes sharing the same handlers, one under
//! `/baz`) and lets you inspect or exercise it without a server.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! ```bash
//! viewful routes
//! ```
//!
//! ### `request`
//!
//! ```bash
//! viewful request GET /baz/foo/hello
//! viewful request POST /foo -H 'x-request-id:01HZX3J8Q4W7B6Y2M5N9P0R1S2'
//! ```
//!
//! Global options: `--config <FILE>` reads an [`AppConfig`](crate::config::AppConfig)
//! from TOML, `--json-logs` switches the log format. `RUST_LOG` controls
//! verbosity.

mod commands;
mod demo;


pub use commands::{run_cli, Cli, Commands};
pub use demo::{demo_app, DemoView};

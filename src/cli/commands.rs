use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::{HeaderName, HeaderValue, Method};
use std::path::PathBuf;

use super::demo::demo_app;
use crate::app::{App, Request};
use crate::config::AppConfig;
use crate::logging::{init_logging, LogConfig, LogFormat};

/// Command-line interface for the viewful demo application
#[derive(Parser)]
#[command(name = "viewful")]
#[command(about = "Inspect and exercise the viewful demo application", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults to VIEWFUL_* environment variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log as JSON instead of pretty text
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the rule table of the demo application
    Routes,
    /// Send one request through the demo application and print the response
    Request {
        /// HTTP method, e.g. GET
        method: String,

        /// Request target, path plus optional query string
        target: String,

        /// Extra header, `name:value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        body: Option<String>,
    },
}

/// Parse the command line and run it.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.json_logs {
        log_config.format = LogFormat::Json;
    }
    init_logging(&log_config)?;

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env(),
    };
    let app = demo_app(config).context("Failed to build demo application")?;

    match &cli.command {
        Commands::Routes => {
            for line in route_lines(&app) {
                println!("{line}");
            }
        }
        Commands::Request {
            method,
            target,
            headers,
            body,
        } => {
            let request = build_request(method, target, headers, body.as_deref())?;
            let response = app.handle(&request);
            println!("{}", response.status());
            for (name, value) in response.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
            println!();
            println!("{}", String::from_utf8_lossy(&response.body().to_bytes()));
        }
    }
    Ok(())
}

/// One line per rule: methods, template and endpoint.
pub(crate) fn route_lines(app: &App) -> Vec<String> {
    app.url_map()
        .iter_rules()
        .map(|rule| {
            let methods: Vec<&str> = rule.methods().iter().map(Method::as_str).collect();
            format!("{:<28} {:<32} {}", methods.join(","), rule.rule(), rule.endpoint())
        })
        .collect()
}

pub(crate) fn build_request(
    method: &str,
    target: &str,
    headers: &[String],
    body: Option<&str>,
) -> Result<Request> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{method}'"))?;
    let mut request = Request::new(method, target);
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("header '{header}' is not 'name:value'"))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("invalid header name in '{header}'"))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("invalid header value in '{header}'"))?;
        request = request.with_header(name, value);
    }
    if let Some(body) = body {
        request = request.with_body(body.to_string());
    }
    Ok(request)
}

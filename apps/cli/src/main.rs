// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SiteCheck command line
//!
//! Reads a JSON model snapshot, runs one check with parameters from an
//! optional TOML file and prints the JSON report.

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use config::Config;
use sitecheck_core::{Error, Model};
use sitecheck_rules::{run_check, CheckRequest, Status};

/// Geometric building-code checks on CAD models
#[derive(Parser, Debug)]
#[command(name = "sitecheck", version)]
#[command(about = "Run building-code compliance checks on a CAD model snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Building tops against per-plot height limits
    HeightLimit(CheckArgs),
    /// Share of each setback line faced by buildings
    FrontageRate(CheckArgs),
    /// Fire-ladder placement and size per redline
    FireLadder(CheckArgs),
    /// Sky bridges must link two plots with enough width, height and clearance
    SkyBridge(CheckArgs),
    /// Which buildings an observer can see
    SightVisibility(CheckArgs),
    /// Buildings overlapping protected view corridors
    CorridorCollision(CheckArgs),
}

impl Command {
    fn parts(&self) -> (&'static str, &CheckArgs) {
        match self {
            Command::HeightLimit(a) => ("height_limit", a),
            Command::FrontageRate(a) => ("frontage_rate", a),
            Command::FireLadder(a) => ("fire_ladder", a),
            Command::SkyBridge(a) => ("sky_bridge", a),
            Command::SightVisibility(a) => ("sight_visibility", a),
            Command::CorridorCollision(a) => ("corridor_collision", a),
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Model snapshot (JSON)
    #[arg(long, short)]
    model: PathBuf,

    /// Check parameters (TOML); defaults apply to missing keys
    #[arg(long, short)]
    params: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Exit with status 2 when the check does not pass
    #[arg(long)]
    strict: bool,
}

/// Builds a request from TOML parameter text for the named check.
fn request_from_toml(check: &str, text: &str) -> anyhow::Result<CheckRequest> {
    let mut table: toml::Table = toml::from_str(text).context("parameters are not valid TOML")?;
    table.insert("check".into(), toml::Value::String(check.into()));
    toml::Value::Table(table)
        .try_into()
        .with_context(|| format!("invalid parameters for {}", check))
}

fn load_request(check: &str, params: Option<&Path>) -> anyhow::Result<CheckRequest> {
    let text = match params {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => String::new(),
    };
    request_from_toml(check, &text)
}

fn load_model(path: &Path) -> anyhow::Result<Model> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model from {}", path.display()))?;
    let model: Model = serde_json::from_str(&text)
        .map_err(|e| Error::UnreadableModel(format!("{}: {}", path.display(), e)))?;
    Ok(model)
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<Status> {
    let (check, args) = cli.command.parts();
    let request = load_request(check, args.params.as_deref())?;
    let model = load_model(&args.model)?;

    tracing::info!(
        check,
        model = %args.model.display(),
        layers = model.layers.len(),
        objects = model.objects.len(),
        "model loaded"
    );

    let result = run_check(&model, &request).with_context(|| format!("{} check failed", check))?;
    for warning in result.warnings() {
        tracing::warn!(code = warning.code.as_str(), "{}", warning.detail);
    }

    let json = if config.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(result.status())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli, &config) {
        Ok(status) => {
            tracing::info!(status = status.as_str(), "done");
            let (_, args) = cli.command.parts();
            if args.strict && status != Status::Pass {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

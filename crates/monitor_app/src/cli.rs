use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use monitor_core::Category;

#[derive(Parser, Debug)]
#[command(name = "recon-monitor", about = "Live monitor for reconnaissance and scan jobs")]
pub struct Cli {
    /// RON config file (defaults to ./monitor.ron when present).
    #[arg(long, env = "MONITOR_CONFIG")]
    pub config: Option<PathBuf>,
    /// Overrides the server base url from the config file.
    #[arg(long, env = "MONITOR_BASE_URL")]
    pub base_url: Option<String>,
    #[arg(long, env = "MONITOR_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Follow job events until interrupted.
    Watch {
        /// Categories to monitor; all of them when omitted.
        #[arg(long = "category", value_parser = parse_category)]
        categories: Vec<Category>,
    },
    /// Launch a job and follow it.
    Submit {
        #[arg(long, value_parser = parse_category)]
        category: Category,
        /// Form field as key=value; repeat for several fields.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Return right after submitting instead of following the job.
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },
    /// List previously generated reports.
    Reports,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse()
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

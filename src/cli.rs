use std::path::PathBuf;

use clap::Parser;

use crate::audit::ReportKind;
use crate::audit::channels::MATCH_ALL;

#[derive(Debug, Parser)]
#[command(name = "slack-seat-audit", version, about = "Slack client for user reporting")]
pub struct Cli {
    /// Report to produce
    #[arg(long, value_enum, default_value_t = ReportKind::Inactive)]
    pub report: ReportKind,

    /// Limit reporting to channels whose name starts with this pattern
    #[arg(long, default_value = MATCH_ALL)]
    pub channels: String,

    /// Path to the YAML config file
    #[arg(long, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

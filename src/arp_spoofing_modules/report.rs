use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::arp_poison::PoisonSummary;
use super::config::SpoofConfig;
use super::error::Result;

pub const REPORT_FILE_NAME: &str = "arp_spoof_report.json";

fn report_value(config: &SpoofConfig, summary: &PoisonSummary) -> Value {
    json!({
        "interface": config.interface,
        "attacker": {
            "mac": summary.my_mac.to_string(),
            "ip": summary.my_ip.to_string(),
        },
        "target": {
            "mac": summary.target_mac.to_string(),
            "ip": config.target_ip.to_string(),
        },
        "gateway_ip": config.gateway_ip.to_string(),
        "request_sent": summary.request_sent,
        "spoof_sent": summary.spoof_sent,
        "started_at": summary.started_at.to_string(),
        "started_at_unix": summary.started_at.unix_timestamp(),
        "elapsed_ms": summary.elapsed_ms as u64,
    })
}

/// Writes the run report into `directory`, creating it if needed, and
/// returns the path of the written file.
pub fn write_report_to_directory(
    directory: &Path,
    config: &SpoofConfig,
    summary: &PoisonSummary,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let path = directory.join(REPORT_FILE_NAME);
    let mut file = File::create(&path)?;
    serde_json::to_writer_pretty(&mut file, &report_value(config, summary))
        .map_err(std::io::Error::from)?;
    file.write_all(b"\n")?;

    info!("Wrote run report to {}", path.display());
    Ok(path)
}

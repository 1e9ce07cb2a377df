//! Command line and run configuration.

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use super::arp_capture::CaptureConfig;
use super::error::{Error, Result};
use super::get_victim_data::REPLY_TIMEOUT;

const SAMPLE: &str = "sample: arp_spoof wlan0 192.168.10.2 192.168.10.1";

#[derive(Parser, Debug)]
#[command(name = "arp_spoof")]
#[command(version, about = "Poison one host's ARP entry for its gateway", long_about = None)]
pub struct Cli {
    /// Interface to send and capture on
    pub interface: String,

    /// Host whose ARP cache gets poisoned
    pub target_ip: Ipv4Addr,

    /// Gateway address to impersonate
    pub gateway_ip: Ipv4Addr,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write a JSON report of the run into this directory
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Everything one run needs, fixed once the arguments are accepted.
#[derive(Debug, Clone)]
pub struct SpoofConfig {
    pub interface: String,
    pub target_ip: Ipv4Addr,
    pub gateway_ip: Ipv4Addr,
    pub reply_timeout: Duration,
    pub capture: CaptureConfig,
    pub output_dir: Option<PathBuf>,
    pub verbose: u8,
}

impl SpoofConfig {
    /// Parses a full argument vector, program name first.
    ///
    /// `--help` and `--version` come back as `Error::Help` carrying the text
    /// to print. Every other rejection, including a wrong argument count or
    /// an address that does not parse, comes back as `Error::Usage`.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Error::Help(e.render().to_string())
            }
            _ => Error::Usage(format!("{}{}", e.render(), SAMPLE)),
        })?;
        Ok(cli.into())
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl From<Cli> for SpoofConfig {
    fn from(cli: Cli) -> Self {
        SpoofConfig {
            interface: cli.interface,
            target_ip: cli.target_ip,
            gateway_ip: cli.gateway_ip,
            reply_timeout: REPLY_TIMEOUT,
            capture: CaptureConfig::default(),
            output_dir: cli.output_dir,
            verbose: cli.verbose,
        }
    }
}

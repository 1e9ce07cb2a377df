use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for a bad command line, the `-1` of a C `main`.
pub const USAGE_EXIT_CODE: u8 = 255;

/// Exit status for every fatal failure after the arguments were accepted.
pub const FAILURE_EXIT_CODE: u8 = 1;

#[derive(Error, Debug)]
pub enum Error {
    /// Wrong argument count or an argument clap could not parse.
    #[error("{0}")]
    Usage(String),

    /// `--help` or `--version` output; not a failure.
    #[error("{0}")]
    Help(String),

    #[error("couldn't open device {0}: interface not found")]
    InterfaceNotFound(String),

    #[error("failed to get my MAC: interface {0} has no hardware address")]
    NoHardwareAddress(String),

    #[error("failed to get my IP: interface {0} has no IPv4 address")]
    NoIpv4Address(String),

    #[error("couldn't open device {interface}: {reason}")]
    Channel { interface: String, reason: String },

    #[error("capture error: {0}")]
    Capture(#[source] io::Error),

    #[error("failed to get target MAC: no ARP reply from {target} within {waited:?}")]
    ReplyTimeout { target: Ipv4Addr, waited: Duration },

    #[error("interrupted while waiting for an ARP reply from {0}")]
    Interrupted(Ipv4Addr),

    #[error("couldn't write run report: {0}")]
    Report(#[from] io::Error),

    #[error("couldn't install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Help(_) => 0,
            Error::Usage(_) => USAGE_EXIT_CODE,
            _ => FAILURE_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_use_the_negative_status() {
        assert_eq!(Error::Usage("usage".into()).exit_code(), 255);
    }

    #[test]
    fn help_output_is_not_a_failure() {
        assert_eq!(Error::Help("arp_spoof 0.1.0".into()).exit_code(), 0);
    }

    #[test]
    fn fatal_errors_use_the_failure_status() {
        let err = Error::ReplyTimeout {
            target: Ipv4Addr::new(10, 0, 0, 10),
            waited: Duration::from_secs(5),
        };
        assert_eq!(err.exit_code(), FAILURE_EXIT_CODE);
        assert!(err.to_string().contains("10.0.0.10"));
    }
}

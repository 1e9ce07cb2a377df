mod arp_spoofing_modules;

use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub use crate::arp_spoofing_modules::arp_capture::{NetworkHost, SystemHost};
pub use crate::arp_spoofing_modules::arp_poison;
pub use crate::arp_spoofing_modules::config::SpoofConfig;
pub use crate::arp_spoofing_modules::error::{Error, Result};
pub use crate::arp_spoofing_modules::interrupt::Interrupt;
pub use crate::arp_spoofing_modules::report;

fn init_tracing(config: &SpoofConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Without a handler Ctrl-C keeps its default behaviour; only the early
/// exit from the reply wait is lost.
fn interrupt_or_default() -> Interrupt {
    Interrupt::install().unwrap_or_else(|e| {
        warn!("{}; Ctrl-C will not be caught", e);
        Interrupt::never()
    })
}

fn run<H: NetworkHost>(config: &SpoofConfig, host: &H, interrupt: &Interrupt) -> Result<()> {
    let summary = arp_poison::poison_target(host, config, interrupt)?;

    if let Some(directory) = &config.output_dir {
        let path = report::write_report_to_directory(directory, config, &summary)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = match SpoofConfig::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(Error::Help(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    init_tracing(&config);

    let interrupt = interrupt_or_default();
    match run(&config, &SystemHost, &interrupt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Run failed: {:?}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

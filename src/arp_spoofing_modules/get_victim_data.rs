use crossbeam::channel::Receiver;
use pnet::util::MacAddr;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

use super::arp_capture::FrameLink;
use super::arp_frame::EthArpFrame;
use super::error::{Error, Result};

/// How long to wait for the victim to answer our request.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Broadcasts one ARP request for `target_ip`. A failed send is reported and
/// otherwise ignored; the return value only says whether it went out.
pub fn send_arp_request<L: FrameLink + ?Sized>(
    link: &mut L,
    my_mac: MacAddr,
    my_ip: Ipv4Addr,
    target_ip: Ipv4Addr,
) -> bool {
    let frame = EthArpFrame::request(my_mac, my_ip, target_ip);
    debug!("ARP request frame: {:?}", frame);

    match link.send_frame(&frame.to_bytes()) {
        Ok(()) => {
            println!("ARP request sent to {}", target_ip);
            true
        }
        Err(e) => {
            eprintln!("Failed to send ARP request to {}: {}", target_ip, e);
            false
        }
    }
}

/// Waits up to `timeout` for an ARP reply sent by `target_ip` and returns the
/// sender hardware address of the first one seen.
///
/// Frames that are not ARP, not replies, or not from `target_ip` are skipped.
/// A receive error ends the wait immediately, as does a message on
/// `interrupt`.
pub fn get_victim_mac_address<L: FrameLink + ?Sized>(
    link: &mut L,
    target_ip: Ipv4Addr,
    timeout: Duration,
    interrupt: &Receiver<()>,
) -> Result<MacAddr> {
    let start_time = Instant::now();

    while start_time.elapsed() < timeout {
        if interrupt.try_recv().is_ok() {
            return Err(Error::Interrupted(target_ip));
        }

        let packet = match link.next_frame() {
            Ok(Some(packet)) => packet,
            Ok(None) => continue,
            Err(e) => {
                error!("Error packet receiver: {}", e);
                return Err(Error::Capture(e));
            }
        };

        let arp = match EthArpFrame::parse(packet) {
            Some(arp) => arp,
            None => continue,
        };
        if !arp.is_reply() {
            trace!("Skipping ARP {:?} from {}", arp.operation, arp.sender_proto_addr);
            continue;
        }
        if arp.sender_proto_addr != target_ip {
            trace!("Skipping ARP reply from {}", arp.sender_proto_addr);
            continue;
        }

        debug!(
            "ARP reply from {} after {:?}",
            target_ip,
            start_time.elapsed()
        );
        return Ok(arp.sender_hw_addr);
    }

    Err(Error::ReplyTimeout {
        target: target_ip,
        waited: timeout,
    })
}

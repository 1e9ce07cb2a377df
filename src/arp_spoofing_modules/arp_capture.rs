use pnet::datalink::{self, Channel, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, info};

use super::error::{Error, Result};

/// Read timeout of one receive call. The reply listener keeps its own
/// overall deadline on top of this.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Settings for the datalink channel behind a capture handle.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub read_timeout: Duration,
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    pub promiscuous: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            read_timeout: DEFAULT_POLL_INTERVAL,
            read_buffer_size: DEFAULT_BUFFER_SIZE,
            write_buffer_size: DEFAULT_BUFFER_SIZE,
            promiscuous: true,
        }
    }
}

/// A live capture handle able to inject and receive raw Ethernet frames.
pub trait FrameLink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Next received frame, `Ok(None)` when nothing arrived within the
    /// handle's read timeout.
    fn next_frame(&mut self) -> io::Result<Option<&[u8]>>;
}

/// The pieces of the local network stack the pipeline depends on.
pub trait NetworkHost {
    type Link: FrameLink;

    fn open_link(&self, interface: &str, config: &CaptureConfig) -> Result<Self::Link>;

    fn hardware_address(&self, interface: &str) -> Result<MacAddr>;

    fn ipv4_address(&self, interface: &str) -> Result<Ipv4Addr>;
}

/// Capture handle over a pnet datalink channel. Dropping it closes the
/// underlying socket.
pub struct PnetLink {
    interface: NetworkInterface,
    sender: Box<dyn DataLinkSender>,
    receiver: Box<dyn DataLinkReceiver>,
}

impl FrameLink for PnetLink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        match self.sender.send_to(frame, None) {
            Some(result) => result,
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "datalink sender has no buffer available",
            )),
        }
    }

    fn next_frame(&mut self) -> io::Result<Option<&[u8]>> {
        match self.receiver.next() {
            Ok(frame) => Ok(Some(frame)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut
                        | io::ErrorKind::WouldBlock
                        | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for PnetLink {
    fn drop(&mut self) {
        debug!("Closing capture handle on {}", self.interface.name);
    }
}

/// The host's real interfaces, as enumerated by pnet.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl SystemHost {
    fn find_interface(name: &str) -> Result<NetworkInterface> {
        datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }

    fn open_data_channel(
        interface: &NetworkInterface,
        config: &CaptureConfig,
    ) -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)> {
        let channel_config = datalink::Config {
            read_timeout: Some(config.read_timeout),
            read_buffer_size: config.read_buffer_size,
            write_buffer_size: config.write_buffer_size,
            promiscuous: config.promiscuous,
            ..Default::default()
        };

        match datalink::channel(interface, channel_config) {
            Ok(Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
            Ok(_) => Err(Error::Channel {
                interface: interface.name.clone(),
                reason: "unhandled channel type".to_string(),
            }),
            Err(e) => Err(Error::Channel {
                interface: interface.name.clone(),
                reason: format!("{} (verify that you are in ROOT mode)", e),
            }),
        }
    }
}

impl NetworkHost for SystemHost {
    type Link = PnetLink;

    fn open_link(&self, interface: &str, config: &CaptureConfig) -> Result<PnetLink> {
        let interface = Self::find_interface(interface)?;
        let (sender, receiver) = Self::open_data_channel(&interface, config)?;
        info!("Opened capture handle on {}", interface.name);
        Ok(PnetLink {
            interface,
            sender,
            receiver,
        })
    }

    fn hardware_address(&self, interface: &str) -> Result<MacAddr> {
        Self::find_interface(interface)?
            .mac
            .ok_or_else(|| Error::NoHardwareAddress(interface.to_string()))
    }

    fn ipv4_address(&self, interface: &str) -> Result<Ipv4Addr> {
        let found = Self::find_interface(interface)?;
        first_ipv4(found.ips.iter().map(|network| network.ip()))
            .ok_or_else(|| Error::NoIpv4Address(interface.to_string()))
    }
}

fn first_ipv4<I: IntoIterator<Item = IpAddr>>(ips: I) -> Option<Ipv4Addr> {
    ips.into_iter().find_map(|ip| match ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn first_ipv4_skips_ipv6_addresses() {
        let ips = [
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 6)),
        ];
        assert_eq!(first_ipv4(ips), Some(Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[test]
    fn first_ipv4_none_without_ipv4() {
        assert_eq!(first_ipv4([IpAddr::V6(Ipv6Addr::LOCALHOST)]), None);
        assert_eq!(first_ipv4(Vec::new()), None);
    }

    #[test]
    fn unknown_interface_is_reported_by_name() {
        let err = SystemHost.hardware_address("no-such-iface0").unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound(ref name) if name == "no-such-iface0"));
    }

    #[test]
    fn default_capture_config_polls_every_100ms() {
        let config = CaptureConfig::default();
        assert_eq!(config.read_timeout, Duration::from_millis(100));
        assert!(config.promiscuous);
    }
}

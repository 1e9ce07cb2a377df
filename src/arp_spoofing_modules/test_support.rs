//! In-memory capture handle and host used by the unit tests.

use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use pnet::util::MacAddr;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::net::Ipv4Addr;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use super::arp_capture::{CaptureConfig, FrameLink, NetworkHost};
use super::arp_frame::EthArpFrame;
use super::error::{Error, Result};

/// An ARP reply from `sender_mac`/`sender_ip` addressed to `receiver_mac`.
pub fn arp_reply(sender_mac: MacAddr, sender_ip: Ipv4Addr, receiver_mac: MacAddr) -> Vec<u8> {
    // A spoofed reply and an honest one share a layout; only the meaning of
    // the sender fields differs.
    EthArpFrame::spoofed_reply(
        sender_mac,
        sender_ip,
        receiver_mac,
        Ipv4Addr::new(10, 0, 0, 5),
    )
    .to_bytes()
    .to_vec()
}

/// A minimal IPv4-typed Ethernet frame.
pub fn ipv4_frame(source: MacAddr, destination: MacAddr) -> Vec<u8> {
    let mut buffer = vec![0u8; 60];
    let mut ethernet = MutableEthernetPacket::new(&mut buffer).unwrap();
    ethernet.set_source(source);
    ethernet.set_destination(destination);
    ethernet.set_ethertype(EtherTypes::Ipv4);
    buffer
}

pub struct MockLink {
    inbound: VecDeque<Vec<u8>>,
    current: Vec<u8>,
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
    closed: Rc<Cell<bool>>,
    fail_sends: bool,
    receive_error: Option<io::ErrorKind>,
}

impl MockLink {
    pub fn new() -> Self {
        MockLink {
            inbound: VecDeque::new(),
            current: Vec::new(),
            sent: Rc::new(RefCell::new(Vec::new())),
            closed: Rc::new(Cell::new(false)),
            fail_sends: false,
            receive_error: None,
        }
    }

    pub fn with_inbound(mut self, frame: Vec<u8>) -> Self {
        self.inbound.push_back(frame);
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Returned once every queued frame has been read.
    pub fn with_receive_error(mut self, kind: io::ErrorKind) -> Self {
        self.receive_error = Some(kind);
        self
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.borrow().clone()
    }
}

impl FrameLink for MockLink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        if self.fail_sends {
            return Err(io::Error::new(io::ErrorKind::Other, "send refused"));
        }
        self.sent.borrow_mut().push(frame.to_vec());
        Ok(())
    }

    fn next_frame(&mut self) -> io::Result<Option<&[u8]>> {
        if let Some(frame) = self.inbound.pop_front() {
            self.current = frame;
            return Ok(Some(&self.current));
        }
        if let Some(kind) = self.receive_error {
            return Err(io::Error::from(kind));
        }
        // Stand-in for the datalink read timeout.
        thread::sleep(Duration::from_millis(2));
        Ok(None)
    }
}

impl Drop for MockLink {
    fn drop(&mut self) {
        self.closed.set(true);
    }
}

/// A host with a single interface whose capture handle is `link`.
pub struct MockHost {
    name: String,
    mac: Option<MacAddr>,
    ip: Option<Ipv4Addr>,
    link: RefCell<Option<MockLink>>,
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
    closed: Rc<Cell<bool>>,
    opened: Cell<usize>,
}

impl MockHost {
    pub fn new(name: &str, mac: Option<MacAddr>, ip: Option<Ipv4Addr>, link: MockLink) -> Self {
        MockHost {
            name: name.to_string(),
            mac,
            ip,
            sent: Rc::clone(&link.sent),
            closed: Rc::clone(&link.closed),
            link: RefCell::new(Some(link)),
            opened: Cell::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// True once the handed-out link has been dropped.
    pub fn link_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.borrow().clone()
    }

    fn check_name(&self, interface: &str) -> Result<()> {
        if interface == self.name {
            Ok(())
        } else {
            Err(Error::InterfaceNotFound(interface.to_string()))
        }
    }
}

impl NetworkHost for MockHost {
    type Link = MockLink;

    fn open_link(&self, interface: &str, _config: &CaptureConfig) -> Result<MockLink> {
        self.check_name(interface)?;
        self.opened.set(self.opened.get() + 1);
        self.link.borrow_mut().take().ok_or_else(|| Error::Channel {
            interface: interface.to_string(),
            reason: "already open".to_string(),
        })
    }

    fn hardware_address(&self, interface: &str) -> Result<MacAddr> {
        self.check_name(interface)?;
        self.mac
            .ok_or_else(|| Error::NoHardwareAddress(interface.to_string()))
    }

    fn ipv4_address(&self, interface: &str) -> Result<Ipv4Addr> {
        self.check_name(interface)?;
        self.ip.ok_or_else(|| Error::NoIpv4Address(interface.to_string()))
    }
}

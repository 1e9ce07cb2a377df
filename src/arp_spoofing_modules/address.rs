//! Hardware and IPv4 address constants.
//!
//! `MacAddr` (pnet) parses and prints colon-hex, `Ipv4Addr` parses and
//! prints dotted quads and converts to network byte order via `octets()`.

use pnet::util::MacAddr;

pub const MAC_LEN: u8 = 6;
pub const IPV4_LEN: u8 = 4;

pub const BROADCAST_MAC: MacAddr = MacAddr(0xff, 0xff, 0xff, 0xff, 0xff, 0xff);
pub const UNKNOWN_MAC: MacAddr = MacAddr(0, 0, 0, 0, 0, 0);

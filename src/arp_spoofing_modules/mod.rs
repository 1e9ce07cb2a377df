pub mod address;
pub mod arp_capture;
pub mod arp_frame;
pub mod arp_poison;
pub mod config;
pub mod error;
pub mod get_victim_data;
pub mod interrupt;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

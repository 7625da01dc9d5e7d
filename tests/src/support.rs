use std::net::IpAddr;

use rdpgate_common::network::interface::{InterfaceInfo, MediaType, OperStatus};

pub fn ni(name: &str, addresses: &[&str], gateways: &[&str]) -> InterfaceInfo {
    InterfaceInfo {
        name: name.into(),
        description: "Realtek PCIe GbE Family Controller".into(),
        status: OperStatus::Up,
        speed: Some(1000),
        media: MediaType::Ethernet,
        addresses: addresses.iter().map(|a| ip(a)).collect(),
        gateways: gateways.iter().map(|g| ip(g)).collect(),
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

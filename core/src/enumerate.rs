use std::net::Ipv4Addr;

use rdpgate_common::network::interface::{InterfaceInfo, InterfaceSource, MediaType, OperStatus};
use thiserror::Error;
use tracing::debug;

/// Marks adapters that must never be offered, matched against the description.
const VIRTUAL_MARKER: &str = "Virtual";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum ViabilityError {
    #[error("interface is not up")]
    IsDown,
    #[error("link speed is zero")]
    NoLinkSpeed,
    #[error("media type is neither Ethernet nor 802.11 wireless")]
    UnsupportedMedia,
    #[error("virtual adapter")]
    IsVirtual,
    #[error("no IPv4 default gateway")]
    NoIpv4Gateway,
}

/// An interface that passed every eligibility check, reduced to its IPv4 view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleInterface {
    pub name: String,
    pub description: String,
    pub addresses: Vec<Ipv4Addr>,
    pub gateways: Vec<Ipv4Addr>,
}

/// Queries `source` and keeps the eligible interfaces in reported order.
///
/// A failing query is returned as is; there is nothing to fall back to.
pub fn eligible_interfaces(source: &dyn InterfaceSource) -> anyhow::Result<Vec<EligibleInterface>> {
    let interfaces: Vec<InterfaceInfo> = source.interfaces()?;
    debug!("Identified {} network interface(s)", interfaces.len());

    let eligible = interfaces
        .into_iter()
        .filter_map(|iface| match is_eligible(&iface) {
            Ok(()) => Some(EligibleInterface {
                addresses: iface.ipv4_addresses(),
                gateways: iface.ipv4_gateways(),
                name: iface.name,
                description: iface.description,
            }),
            Err(reason) => {
                debug!("Skipping {}: {}", iface.name, reason);
                None
            }
        })
        .collect();

    Ok(eligible)
}

pub fn is_eligible(iface: &InterfaceInfo) -> Result<(), ViabilityError> {
    if iface.status != OperStatus::Up {
        return Err(ViabilityError::IsDown);
    }
    if iface.speed == Some(0) {
        return Err(ViabilityError::NoLinkSpeed);
    }
    if !matches!(iface.media, MediaType::Ethernet | MediaType::Wireless80211) {
        return Err(ViabilityError::UnsupportedMedia);
    }
    if iface.description.contains(VIRTUAL_MARKER) {
        return Err(ViabilityError::IsVirtual);
    }
    if iface.ipv4_gateways().is_empty() {
        return Err(ViabilityError::NoIpv4Gateway);
    }

    Ok(())
}

//! # Network interface descriptors
//!
//! [`InterfaceInfo`] is the platform-neutral view of an interface that the
//! workflow filters on. [`SystemInterfaces`] builds it from `pnet` plus the
//! platform-specific details pnet does not report (operational state, link
//! speed, media type) and the default-route table.

use std::net::{IpAddr, Ipv4Addr};

use pnet::datalink::NetworkInterface;
use tracing::debug;

#[cfg(target_os = "linux")]
use linux_impl::{description, media_type, oper_status, speed};
#[cfg(target_os = "macos")]
use macos_impl::{description, media_type, oper_status, speed};
#[cfg(target_os = "windows")]
use windows_impl::{description, media_type, oper_status, speed};
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use fallback_impl::{description, media_type, oper_status, speed};

use crate::network::route::{self, DefaultRoute};
use crate::utils::interface::NetworkInterfaceExtension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperStatus {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Ethernet,
    Wireless80211,
    Loopback,
    Tunnel,
    Other,
}

/// An interface as reported by the operating system for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub description: String,
    pub status: OperStatus,
    /// Link speed in Mbit/s. `None` when the platform does not report one.
    pub speed: Option<u64>,
    pub media: MediaType,
    /// Unicast addresses of every family.
    pub addresses: Vec<IpAddr>,
    /// Gateway addresses of every family.
    pub gateways: Vec<IpAddr>,
}

impl InterfaceInfo {
    pub fn ipv4_addresses(&self) -> Vec<Ipv4Addr> {
        only_v4(&self.addresses)
    }

    pub fn ipv4_gateways(&self) -> Vec<Ipv4Addr> {
        only_v4(&self.gateways)
    }
}

fn only_v4(addrs: &[IpAddr]) -> Vec<Ipv4Addr> {
    addrs
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
        .collect()
}

/// Source of the interface list, queried once per run.
pub trait InterfaceSource {
    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>>;
}

/// Interfaces of the host this process runs on.
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        let routes: Vec<DefaultRoute> = route::default_routes()?;
        debug!("Found {} IPv4 default route(s)", routes.len());

        let interfaces: Vec<InterfaceInfo> = pnet::datalink::interfaces()
            .iter()
            .map(|iface| describe(iface, &routes))
            .collect();

        Ok(interfaces)
    }
}

fn describe(iface: &NetworkInterface, routes: &[DefaultRoute]) -> InterfaceInfo {
    InterfaceInfo {
        name: iface.name.clone(),
        description: description(iface),
        status: oper_status(iface),
        speed: speed(iface),
        media: media_type(iface),
        addresses: iface.ips.iter().map(|net| net.ip()).collect(),
        gateways: gateways_for(iface, routes),
    }
}

/// Gateways of the default routes leaving through `iface`, without duplicates.
fn gateways_for(iface: &NetworkInterface, routes: &[DefaultRoute]) -> Vec<IpAddr> {
    let local: Vec<Ipv4Addr> = iface.get_ipv4_addrs();
    let mut gateways: Vec<IpAddr> = Vec::new();
    for route in routes.iter().filter(|r| r.leaves_through(&iface.name, &local)) {
        let gateway = IpAddr::V4(route.gateway);
        if !gateways.contains(&gateway) {
            gateways.push(gateway);
        }
    }
    gateways
}

/// pnet leaves the flags empty where it cannot read them (Windows), which says
/// nothing about the link.
fn status_from_flags(iface: &NetworkInterface) -> OperStatus {
    if iface.flags == 0 {
        OperStatus::Unknown
    } else if iface.is_up() {
        OperStatus::Up
    } else {
        OperStatus::Down
    }
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::fs;
    use std::path::Path;

    const ARPHRD_ETHER: u32 = 1;
    const ARPHRD_LOOPBACK: u32 = 772;
    const ARPHRD_NONE: u32 = 65534;

    fn sysfs(iface: &NetworkInterface, attribute: &str) -> Option<String> {
        fs::read_to_string(format!("/sys/class/net/{}/{}", iface.name, attribute))
            .ok()
            .map(|value| value.trim().to_string())
    }

    fn has_sysfs_entry(iface: &NetworkInterface, entry: &str) -> bool {
        Path::new(&format!("/sys/class/net/{}/{}", iface.name, entry)).exists()
    }

    pub fn oper_status(iface: &NetworkInterface) -> OperStatus {
        match sysfs(iface, "operstate").as_deref() {
            Some("up") => OperStatus::Up,
            Some("down") | Some("lowerlayerdown") | Some("notpresent") | Some("dormant") => {
                OperStatus::Down
            }
            // Loopback and most tunnels never leave "unknown".
            _ => status_from_flags(iface),
        }
    }

    /// Unreadable or negative values mean the driver does not know the speed,
    /// which is the norm for wireless links.
    pub fn speed(iface: &NetworkInterface) -> Option<u64> {
        let raw: i64 = sysfs(iface, "speed")?.parse().ok()?;
        u64::try_from(raw).ok()
    }

    pub fn media_type(iface: &NetworkInterface) -> MediaType {
        if has_sysfs_entry(iface, "wireless") || has_sysfs_entry(iface, "phy80211") {
            return MediaType::Wireless80211;
        }
        match sysfs(iface, "type").and_then(|t| t.parse::<u32>().ok()) {
            Some(ARPHRD_ETHER) => MediaType::Ethernet,
            Some(ARPHRD_LOOPBACK) => MediaType::Loopback,
            Some(ARPHRD_NONE) => MediaType::Tunnel,
            _ => MediaType::Other,
        }
    }

    /// Linux carries no adapter description; interfaces without a backing
    /// device (bridges, veth pairs, dummies) are described as virtual.
    pub fn description(iface: &NetworkInterface) -> String {
        if !iface.description.is_empty() {
            return iface.description.clone();
        }
        if has_sysfs_entry(iface, "device") {
            "Network adapter".to_string()
        } else {
            "Virtual network adapter".to_string()
        }
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwareInfo {
        /// Device name to hardware port name, e.g. `en0` to `Wi-Fi`.
        ports: HashMap<String, String>,
        wireless_devices: HashSet<String>,
    }

    /// Runs `networksetup` once on first access.
    fn get_hardware_info() -> &'static HardwareInfo {
        static HARDWARE_INFO: OnceLock<HardwareInfo> = OnceLock::new();

        HARDWARE_INFO.get_or_init(|| {
            let mut ports = HashMap::new();
            let mut wireless = HashSet::new();

            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let mut port_name: Option<String> = None;
                for line in stdout.lines() {
                    if let Some(port) = line.strip_prefix("Hardware Port: ") {
                        port_name = Some(port.trim().to_string());
                    } else if let Some(device) = line.strip_prefix("Device: ") {
                        let port = port_name.take().unwrap_or_default();
                        ports.insert(device.trim().to_string(), port);
                    }
                }
            }

            for device in ports.keys() {
                let is_wifi = Command::new("networksetup")
                    .arg("-getairportnetwork")
                    .arg(device)
                    .output()
                    .map(|out| out.status.success())
                    .unwrap_or(false);

                if is_wifi {
                    wireless.insert(device.clone());
                }
            }

            HardwareInfo {
                ports,
                wireless_devices: wireless,
            }
        })
    }

    pub fn oper_status(iface: &NetworkInterface) -> OperStatus {
        status_from_flags(iface)
    }

    pub fn speed(_iface: &NetworkInterface) -> Option<u64> {
        None
    }

    pub fn media_type(iface: &NetworkInterface) -> MediaType {
        let info = get_hardware_info();
        if info.wireless_devices.contains(&iface.name) {
            MediaType::Wireless80211
        } else if info.ports.contains_key(&iface.name) {
            MediaType::Ethernet
        } else if iface.is_loopback() {
            MediaType::Loopback
        } else if iface.is_point_to_point() {
            MediaType::Tunnel
        } else {
            MediaType::Other
        }
    }

    pub fn description(iface: &NetworkInterface) -> String {
        match get_hardware_info().ports.get(&iface.name) {
            Some(port) => port.clone(),
            None => "Virtual network adapter".to_string(),
        }
    }
}

/// Values of the IP Helper `IF_OPER_STATUS` and IANA `ifType` fields.
#[cfg(any(target_os = "windows", test))]
mod if_mib {
    use super::{MediaType, OperStatus};

    const IF_OPER_STATUS_UP: i32 = 1;
    const IF_OPER_STATUS_DOWN: i32 = 2;
    const IF_OPER_STATUS_TESTING: i32 = 3;
    const IF_OPER_STATUS_DORMANT: i32 = 5;
    const IF_OPER_STATUS_NOT_PRESENT: i32 = 6;
    const IF_OPER_STATUS_LOWER_LAYER_DOWN: i32 = 7;

    const IF_TYPE_ETHERNET_CSMACD: u32 = 6;
    const IF_TYPE_PPP: u32 = 23;
    const IF_TYPE_SOFTWARE_LOOPBACK: u32 = 24;
    const IF_TYPE_IEEE80211: u32 = 71;
    const IF_TYPE_TUNNEL: u32 = 131;

    pub fn oper_status(value: i32) -> OperStatus {
        match value {
            IF_OPER_STATUS_UP => OperStatus::Up,
            IF_OPER_STATUS_DOWN
            | IF_OPER_STATUS_TESTING
            | IF_OPER_STATUS_DORMANT
            | IF_OPER_STATUS_NOT_PRESENT
            | IF_OPER_STATUS_LOWER_LAYER_DOWN => OperStatus::Down,
            _ => OperStatus::Unknown,
        }
    }

    pub fn media_type(if_type: u32) -> MediaType {
        match if_type {
            IF_TYPE_ETHERNET_CSMACD => MediaType::Ethernet,
            IF_TYPE_IEEE80211 => MediaType::Wireless80211,
            IF_TYPE_SOFTWARE_LOOPBACK => MediaType::Loopback,
            IF_TYPE_TUNNEL | IF_TYPE_PPP => MediaType::Tunnel,
            _ => MediaType::Other,
        }
    }

    /// `TransmitLinkSpeed` is in bit/s, with `u64::MAX` for unknown.
    pub fn speed_mbps(bits_per_second: u64) -> Option<u64> {
        match bits_per_second {
            u64::MAX => None,
            bits => Some(bits.div_ceil(1_000_000)),
        }
    }
}

#[cfg(target_os = "windows")]
mod windows_impl {
    use super::*;
    use std::collections::HashMap;
    use std::sync::OnceLock;
    use windows::Win32::NetworkManagement::IpHelper::{
        GAA_FLAG_INCLUDE_PREFIX, GetAdaptersAddresses, IP_ADAPTER_ADDRESSES_LH,
    };
    use windows::Win32::Networking::WinSock::AF_UNSPEC;

    struct AdapterRow {
        status: OperStatus,
        media: MediaType,
        speed: Option<u64>,
        description: String,
    }

    /// Adapter details keyed by interface index, queried once on first access.
    fn get_adapters() -> &'static HashMap<u32, AdapterRow> {
        static ADAPTERS: OnceLock<HashMap<u32, AdapterRow>> = OnceLock::new();

        ADAPTERS.get_or_init(|| {
            query_adapters().unwrap_or_else(|| {
                debug!("GetAdaptersAddresses failed, falling back to pnet flags");
                HashMap::new()
            })
        })
    }

    fn query_adapters() -> Option<HashMap<u32, AdapterRow>> {
        let mut rows = HashMap::new();

        unsafe {
            let mut size: u32 = 0;
            let _ = GetAdaptersAddresses(AF_UNSPEC.0 as u32, GAA_FLAG_INCLUDE_PREFIX, None, None, &mut size);
            if size == 0 {
                return None;
            }

            // u64 storage keeps the adapter records aligned.
            let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
            let first = buffer.as_mut_ptr() as *mut IP_ADAPTER_ADDRESSES_LH;
            if GetAdaptersAddresses(
                AF_UNSPEC.0 as u32,
                GAA_FLAG_INCLUDE_PREFIX,
                None,
                Some(first),
                &mut size,
            ) != 0
            {
                return None;
            }

            let mut current = first;
            while !current.is_null() {
                let adapter = &*current;
                rows.insert(
                    adapter.Anonymous1.Anonymous.IfIndex,
                    AdapterRow {
                        status: if_mib::oper_status(adapter.OperStatus.0),
                        media: if_mib::media_type(adapter.IfType),
                        speed: if_mib::speed_mbps(adapter.TransmitLinkSpeed),
                        description: adapter.Description.to_string().unwrap_or_default(),
                    },
                );
                current = adapter.Next;
            }
        }

        Some(rows)
    }

    fn adapter(iface: &NetworkInterface) -> Option<&'static AdapterRow> {
        get_adapters().get(&iface.index)
    }

    pub fn oper_status(iface: &NetworkInterface) -> OperStatus {
        match adapter(iface) {
            Some(row) => row.status,
            None => fallback_impl::oper_status(iface),
        }
    }

    pub fn speed(iface: &NetworkInterface) -> Option<u64> {
        match adapter(iface) {
            Some(row) => row.speed,
            None => fallback_impl::speed(iface),
        }
    }

    pub fn media_type(iface: &NetworkInterface) -> MediaType {
        match adapter(iface) {
            Some(row) => row.media,
            None => fallback_impl::media_type(iface),
        }
    }

    pub fn description(iface: &NetworkInterface) -> String {
        match adapter(iface) {
            Some(row) if !row.description.is_empty() => row.description.clone(),
            _ => fallback_impl::description(iface),
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod fallback_impl {
    use super::*;

    const WIRELESS_KEYWORDS: &[&str] = &["Wireless", "Wi-Fi", "WiFi", "802.11", "WLAN"];

    pub fn oper_status(iface: &NetworkInterface) -> OperStatus {
        status_from_flags(iface)
    }

    pub fn speed(_iface: &NetworkInterface) -> Option<u64> {
        None
    }

    pub fn media_type(iface: &NetworkInterface) -> MediaType {
        if iface.is_loopback() {
            MediaType::Loopback
        } else if iface.is_point_to_point() {
            MediaType::Tunnel
        } else if WIRELESS_KEYWORDS
            .iter()
            .any(|keyword| iface.description.contains(keyword))
        {
            MediaType::Wireless80211
        } else if iface.mac.is_some() {
            MediaType::Ethernet
        } else {
            MediaType::Other
        }
    }

    pub fn description(iface: &NetworkInterface) -> String {
        iface.description.clone()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

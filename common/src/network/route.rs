//! # IPv4 default-route table
//!
//! Interface listings do not carry gateways, so they are read from the routing
//! table and attached to interfaces afterwards. Each platform exposes the table
//! as text; the parsers here are pure and the readers only fetch that text.

use std::net::Ipv4Addr;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::process::Command;

use anyhow::Context;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use tracing::warn;

/// How a route names the interface it leaves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteInterface {
    /// By interface name (`eth0`, `en0`).
    Name(String),
    /// By a local address assigned to the interface (Windows).
    Address(Ipv4Addr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    pub gateway: Ipv4Addr,
    pub via: RouteInterface,
}

impl DefaultRoute {
    pub fn leaves_through(&self, name: &str, local_addrs: &[Ipv4Addr]) -> bool {
        match &self.via {
            RouteInterface::Name(iface) => iface == name,
            RouteInterface::Address(addr) => local_addrs.contains(addr),
        }
    }
}

/// Reads the default routes of this host.
pub fn default_routes() -> anyhow::Result<Vec<DefaultRoute>> {
    #[cfg(target_os = "linux")]
    {
        let table = std::fs::read_to_string("/proc/net/route")
            .context("failed to read /proc/net/route")?;
        Ok(parse_proc_net_route(&table))
    }
    #[cfg(target_os = "macos")]
    {
        let table = command_output(Command::new("netstat").args(["-rn", "-f", "inet"]))?;
        Ok(parse_netstat(&table))
    }
    #[cfg(target_os = "windows")]
    {
        let table = command_output(Command::new("route").args(["print", "-4"]))?;
        Ok(parse_route_print(&table))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        warn!("Reading the routing table is not supported on this platform");
        Ok(Vec::new())
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn command_output(command: &mut Command) -> anyhow::Result<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("failed to run {program}"))?;
    if !output.status.success() {
        anyhow::bail!("{program} exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses the Linux `/proc/net/route` table.
///
/// Addresses are hex dumps of the kernel's network-order words printed in host
/// order, so the native byte order recovers the octets.
pub fn parse_proc_net_route(table: &str) -> Vec<DefaultRoute> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 8 || fields[1] != "00000000" || fields[7] != "00000000" {
                return None;
            }
            let raw = u32::from_str_radix(fields[2], 16).ok()?;
            let gateway = Ipv4Addr::from(raw.to_ne_bytes());
            if gateway.is_unspecified() {
                return None;
            }
            Some(DefaultRoute {
                gateway,
                via: RouteInterface::Name(fields[0].to_string()),
            })
        })
        .collect()
}

/// Parses `netstat -rn -f inet` output (macOS).
///
/// The column holding the interface moved between releases, so it is located
/// through the header line.
pub fn parse_netstat(table: &str) -> Vec<DefaultRoute> {
    let mut netif_column: Option<usize> = None;
    let mut routes = Vec::new();

    for line in table.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() == Some(&"Destination") {
            netif_column = fields.iter().position(|f| *f == "Netif");
            continue;
        }
        let Some(column) = netif_column else {
            continue;
        };
        if fields.first() != Some(&"default") {
            continue;
        }
        let (Some(gateway), Some(netif)) = (fields.get(1), fields.get(column)) else {
            continue;
        };
        if let Ok(gateway) = gateway.parse::<Ipv4Addr>() {
            routes.push(DefaultRoute {
                gateway,
                via: RouteInterface::Name(netif.to_string()),
            });
        }
    }

    routes
}

/// Parses `route print -4` output (Windows).
///
/// Active routes name the interface by its local address. Persistent routes end
/// in `Default` instead and on-link routes have no gateway; both are skipped.
pub fn parse_route_print(table: &str) -> Vec<DefaultRoute> {
    table
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 5 || fields[0] != "0.0.0.0" || fields[1] != "0.0.0.0" {
                return None;
            }
            let gateway = fields[2].parse::<Ipv4Addr>().ok()?;
            let local = fields[3].parse::<Ipv4Addr>().ok()?;
            Some(DefaultRoute {
                gateway,
                via: RouteInterface::Address(local),
            })
        })
        .collect()
}

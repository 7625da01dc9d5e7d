//! Turns the eligible interfaces into a confirmed gateway choice and port.

use std::net::Ipv4Addr;

use rdpgate_common::config::Mode;
use rdpgate_common::console::{Console, ConsoleError};
use rdpgate_common::network::gateway::{DEFAULT_PORT, GatewayCandidate};
use tracing::debug;

use crate::enumerate::EligibleInterface;

/// Shortest plausible textual form of an address (`0.0.0.0`).
const MIN_ADDRESS_LEN: usize = 7;

const INDEX_PROMPT: &str = "Enter the index of the default gateway to use: ";
const MANUAL_PROMPT: &str = "Enter the index of the default gateway, or an IPv4 address: ";
const RETRY_PROMPT: &str = "Invalid input, try again: ";
const PORT_PROMPT: &str = "Enter a port, or press enter to keep 3389: ";

/// What the user settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// A listed candidate, picked by index or automatically.
    Listed(GatewayCandidate),
    /// An address typed in manual mode, not necessarily among the candidates.
    Typed(Ipv4Addr),
}

impl Choice {
    pub fn address(&self) -> Ipv4Addr {
        match self {
            Choice::Listed(candidate) => candidate.address,
            Choice::Typed(address) => *address,
        }
    }
}

/// Lists every eligible interface with its gateways and numbers the gateways
/// globally, in enumeration order.
pub fn present(interfaces: &[EligibleInterface], console: &mut dyn Console) -> Vec<GatewayCandidate> {
    let mut candidates: Vec<GatewayCandidate> = Vec::new();
    console.print("Found the following interfaces and IPv4 default gateways, choose one by its index:");

    for iface in interfaces {
        let local: Vec<String> = iface.addresses.iter().map(|a| a.to_string()).collect();
        console.print("");
        console.print(&format!(
            "{} ({}) local IPv4: {}",
            iface.name,
            iface.description,
            local.join(", ")
        ));
        console.print("IPv4 default gateways (choose by index):");

        for gateway in &iface.gateways {
            let index = candidates.len();
            console.print(&format!("{:>8}{}", format!("[{index}]  "), gateway));
            candidates.push(GatewayCandidate {
                index,
                address: *gateway,
            });
        }
    }

    candidates
}

/// Resolves a choice among `candidates`, which must not be empty.
///
/// A single candidate is taken without asking in automatic mode. Otherwise the
/// prompt repeats until the input is valid.
pub fn choose(
    candidates: &[GatewayCandidate],
    mode: Mode,
    console: &mut dyn Console,
) -> Result<Choice, ConsoleError> {
    if let [only] = candidates {
        if !mode.is_manual() {
            console.print("");
            console.print(&format!(
                "Exactly one IPv4 default gateway was found ({}), selecting it automatically.",
                only.address
            ));
            return Ok(Choice::Listed(*only));
        }
    }

    console.print("");
    let mut prompt = if mode.is_manual() { MANUAL_PROMPT } else { INDEX_PROMPT };
    loop {
        let input = console.read_line(prompt)?;
        if let Some(choice) = parse_choice(&input, candidates, mode) {
            return Ok(choice);
        }
        debug!("Rejected gateway input {input:?}");
        prompt = RETRY_PROMPT;
    }
}

/// An in-range index, or in manual mode a well-formed IPv4 address. Index wins.
pub fn parse_choice(input: &str, candidates: &[GatewayCandidate], mode: Mode) -> Option<Choice> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        if let Some(candidate) = candidates.get(index) {
            return Some(Choice::Listed(*candidate));
        }
    }
    if mode.is_manual() {
        if let Ok(address) = input.parse::<Ipv4Addr>() {
            return Some(Choice::Typed(address));
        }
    }
    None
}

pub fn confirm(choice: &Choice, console: &mut dyn Console) {
    match choice {
        Choice::Listed(candidate) => console.print(&format!(
            "Selected [{}] {}",
            candidate.index, candidate.address
        )),
        Choice::Typed(address) => console.print(&format!("Selected {address}")),
    }
    console.print("");
}

/// Coarse check against degenerate formatting of the resolved address.
pub fn is_plausible(address: Ipv4Addr) -> bool {
    address.to_string().len() >= MIN_ADDRESS_LEN
}

/// Asks once for a port. Anything but a port in `1..=65535` keeps the default.
pub fn ask_port(console: &mut dyn Console) -> Result<u16, ConsoleError> {
    let input = console.read_line(PORT_PROMPT)?;
    if input.trim().is_empty() {
        return Ok(DEFAULT_PORT);
    }
    match parse_port(&input) {
        Some(port) => {
            console.print(&format!("Port set to {port}"));
            Ok(port)
        }
        None => {
            debug!("Ignoring port input {input:?}");
            Ok(DEFAULT_PORT)
        }
    }
}

pub fn parse_port(input: &str) -> Option<u16> {
    input.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

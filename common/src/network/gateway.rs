use std::fmt;
use std::net::Ipv4Addr;

/// The remote desktop port; substitutions using it omit the `:port` suffix.
pub const DEFAULT_PORT: u16 = 3389;

/// A selectable gateway together with the index shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayCandidate {
    pub index: usize,
    pub address: Ipv4Addr,
}

/// The confirmed target of the generated connection file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub address: Ipv4Addr,
    pub port: u16,
}

impl Selection {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            port: DEFAULT_PORT,
        }
    }

    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }
}

/// Renders the text that replaces the placeholder: `addr` or `addr:port`.
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == DEFAULT_PORT {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

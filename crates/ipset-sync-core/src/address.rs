//! Single-host CIDR entries written into an IP set

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

/// An IPv4 address rendered as a single-host `/32` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostCidr(Ipv4Addr);

impl HostCidr {
    /// Prefix length of every entry
    pub const PREFIX_LEN: u8 = 32;

    pub fn new(addr: Ipv4Addr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl From<Ipv4Addr> for HostCidr {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for HostCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::PREFIX_LEN)
    }
}

impl Serialize for HostCidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a list of entries as the strings the provider API expects
pub fn to_address_strings(cidrs: &[HostCidr]) -> Vec<String> {
    cidrs.iter().map(ToString::to_string).collect()
}

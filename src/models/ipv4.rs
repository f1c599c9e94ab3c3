//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing IPv4 blocks of VPCs, subnets and
//! routes, along with the few subnet calculations the report needs.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Destination block of a default route.
pub const DEFAULT_ROUTE: &str = "0.0.0.0/0";

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use aws_topology_audit::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Calculate the number of usable host addresses in an AWS subnet.
///
/// AWS reserves 5 IP addresses per subnet (network, VPC router, DNS, future use
/// and broadcast). The smallest subnet AWS accepts is a /28.
pub fn num_aws_hosts(len: u8) -> Result<u64, Box<dyn Error>> {
    if len > 28 {
        Err("Network length is too long or invalid".into())
    } else {
        let num_hosts = (1u64 << (MAX_LENGTH - len)) - 5;
        Ok(num_hosts)
    }
}

/// IPv4 address with CIDR notation support.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.mask);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl FromStr for Ipv4 {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4::new(s)
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err("Invalid address/mask".into());
        }
        let addr: Ipv4Addr = parts[0]
            .parse()
            .map_err(|_| format!("Invalid address {}", parts[0]))?;
        let mask: u8 = parts[1].parse()?;
        if mask > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Get the highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        let mask = get_cidr_mask(self.mask).unwrap_or(u32::MAX);
        Ipv4Addr::from(u32::from(self.addr) | !mask)
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        let mask = get_cidr_mask(self.mask).unwrap_or(u32::MAX);
        Ipv4Addr::from(u32::from(self.addr) & mask)
    }

    /// True if `addr` falls inside this block.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }

    /// True if `other` lies entirely inside this block.
    pub fn covers(&self, other: &Ipv4) -> bool {
        self.mask <= other.mask && self.contains(other.lo()) && self.contains(other.hi())
    }

    /// Number of usable host addresses, `None` for blocks smaller than a /28.
    pub fn usable_hosts(&self) -> Option<u64> {
        num_aws_hosts(self.mask).ok()
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

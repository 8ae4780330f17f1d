use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::addr::{parse_address, Address, AddressFamily, IpAddress, Ipv4Address, Ipv6Address};
use crate::error::{CidrError, Result};
use crate::net::IpNetwork;


static CIDR_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new("^(?P<addr>[^/]*)/(?P<prefix>[^/]*)$").unwrap()
);
static PREFIX_REGEX: Lazy<Regex> = Lazy::new(||
    Regex::new("^[0-9]+$").unwrap()
);


/// An address together with a prefix length, e.g. `192.168.1.17/24`.
///
/// The address is kept exactly as given; the network address is derived on demand.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CidrBlock {
    address: Address,
    prefix_length: u8,
}
impl CidrBlock {
    /// Creates a CIDR block, checking the prefix length against the address family.
    pub fn new(address: Address, prefix_length: u8) -> Result<CidrBlock> {
        let max = address.family().bit_count();
        if prefix_length > max {
            return Err(CidrError::PrefixOutOfRange {
                prefix: prefix_length.to_string(),
                family: address.family(),
                max,
            });
        }
        Ok(CidrBlock {
            address,
            prefix_length,
        })
    }

    pub(crate) fn from_network<A: IpAddress>(net: &IpNetwork<A>) -> CidrBlock {
        CidrBlock {
            address: net.base_addr().into(),
            prefix_length: net.cidr_prefix(),
        }
    }

    pub fn address(&self) -> Address { self.address }
    pub fn prefix_length(&self) -> u8 { self.prefix_length }
    pub fn family(&self) -> AddressFamily { self.address.family() }

    /// The network as its family-specific arithmetic type.
    pub(crate) fn to_spec(&self) -> NetworkSpec {
        match self.address {
            Address::Ipv4(a) => NetworkSpec::Ipv4(IpNetwork::new_with_prefix(a, self.prefix_length)),
            Address::Ipv6(a) => NetworkSpec::Ipv6(IpNetwork::new_with_prefix(a, self.prefix_length)),
        }
    }

    /// Returns the network address (all host bits zero).
    pub fn network(&self) -> Address {
        match self.to_spec() {
            NetworkSpec::Ipv4(n) => n.base_addr().into(),
            NetworkSpec::Ipv6(n) => n.base_addr().into(),
        }
    }

    /// Returns the last address of the block (all host bits one).
    pub fn last_address(&self) -> Address {
        match self.to_spec() {
            NetworkSpec::Ipv4(n) => n.last_addr().into(),
            NetworkSpec::Ipv6(n) => n.last_addr().into(),
        }
    }

    /// Returns the same block with the host bits of the address cleared.
    pub fn to_network_block(&self) -> CidrBlock {
        CidrBlock {
            address: self.network(),
            prefix_length: self.prefix_length,
        }
    }
}
impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        parse_cidr(s)
    }
}
impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}
impl Serialize for CidrBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}


/// A CIDR block in its family-specific arithmetic form.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum NetworkSpec {
    Ipv4(IpNetwork<Ipv4Address>),
    Ipv6(IpNetwork<Ipv6Address>),
}


/// Parses CIDR notation (`address/prefix`).
pub fn parse_cidr(text: &str) -> Result<CidrBlock> {
    debug!(input = text, "parsing CIDR notation");
    let caps = match CIDR_REGEX.captures(text) {
        Some(c) => c,
        None => {
            debug!(input = text, "CIDR notation needs exactly one slash");
            return Err(CidrError::InvalidCidrFormat {
                input: String::from(text),
                reason: "expected exactly one '/' between address and prefix length",
            });
        },
    };
    let addr_str = caps.name("addr").map(|m| m.as_str()).unwrap_or("");
    let prefix_str = caps.name("prefix").map(|m| m.as_str()).unwrap_or("");

    if !PREFIX_REGEX.is_match(prefix_str) {
        debug!(input = text, prefix = prefix_str, "prefix length is not a number");
        return Err(CidrError::InvalidCidrFormat {
            input: String::from(text),
            reason: "prefix length must be a non-negative integer",
        });
    }

    let address = parse_address(addr_str)?;
    let family = address.family();
    let max = family.bit_count();

    // digits only, so failing to parse means it is too large for any family
    let prefix_length = match prefix_str.parse::<u32>() {
        Ok(p) if p <= u32::from(max) => p as u8,
        _ => {
            debug!(input = text, prefix = prefix_str, %family, "prefix length out of range");
            return Err(CidrError::PrefixOutOfRange {
                prefix: String::from(prefix_str),
                family,
                max,
            });
        },
    };

    Ok(CidrBlock {
        address,
        prefix_length,
    })
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn kind_of(text: &str) -> ErrorKind {
        parse_cidr(text).unwrap_err().kind()
    }

    #[test]
    fn test_parse_cidr() {
        let block = parse_cidr("192.168.1.0/24").unwrap();
        assert_eq!("192.168.1.0".parse::<Address>().unwrap(), block.address());
        assert_eq!(24, block.prefix_length());
        assert_eq!(AddressFamily::Ipv4, block.family());

        let block = parse_cidr("192.168.1.77/24").unwrap();
        assert_eq!("192.168.1.77/24", block.to_string());
        assert_eq!("192.168.1.0/24", block.to_network_block().to_string());
        assert_eq!("192.168.1.255", block.last_address().to_string());

        let block = parse_cidr("2001:db8::1/48").unwrap();
        assert_eq!(AddressFamily::Ipv6, block.family());
        assert_eq!("2001:db8::", block.network().to_string());
        assert_eq!("2001:db8:0:ffff:ffff:ffff:ffff:ffff", block.last_address().to_string());

        assert_eq!(0, parse_cidr("0.0.0.0/0").unwrap().prefix_length());
        assert_eq!(32, parse_cidr("1.2.3.4/32").unwrap().prefix_length());
        assert_eq!(128, parse_cidr("::1/128").unwrap().prefix_length());
        assert_eq!(8, parse_cidr("10.0.0.0/008").unwrap().prefix_length());
    }

    #[test]
    fn test_parse_cidr_failures() {
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0/24/8"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0/"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0/-1"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0/+8"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of("192.168.1.0/ 8"));
        assert_eq!(ErrorKind::InvalidCidrFormat, kind_of(""));
        assert_eq!(ErrorKind::InvalidAddressFormat, kind_of("/24"));
        assert_eq!(ErrorKind::InvalidAddressFormat, kind_of("256.0.0.0/24"));
        assert_eq!(ErrorKind::InvalidAddressFormat, kind_of("2001:db8:::1/64"));
        assert_eq!(ErrorKind::PrefixOutOfRange, kind_of("192.168.1.0/33"));
        assert_eq!(ErrorKind::PrefixOutOfRange, kind_of("::/129"));
        assert_eq!(ErrorKind::PrefixOutOfRange, kind_of("10.0.0.0/99999999999999999999"));

        assert_eq!(
            Err(CidrError::PrefixOutOfRange { prefix: String::from("33"), family: AddressFamily::Ipv4, max: 32 }),
            parse_cidr("192.168.1.0/33"),
        );
    }

    #[test]
    fn test_new() {
        let addr: Address = "10.0.0.0".parse().unwrap();
        assert!(CidrBlock::new(addr, 32).is_ok());
        assert_eq!(ErrorKind::PrefixOutOfRange, CidrBlock::new(addr, 33).unwrap_err().kind());

        let addr: Address = "fe80::".parse().unwrap();
        assert!(CidrBlock::new(addr, 128).is_ok());
        assert_eq!(ErrorKind::PrefixOutOfRange, CidrBlock::new(addr, 129).unwrap_err().kind());
    }

    #[test]
    fn test_round_trip() {
        for text in &["192.168.1.0/24", "10.1.2.3/8", "0.0.0.0/0", "2001:db8::1/64", "::/0", "::ffff:1.2.3.4/120"] {
            let once = parse_cidr(text).unwrap();
            let twice = parse_cidr(&once.to_string()).unwrap();
            assert_eq!(once, twice);
        }
    }
}

//! Well-known address ranges and the legacy classful scheme.

use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

use crate::addr::{Address, Ipv4Address, Ipv6Address};
use crate::net::IpNetwork;


fn v4_ranges(specs: &[(u32, u8)]) -> Vec<IpNetwork<Ipv4Address>> {
    specs.iter()
        .map(|(base, prefix)| IpNetwork::new_with_prefix(Ipv4Address::new(*base), *prefix))
        .collect()
}

fn v6_ranges(specs: &[(u128, u8)]) -> Vec<IpNetwork<Ipv6Address>> {
    specs.iter()
        .map(|(base, prefix)| IpNetwork::new_with_prefix(Ipv6Address::new(*base), *prefix))
        .collect()
}

// RFC 1918
pub(crate) static IPV4_PRIVATE: Lazy<Vec<IpNetwork<Ipv4Address>>> = Lazy::new(|| v4_ranges(&[
    (0x0A00_0000, 8),
    (0xAC10_0000, 12),
    (0xC0A8_0000, 16),
]));
static IPV4_LOOPBACK: Lazy<Vec<IpNetwork<Ipv4Address>>> = Lazy::new(|| v4_ranges(&[(0x7F00_0000, 8)]));
static IPV4_LINK_LOCAL: Lazy<Vec<IpNetwork<Ipv4Address>>> = Lazy::new(|| v4_ranges(&[(0xA9FE_0000, 16)]));
static IPV4_MULTICAST: Lazy<Vec<IpNetwork<Ipv4Address>>> = Lazy::new(|| v4_ranges(&[(0xE000_0000, 4)]));

// unique local addresses
static IPV6_PRIVATE: Lazy<Vec<IpNetwork<Ipv6Address>>> = Lazy::new(|| v6_ranges(&[
    (0xFC00_0000_0000_0000_0000_0000_0000_0000, 7),
]));
static IPV6_LOOPBACK: Lazy<Vec<IpNetwork<Ipv6Address>>> = Lazy::new(|| v6_ranges(&[(1, 128)]));
static IPV6_LINK_LOCAL: Lazy<Vec<IpNetwork<Ipv6Address>>> = Lazy::new(|| v6_ranges(&[
    (0xFE80_0000_0000_0000_0000_0000_0000_0000, 10),
]));
static IPV6_MULTICAST: Lazy<Vec<IpNetwork<Ipv6Address>>> = Lazy::new(|| v6_ranges(&[
    (0xFF00_0000_0000_0000_0000_0000_0000_0000, 8),
]));


/// The pre-CIDR network class of an address.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum NetworkClass {
    A,
    B,
    C,
    /// 224-239: multicast
    D,
    /// 240-255: reserved
    E,
    /// 127.0.0.0/8, historically part of class A
    Loopback,
    /// 0.0.0.0/8, historically part of class A
    Reserved,
    #[serde(rename = "IPv6")]
    Ipv6,
}
impl NetworkClass {
    /// A longer human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            NetworkClass::A => "Class A",
            NetworkClass::B => "Class B",
            NetworkClass::C => "Class C",
            NetworkClass::D => "Class D (multicast)",
            NetworkClass::E => "Class E (reserved)",
            NetworkClass::Loopback => "Loopback",
            NetworkClass::Reserved => "Reserved (this network)",
            NetworkClass::Ipv6 => "IPv6 (classless)",
        }
    }
}
impl fmt::Display for NetworkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NetworkClass::A => "A",
            NetworkClass::B => "B",
            NetworkClass::C => "C",
            NetworkClass::D => "D",
            NetworkClass::E => "E",
            NetworkClass::Loopback => "Loopback",
            NetworkClass::Reserved => "Reserved",
            NetworkClass::Ipv6 => "IPv6",
        };
        write!(f, "{}", text)
    }
}


/// The traits of an address derived from the well-known ranges it falls into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub is_private: bool,
    pub is_loopback: bool,
    pub is_multicast: bool,
    pub is_link_local: bool,
    pub network_class: NetworkClass,
}


/// Returns the legacy class of an address, decided by its first octet.
pub fn network_class(address: &Address) -> NetworkClass {
    let first_octet = match address {
        Address::Ipv4(a) => a.octets()[0],
        Address::Ipv6(_) => return NetworkClass::Ipv6,
    };
    match first_octet {
        0 => NetworkClass::Reserved,
        1..=126 => NetworkClass::A,
        127 => NetworkClass::Loopback,
        128..=191 => NetworkClass::B,
        192..=223 => NetworkClass::C,
        224..=239 => NetworkClass::D,
        240..=255 => NetworkClass::E,
    }
}

/// Classifies an address against the private, loopback, multicast and link-local ranges of its
/// family.
///
/// Documentation ranges such as `2001:db8::/32` or `192.0.2.0/24` are none of these.
pub fn classify(address: &Address) -> Classification {
    debug!(%address, family = %address.family(), "classifying address");
    let network_class = network_class(address);
    match address {
        Address::Ipv4(a) => {
            let any = |ranges: &[IpNetwork<Ipv4Address>]| ranges.iter().any(|r| r.contains(a));
            Classification {
                is_private: any(IPV4_PRIVATE.as_slice()),
                is_loopback: any(IPV4_LOOPBACK.as_slice()),
                is_multicast: any(IPV4_MULTICAST.as_slice()),
                is_link_local: any(IPV4_LINK_LOCAL.as_slice()),
                network_class,
            }
        },
        Address::Ipv6(a) => {
            let any = |ranges: &[IpNetwork<Ipv6Address>]| ranges.iter().any(|r| r.contains(a));
            Classification {
                is_private: any(IPV6_PRIVATE.as_slice()),
                is_loopback: any(IPV6_LOOPBACK.as_slice()),
                is_multicast: any(IPV6_MULTICAST.as_slice()),
                is_link_local: any(IPV6_LINK_LOCAL.as_slice()),
                network_class,
            }
        },
    }
}

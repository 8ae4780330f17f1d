use std::fmt;

use num_bigint::BigUint;

use crate::addr::{AddressFamily, IpAddress};
use crate::bit_manip::prefix_mask_bits;
use crate::options::UsableHostConvention;


/// An IP network: a base address and a CIDR prefix length.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IpNetwork<A: IpAddress> {
    base_addr: A,
    subnet_mask: A,
    cidr_prefix: u8,
}

impl<A: IpAddress> IpNetwork<A> {
    /// Creates the network of the given prefix length that contains `addr`. Prefix lengths beyond
    /// the width of the address are treated as the full width.
    pub fn new_with_prefix(
        addr: A,
        cidr_prefix: u8,
    ) -> IpNetwork<A> {
        let cidr_prefix = cidr_prefix.min(A::BIT_COUNT);
        let subnet_mask = A::from_bits(prefix_mask_bits(cidr_prefix, A::BIT_COUNT))
            .expect("prefix mask fits into the address width");

        // calculate base address by ANDing address with subnet mask
        let base_addr = addr & subnet_mask;

        IpNetwork {
            base_addr,
            subnet_mask,
            cidr_prefix,
        }
    }

    pub fn base_addr(&self) -> A { self.base_addr }
    pub fn subnet_mask(&self) -> A { self.subnet_mask }
    pub fn cidr_prefix(&self) -> u8 { self.cidr_prefix }

    /// The bitwise complement of the subnet mask.
    pub fn cisco_wildcard(&self) -> A {
        self.subnet_mask.bitwise_negate()
    }

    /// The number of bits not covered by the prefix.
    pub fn host_bit_count(&self) -> u8 {
        A::BIT_COUNT - self.cidr_prefix
    }

    /// The number of addresses in this network, `2^(bits - prefix)`.
    pub fn address_count(&self) -> BigUint {
        BigUint::from(1u8) << usize::from(self.host_bit_count())
    }

    /// The number of addresses that can be assigned to hosts.
    ///
    /// IPv6 has no broadcast address and reserves nothing; IPv4 reserves the network and broadcast
    /// addresses, except that /31 and /32 follow the given convention.
    pub fn usable_host_count(&self, convention: UsableHostConvention) -> BigUint {
        let address_count = self.address_count();
        if A::FAMILY == AddressFamily::Ipv6 || self.host_bit_count() >= 2 {
            return match A::FAMILY {
                AddressFamily::Ipv6 => address_count,
                AddressFamily::Ipv4 => address_count - 2u8,
            };
        }

        match convention {
            // /31: both addresses, /32: the single address
            UsableHostConvention::PointToPoint => address_count,
            UsableHostConvention::Classic => BigUint::from(0u8),
        }
    }

    /// The highest address within the network (all host bits set).
    pub fn last_addr(&self) -> A {
        self.base_addr | self.cisco_wildcard()
    }

    /// The broadcast address. IPv6 has none; the network address is returned in its place.
    pub fn broadcast_addr(&self) -> A {
        match A::FAMILY {
            AddressFamily::Ipv4 => self.last_addr(),
            AddressFamily::Ipv6 => self.base_addr,
        }
    }

    /// The lowest address that can be assigned to a host. Equals the network address if no
    /// address is reserved or no host is usable at all; the usable-host conventions agree on it.
    pub fn first_host_addr(&self) -> A {
        if A::FAMILY == AddressFamily::Ipv4 && self.host_bit_count() >= 2 {
            self.base_addr.add_offset(1)
                .expect("network with host bits has a successor")
        } else {
            self.base_addr
        }
    }

    /// The highest address that can be assigned to a host. Equals the network address if no host
    /// is usable at all.
    pub fn last_host_addr(&self, convention: UsableHostConvention) -> A {
        match A::FAMILY {
            AddressFamily::Ipv6 => self.last_addr(),
            AddressFamily::Ipv4 if self.host_bit_count() >= 2 => {
                self.last_addr().subtract_offset(1)
                    .expect("network with host bits has a predecessor")
            },
            AddressFamily::Ipv4 => match convention {
                UsableHostConvention::PointToPoint => self.last_addr(),
                UsableHostConvention::Classic => self.base_addr,
            },
        }
    }

    /// The base address of the equally-sized network directly after this one. Returns `None` at
    /// the end of the address space.
    pub fn next_subnet_base_addr(&self) -> Option<A> {
        self.last_addr().add_offset(1)
    }

    pub fn contains(&self, addr: &A) -> bool {
        (*addr & self.subnet_mask) == self.base_addr
    }

    pub fn is_superset_of(&self, other: &IpNetwork<A>) -> bool {
        self.cidr_prefix <= other.cidr_prefix && self.contains(&other.base_addr)
    }

    pub fn is_subset_of(&self, other: &IpNetwork<A>) -> bool {
        other.is_superset_of(self)
    }

    pub fn intersects(&self, other: &IpNetwork<A>) -> bool {
        // thisFirst <= otherLast && otherFirst <= thisLast
        self.base_addr <= other.last_addr() && other.base_addr <= self.last_addr()
    }
}
impl<A: IpAddress> fmt::Display for IpNetwork<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_addr, self.cidr_prefix)
    }
}

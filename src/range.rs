use std::cmp::{max, min};
use std::iter::{FusedIterator, Iterator};

use tracing::{debug, trace};

use crate::addr::{Address, AddressFamily, IpAddress, Ipv4Address, Ipv6Address};
use crate::cidr::{CidrBlock, NetworkSpec};
use crate::error::{CidrError, Result};
use crate::net::IpNetwork;
use crate::options::EnumerateOptions;


fn mixed_families(left: AddressFamily, right: AddressFamily) -> CidrError {
    debug!(%left, %right, "operands of different families");
    CidrError::UnsupportedFamilyCombination { left, right }
}


/// Returns whether the address falls within the block. Addresses of the other family are never
/// members.
pub fn is_member(address: &Address, block: &CidrBlock) -> bool {
    debug!(%address, %block, "checking membership");
    match (block.to_spec(), address) {
        (NetworkSpec::Ipv4(net), Address::Ipv4(a)) => net.contains(a),
        (NetworkSpec::Ipv6(net), Address::Ipv6(a)) => net.contains(a),
        _ => false,
    }
}

/// Returns whether two blocks share at least one address, failing if they are of different
/// families.
pub fn try_ranges_overlap(one: &CidrBlock, other: &CidrBlock) -> Result<bool> {
    debug!(%one, %other, "checking overlap");
    match (one.to_spec(), other.to_spec()) {
        (NetworkSpec::Ipv4(a), NetworkSpec::Ipv4(b)) => Ok(a.intersects(&b)),
        (NetworkSpec::Ipv6(a), NetworkSpec::Ipv6(b)) => Ok(a.intersects(&b)),
        _ => Err(mixed_families(one.family(), other.family())),
    }
}

/// Returns whether two blocks share at least one address. Blocks of different families never
/// overlap.
pub fn ranges_overlap(one: &CidrBlock, other: &CidrBlock) -> bool {
    try_ranges_overlap(one, other).unwrap_or(false)
}

/// Returns the address after `current` if it still lies within the block, or `None` once the end
/// of the block has been reached.
pub fn next_in_range(block: &CidrBlock, current: &Address) -> Result<Option<Address>> {
    debug!(%block, %current, "looking up next address");
    let next = match (block.to_spec(), current) {
        (NetworkSpec::Ipv4(net), Address::Ipv4(a)) => next_in_network(&net, a).map(Address::from),
        (NetworkSpec::Ipv6(net), Address::Ipv6(a)) => next_in_network(&net, a).map(Address::from),
        _ => return Err(mixed_families(block.family(), current.family())),
    };
    trace!(%block, %current, next = ?next, "next address in range");
    Ok(next)
}

fn next_in_network<A: IpAddress>(net: &IpNetwork<A>, current: &A) -> Option<A> {
    current.add_offset(1)
        .filter(|n| net.contains(n))
}


/// Lazily walks the addresses of a network in ascending order.
#[derive(Clone, Debug)]
struct NetworkIter<A: IpAddress> {
    next_addr: Option<A>,
    last_addr: A,
    remaining: usize,
}
impl<A: IpAddress> NetworkIter<A> {
    pub fn new(network: IpNetwork<A>, max_count: usize) -> Self {
        Self {
            next_addr: Some(network.base_addr()),
            last_addr: network.last_addr(),
            remaining: max_count,
        }
    }
}
impl<A: IpAddress> Iterator for NetworkIter<A> {
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next_addr?;

        self.remaining -= 1;
        self.next_addr = if current < self.last_addr {
            current.add_offset(1)
        } else {
            None
        };

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let in_network = match self.next_addr {
            None => 0,
            Some(next) => {
                // saturating stays exact: `remaining` is a usize and bounds the count
                (self.last_addr.to_bits() - next.to_bits())
                    .checked_add(1)
                    .and_then(|n| usize::try_from(n).ok())
                    .unwrap_or(usize::MAX)
            },
        };
        let count = min(in_network, self.remaining);
        (count, Some(count))
    }
}


#[derive(Clone, Debug)]
enum FamilyIter {
    Ipv4(NetworkIter<Ipv4Address>),
    Ipv6(NetworkIter<Ipv6Address>),
}

/// Iterator over the addresses of an [`Enumeration`].
#[derive(Clone, Debug)]
pub struct AddressIter {
    inner: FamilyIter,
}
impl Iterator for AddressIter {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            FamilyIter::Ipv4(i) => i.next().map(Address::from),
            FamilyIter::Ipv6(i) => i.next().map(Address::from),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            FamilyIter::Ipv4(i) => i.size_hint(),
            FamilyIter::Ipv6(i) => i.size_hint(),
        }
    }
}
impl ExactSizeIterator for AddressIter {}
impl FusedIterator for AddressIter {}


/// A bounded, restartable sequence of the addresses in a block, from the network address to the
/// last address. Addresses are produced on demand; each call to [`Enumeration::iter`] starts over.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Enumeration {
    block: CidrBlock,
    max_count: usize,
}
impl Enumeration {
    pub fn block(&self) -> CidrBlock { self.block }
    pub fn max_count(&self) -> usize { self.max_count }

    pub fn iter(&self) -> AddressIter {
        trace!(block = %self.block, max_count = self.max_count, "starting enumeration");
        let inner = match self.block.to_spec() {
            NetworkSpec::Ipv4(net) => FamilyIter::Ipv4(NetworkIter::new(net, self.max_count)),
            NetworkSpec::Ipv6(net) => FamilyIter::Ipv6(NetworkIter::new(net, self.max_count)),
        };
        AddressIter { inner }
    }
}
impl IntoIterator for Enumeration {
    type Item = Address;
    type IntoIter = AddressIter;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
impl<'a> IntoIterator for &'a Enumeration {
    type Item = Address;
    type IntoIter = AddressIter;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Enumerates at most `max_count` addresses of the block in ascending order.
pub fn enumerate(block: &CidrBlock, max_count: usize) -> Enumeration {
    debug!(%block, max_count, "enumerating addresses");
    Enumeration {
        block: *block,
        max_count,
    }
}

/// Enumerates the addresses of the block, bounded by the options.
pub fn enumerate_with(block: &CidrBlock, options: &EnumerateOptions) -> Enumeration {
    enumerate(block, options.max_count)
}


/// Converts a range of IP addresses (whose inclusive ends are passed as `end_one` and `end_two`)
/// into the smallest equivalent list of IP networks, in ascending order.
pub(crate) fn range_to_subnets<A: IpAddress>(
    end_one: A,
    end_two: A,
) -> Vec<IpNetwork<A>> {
    let mut ret = Vec::new();

    let mut first_addr = min(end_one, end_two);
    let last_addr = max(end_one, end_two);

    loop {
        // start with the full mask and enlarge while the network stays anchored and in range
        let mut current_subnet = IpNetwork::new_with_prefix(first_addr, A::BIT_COUNT);
        while current_subnet.cidr_prefix() > 0 {
            let larger_subnet = IpNetwork::new_with_prefix(first_addr, current_subnet.cidr_prefix() - 1);
            if larger_subnet.base_addr() != first_addr || larger_subnet.last_addr() > last_addr {
                break;
            }
            current_subnet = larger_subnet;
        }

        trace!(subnet = %current_subnet, "range chunk");
        ret.push(current_subnet);
        match current_subnet.next_subnet_base_addr() {
            Some(next) if next <= last_addr => first_addr = next,
            _ => break,
        }
    }

    ret
}

/// Converts an inclusive range of addresses into the smallest list of CIDR blocks covering exactly
/// that range. The ends may be given in either order.
pub fn range_to_cidrs(end_one: &Address, end_two: &Address) -> Result<Vec<CidrBlock>> {
    debug!(%end_one, %end_two, "converting range to CIDR blocks");
    let blocks = match (end_one, end_two) {
        (Address::Ipv4(one), Address::Ipv4(two)) => range_to_subnets(*one, *two).iter()
            .map(CidrBlock::from_network)
            .collect(),
        (Address::Ipv6(one), Address::Ipv6(two)) => range_to_subnets(*one, *two).iter()
            .map(CidrBlock::from_network)
            .collect(),
        _ => return Err(mixed_families(end_one.family(), end_two.family())),
    };
    Ok(blocks)
}

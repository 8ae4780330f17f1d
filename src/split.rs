use num_bigint::BigUint;
use serde::Serialize;
use tracing::{debug, trace};

use crate::addr::{Address, IpAddress};
use crate::analysis::serialize_count;
use crate::cidr::{CidrBlock, NetworkSpec};
use crate::error::{CidrError, Result};
use crate::net::IpNetwork;
use crate::options::{AnalysisOptions, UsableHostConvention};
use crate::range::range_to_subnets;


/// One of the subnets produced by [`partition`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetDescriptor {
    pub network: Address,
    pub prefix_length: u8,
    pub broadcast: Address,
    pub last_address: Address,
    pub first_usable: Address,
    pub last_usable: Address,
    #[serde(serialize_with = "serialize_count")]
    pub usable_host_count: BigUint,
}
impl SubnetDescriptor {
    fn from_network<A: IpAddress>(net: &IpNetwork<A>, convention: UsableHostConvention) -> SubnetDescriptor {
        SubnetDescriptor {
            network: net.base_addr().into(),
            prefix_length: net.cidr_prefix(),
            broadcast: net.broadcast_addr().into(),
            last_address: net.last_addr().into(),
            first_usable: net.first_host_addr().into(),
            last_usable: net.last_host_addr(convention).into(),
            usable_host_count: net.usable_host_count(convention),
        }
    }

    /// The subnet in CIDR notation.
    pub fn to_cidr(&self) -> CidrBlock {
        // both values stem from a valid network
        CidrBlock::new(self.network, self.prefix_length)
            .expect("subnet prefix is valid for its family")
    }
}


/// The result of splitting a network into equally sized subnets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetPlan {
    pub source_block: CidrBlock,
    pub requested_count: usize,
    pub new_prefix: u8,

    /// Contiguous and in ascending order, starting at the network address of the source block.
    pub subnets: Vec<SubnetDescriptor>,

    /// The rest of the source block not covered by `subnets`; empty if the requested count is a
    /// power of two.
    pub unallocated: Vec<CidrBlock>,
}


/// The largest number of subnets a single [`SubnetPlan`] may contain.
pub const MAX_SUBNET_COUNT: usize = 1 << 16;


/// The number of prefix bits that must be borrowed to obtain at least `count` subnets.
fn borrowed_bits(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

/// Splits a network into `count` equally sized subnets, using the default options.
pub fn partition(block: &CidrBlock, count: usize) -> Result<SubnetPlan> {
    partition_with(block, count, &AnalysisOptions::default())
}

/// Splits a network into `count` equally sized subnets.
///
/// The subnets are as large as possible, i.e. the prefix length grows by `ceil(log2(count))`.
/// Counts above [`MAX_SUBNET_COUNT`] fail with [`CidrError::SubnetCountTooLarge`].
pub fn partition_with(block: &CidrBlock, count: usize, options: &AnalysisOptions) -> Result<SubnetPlan> {
    debug!(%block, count, "partitioning network");
    if count < 1 {
        debug!(count, "invalid subnet count");
        return Err(CidrError::InvalidSubnetCount { count });
    }
    if count > MAX_SUBNET_COUNT {
        debug!(count, max = MAX_SUBNET_COUNT, "subnet count too large");
        return Err(CidrError::SubnetCountTooLarge { count, max: MAX_SUBNET_COUNT });
    }

    let max = block.family().bit_count();
    let required_prefix = u32::from(block.prefix_length()) + borrowed_bits(count);
    if required_prefix > u32::from(max) {
        debug!(%block, count, required_prefix, "not enough host bits for split");
        return Err(CidrError::SubnetCountExceedsAddressSpace {
            count,
            prefix: block.prefix_length(),
            required_prefix,
            max,
        });
    }
    let new_prefix = required_prefix as u8;

    let (subnets, unallocated) = match block.to_spec() {
        NetworkSpec::Ipv4(net) => split_network(net, count, new_prefix, options.usable_hosts)?,
        NetworkSpec::Ipv6(net) => split_network(net, count, new_prefix, options.usable_hosts)?,
    };

    Ok(SubnetPlan {
        source_block: *block,
        requested_count: count,
        new_prefix,
        subnets,
        unallocated,
    })
}

fn split_network<A: IpAddress>(
    parent: IpNetwork<A>,
    count: usize,
    new_prefix: u8,
    convention: UsableHostConvention,
) -> Result<(Vec<SubnetDescriptor>, Vec<CidrBlock>)> {
    let exceeded = || CidrError::SubnetCountExceedsAddressSpace {
        count,
        prefix: parent.cidr_prefix(),
        required_prefix: u32::from(new_prefix),
        max: A::BIT_COUNT,
    };

    let mut subnets = Vec::with_capacity(count);
    let mut current_net = IpNetwork::new_with_prefix(parent.base_addr(), new_prefix);
    loop {
        if !parent.is_superset_of(&current_net) {
            return Err(exceeded());
        }
        trace!(subnet = %current_net, "allocated subnet");
        subnets.push(SubnetDescriptor::from_network(&current_net, convention));
        if subnets.len() == count {
            break;
        }

        let next_base_addr = current_net.next_subnet_base_addr()
            .ok_or_else(exceeded)?;
        current_net = IpNetwork::new_with_prefix(next_base_addr, new_prefix);
    }

    let mut unallocated = Vec::new();
    if current_net.last_addr() < parent.last_addr() {
        if let Some(next_unused_address) = current_net.last_addr().add_offset(1) {
            unallocated = range_to_subnets(next_unused_address, parent.last_addr()).iter()
                .map(CidrBlock::from_network)
                .collect();
        }
    }

    Ok((subnets, unallocated))
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::cidr::parse_cidr;
    use crate::error::ErrorKind;

    fn cidr(s: &str) -> CidrBlock {
        parse_cidr(s).unwrap()
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_borrowed_bits() {
        assert_eq!(0, borrowed_bits(1));
        assert_eq!(1, borrowed_bits(2));
        assert_eq!(2, borrowed_bits(3));
        assert_eq!(2, borrowed_bits(4));
        assert_eq!(3, borrowed_bits(5));
        assert_eq!(10, borrowed_bits(1024));
        assert_eq!(11, borrowed_bits(1025));
        assert_eq!(usize::BITS, borrowed_bits(usize::MAX));
    }

    #[test]
    fn test_split_into_four() {
        let plan = partition(&cidr("192.168.1.0/24"), 4).unwrap();
        assert_eq!(26, plan.new_prefix);
        assert_eq!(4, plan.subnets.len());
        assert!(plan.unallocated.is_empty());

        let first = &plan.subnets[0];
        assert_eq!(addr("192.168.1.0"), first.network);
        assert_eq!(addr("192.168.1.63"), first.broadcast);
        assert_eq!(addr("192.168.1.1"), first.first_usable);
        assert_eq!(addr("192.168.1.62"), first.last_usable);
        assert_eq!(BigUint::from(62u32), first.usable_host_count);
        assert_eq!("192.168.1.0/26", first.to_cidr().to_string());

        let networks: Vec<String> = plan.subnets.iter().map(|s| s.network.to_string()).collect();
        assert_eq!(vec!["192.168.1.0", "192.168.1.64", "192.168.1.128", "192.168.1.192"], networks);
        assert_eq!(addr("192.168.1.255"), plan.subnets[3].broadcast);
    }

    #[test]
    fn test_split_uneven() {
        let plan = partition(&cidr("10.0.0.77/24"), 3).unwrap();
        assert_eq!(26, plan.new_prefix);
        assert_eq!(3, plan.subnets.len());
        assert_eq!(addr("10.0.0.128"), plan.subnets[2].network);
        assert_eq!(vec![cidr("10.0.0.192/26")], plan.unallocated);

        let plan = partition(&cidr("10.0.0.0/24"), 5).unwrap();
        assert_eq!(27, plan.new_prefix);
        assert_eq!(vec![cidr("10.0.0.160/27"), cidr("10.0.0.192/26")], plan.unallocated);
    }

    #[test]
    fn test_split_edges() {
        let plan = partition(&cidr("192.0.2.0/24"), 1).unwrap();
        assert_eq!(24, plan.new_prefix);
        assert_eq!(1, plan.subnets.len());
        assert_eq!(addr("192.0.2.255"), plan.subnets[0].broadcast);

        let plan = partition(&cidr("192.0.2.0/30"), 4).unwrap();
        assert_eq!(32, plan.new_prefix);
        assert_eq!(addr("192.0.2.3"), plan.subnets[3].network);
        assert_eq!(BigUint::from(1u32), plan.subnets[3].usable_host_count);

        let plan = partition(&cidr("0.0.0.0/0"), 2).unwrap();
        assert_eq!(addr("128.0.0.0"), plan.subnets[1].network);
        assert_eq!(addr("255.255.255.255"), plan.subnets[1].broadcast);

        let plan = partition(&cidr("2001:db8::/32"), 256).unwrap();
        assert_eq!(40, plan.new_prefix);
        assert_eq!(addr("2001:db8:ff00::"), plan.subnets[255].network);
        assert_eq!(addr("2001:db8:ff00::"), plan.subnets[255].broadcast);
        assert_eq!(addr("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"), plan.subnets[255].last_address);
        assert_eq!(BigUint::from(1u128 << 88), plan.subnets[0].usable_host_count);

        let classic = AnalysisOptions { usable_hosts: UsableHostConvention::Classic };
        let plan = partition_with(&cidr("192.0.2.0/30"), 2, &classic).unwrap();
        assert_eq!(BigUint::from(0u32), plan.subnets[0].usable_host_count);
    }

    #[test]
    fn test_split_failures() {
        assert_eq!(ErrorKind::InvalidSubnetCount, partition(&cidr("10.0.0.0/8"), 0).unwrap_err().kind());
        assert_eq!(
            Err(CidrError::SubnetCountExceedsAddressSpace { count: 3, prefix: 31, required_prefix: 33, max: 32 }),
            partition(&cidr("192.0.2.0/31"), 3),
        );
        assert_eq!(
            ErrorKind::SubnetCountExceedsAddressSpace,
            partition(&cidr("::1/128"), 2).unwrap_err().kind(),
        );
    }

    #[test]
    fn test_split_huge_counts() {
        assert_eq!(
            Err(CidrError::SubnetCountTooLarge { count: usize::MAX, max: MAX_SUBNET_COUNT }),
            partition(&cidr("::/0"), usize::MAX),
        );
        assert_eq!(
            ErrorKind::SubnetCountTooLarge,
            partition(&cidr("10.0.0.0/8"), 16_777_216).unwrap_err().kind(),
        );

        let plan = partition(&cidr("10.0.0.0/8"), MAX_SUBNET_COUNT).unwrap();
        assert_eq!(24, plan.new_prefix);
        assert_eq!(MAX_SUBNET_COUNT, plan.subnets.len());
        assert_eq!(addr("10.255.255.0"), plan.subnets[MAX_SUBNET_COUNT - 1].network);
    }

    #[test]
    fn test_serialize() {
        let plan = partition(&cidr("192.168.1.0/24"), 2).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!("192.168.1.0/24", json["sourceBlock"]);
        assert_eq!(2, json["requestedCount"]);
        assert_eq!(25, json["newPrefix"]);
        assert_eq!("192.168.1.128", json["subnets"][1]["network"]);
        assert_eq!("126", json["subnets"][1]["usableHostCount"]);
        assert_eq!(0, json["unallocated"].as_array().unwrap().len());
    }
}

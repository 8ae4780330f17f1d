use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::addr::{Address, AddressFamily, IpAddress};
use crate::cidr::{parse_cidr, CidrBlock, NetworkSpec};
use crate::classify::{classify, Classification};
use crate::error::Result;
use crate::net::IpNetwork;
use crate::options::AnalysisOptions;


/// Serializes an arbitrary-precision count as a decimal string.
pub(crate) fn serialize_count<S: Serializer>(count: &BigUint, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(count)
}


/// Everything derived from a single CIDR block.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysis {
    /// The block as it was given.
    pub block: CidrBlock,
    pub family: AddressFamily,
    pub prefix_length: u8,
    pub network: Address,

    /// For IPv6, which has no broadcast address, this equals `network`.
    pub broadcast: Address,

    /// The highest address of the block, for either family.
    pub last_address: Address,

    /// Dotted quad for IPv4, `/prefix` for IPv6.
    pub subnet_mask: String,

    /// Dotted quad for IPv4, `/(128 - prefix)` for IPv6.
    pub wildcard_mask: String,

    #[serde(serialize_with = "serialize_count")]
    pub total_hosts: BigUint,
    #[serde(serialize_with = "serialize_count")]
    pub usable_hosts: BigUint,

    pub first_usable: Address,
    pub last_usable: Address,

    #[serde(flatten)]
    pub classification: Classification,
}
impl NetworkAnalysis {
    /// The network address with the block's prefix length.
    pub fn network_as_cidr(&self) -> CidrBlock {
        self.block.to_network_block()
    }
}

fn analyze_network<A: IpAddress>(
    block: &CidrBlock,
    net: IpNetwork<A>,
    options: &AnalysisOptions,
) -> NetworkAnalysis {
    let (subnet_mask, wildcard_mask) = match A::FAMILY {
        AddressFamily::Ipv4 => (net.subnet_mask().to_string(), net.cisco_wildcard().to_string()),
        AddressFamily::Ipv6 => (format!("/{}", net.cidr_prefix()), format!("/{}", net.host_bit_count())),
    };

    NetworkAnalysis {
        block: *block,
        family: A::FAMILY,
        prefix_length: net.cidr_prefix(),
        network: net.base_addr().into(),
        broadcast: net.broadcast_addr().into(),
        last_address: net.last_addr().into(),
        subnet_mask,
        wildcard_mask,
        total_hosts: net.address_count(),
        usable_hosts: net.usable_host_count(options.usable_hosts),
        first_usable: net.first_host_addr().into(),
        last_usable: net.last_host_addr(options.usable_hosts).into(),
        classification: classify(&block.address()),
    }
}

/// Analyzes a CIDR block with the default options.
pub fn analyze(block: &CidrBlock) -> NetworkAnalysis {
    analyze_with(block, &AnalysisOptions::default())
}

/// Analyzes a CIDR block.
pub fn analyze_with(block: &CidrBlock, options: &AnalysisOptions) -> NetworkAnalysis {
    debug!(%block, ?options, "analyzing network");
    match block.to_spec() {
        NetworkSpec::Ipv4(net) => analyze_network(block, net, options),
        NetworkSpec::Ipv6(net) => analyze_network(block, net, options),
    }
}

/// Parses CIDR notation and analyzes the result with the default options.
pub fn analyze_str(text: &str) -> Result<NetworkAnalysis> {
    let block = parse_cidr(text)?;
    Ok(analyze(&block))
}

//! Proposes a network for a bare address.
//!
//! This is a guess based on common addressing plans, not a discovery of the actual topology; use
//! the exact calculations in [`crate::analysis`] once a prefix length is known.

use tracing::debug;

use crate::addr::{parse_address, Address};
use crate::cidr::CidrBlock;
use crate::classify::IPV4_PRIVATE;
use crate::error::Result;
use crate::net::IpNetwork;
use crate::options::SuggestOptions;


/// Proposes a network containing the address, using the default options.
pub fn suggest(address: &Address) -> CidrBlock {
    suggest_with(address, &SuggestOptions::default())
}

/// Proposes a network containing the address.
///
/// IPv4 addresses within one of the RFC 1918 ranges get that whole range (if enabled); all other
/// addresses get the family's default prefix length.
pub fn suggest_with(address: &Address, options: &SuggestOptions) -> CidrBlock {
    debug!(%address, ?options, "suggesting network");
    let block = match address {
        Address::Ipv4(a) => {
            let private_range = IPV4_PRIVATE.iter()
                .find(|r| options.widen_private_ranges && r.contains(a));
            let net = match private_range {
                Some(range) => *range,
                None => IpNetwork::new_with_prefix(*a, options.ipv4_default_prefix),
            };
            CidrBlock::from_network(&net)
        },
        Address::Ipv6(a) => {
            CidrBlock::from_network(&IpNetwork::new_with_prefix(*a, options.ipv6_default_prefix))
        },
    };
    debug!(%address, suggestion = %block, "suggested network");
    block
}

/// Parses an address and proposes a network for it, using the default options.
pub fn suggest_str(text: &str) -> Result<CidrBlock> {
    let address = parse_address(text)?;
    Ok(suggest(&address))
}

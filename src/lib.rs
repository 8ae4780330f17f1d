//! IPv4 and IPv6 network calculations.
//!
//! Addresses are validated and parsed by [`addr`], CIDR notation by [`cidr`]. A [`CidrBlock`] can
//! then be analyzed ([`analysis`]), split into subnets ([`split`]), enumerated or compared with
//! other blocks ([`range`]). [`suggest`] proposes a network for a bare address.
//!
//! ```
//! let analysis = cidrcalc::analyze_str("192.168.1.0/24").unwrap();
//! assert_eq!("192.168.1.255", analysis.broadcast.to_string());
//! assert_eq!("254", analysis.usable_hosts.to_string());
//! ```

pub mod addr;
pub mod analysis;
pub mod bit_manip;
pub mod cidr;
pub mod classify;
pub mod error;
pub mod net;
pub mod options;
pub mod range;
pub mod split;
pub mod suggest;


pub use crate::addr::{
    parse_address, validate_address, Address, AddressFamily, AddressParseError, AddressValidation,
    IpAddress, Ipv4Address, Ipv6Address,
};
pub use crate::analysis::{analyze, analyze_str, analyze_with, NetworkAnalysis};
pub use crate::cidr::{parse_cidr, CidrBlock};
pub use crate::classify::{classify, network_class, Classification, NetworkClass};
pub use crate::error::{CidrError, ErrorKind, Result};
pub use crate::net::IpNetwork;
pub use crate::options::{AnalysisOptions, EnumerateOptions, SuggestOptions, UsableHostConvention};
pub use crate::range::{
    enumerate, enumerate_with, is_member, next_in_range, range_to_cidrs, ranges_overlap,
    try_ranges_overlap, AddressIter, Enumeration,
};
pub use crate::split::{partition, partition_with, SubnetDescriptor, SubnetPlan, MAX_SUBNET_COUNT};
pub use crate::suggest::{suggest, suggest_str, suggest_with};

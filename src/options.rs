//! Per-operation settings.


/// How many addresses of a very small IPv4 network count as usable hosts.
///
/// Networks with at least two host bits always reserve the network and broadcast addresses. The
/// conventions only disagree about /31 and /32.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum UsableHostConvention {
    /// A /31 is a point-to-point link with two usable addresses (RFC 3021) and a /32 is a host
    /// route with one usable address.
    #[default]
    PointToPoint,

    /// Every network reserves two addresses; /31 and /32 have no usable hosts.
    Classic,
}

/// Settings for the network analysis and the subnet partitioner.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct AnalysisOptions {
    pub usable_hosts: UsableHostConvention,
}

/// Settings for the address-to-network suggester.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SuggestOptions {
    /// Prefix length proposed for IPv4 addresses outside the private ranges. Values above 32 are
    /// treated as 32.
    pub ipv4_default_prefix: u8,

    /// Prefix length proposed for IPv6 addresses. Values above 128 are treated as 128.
    pub ipv6_default_prefix: u8,

    /// Whether addresses within the RFC 1918 ranges are widened to the whole private range.
    pub widen_private_ranges: bool,
}
impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            ipv4_default_prefix: 24,
            ipv6_default_prefix: 64,
            widen_private_ranges: true,
        }
    }
}

/// Settings for address enumeration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EnumerateOptions {
    pub max_count: usize,
}
impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            max_count: 256,
        }
    }
}

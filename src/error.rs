use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::addr::{AddressFamily, AddressParseError};


/// The machine-checkable category of a [`CidrError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
    InvalidAddressFormat,
    InvalidCidrFormat,
    PrefixOutOfRange,
    InvalidSubnetCount,
    SubnetCountTooLarge,
    SubnetCountExceedsAddressSpace,
    UnsupportedFamilyCombination,
}

/// An error returned by one of the network calculations.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CidrError {
    /// The text could not be parsed as an IPv4 or IPv6 address.
    #[error("invalid IP address {input:?}: {reason}")]
    InvalidAddressFormat {
        input: String,
        #[source]
        reason: AddressParseError,
    },

    /// The text is not of the form `address/prefix`.
    #[error("invalid CIDR notation {input:?}: {reason}")]
    InvalidCidrFormat {
        input: String,
        reason: &'static str,
    },

    /// The prefix length is larger than the address family allows. The prefix is kept in its
    /// textual form since it might not even fit into an integer.
    #[error("prefix length {prefix} is out of range for {family} (0 <= n <= {max})")]
    PrefixOutOfRange {
        prefix: String,
        family: AddressFamily,
        max: u8,
    },

    /// A partition was requested into fewer than one subnet.
    #[error("cannot split a network into {count} subnets; at least 1 is required")]
    InvalidSubnetCount {
        count: usize,
    },

    /// A partition was requested into more subnets than a single plan may describe.
    #[error("cannot split a network into {count} subnets; at most {max} are supported")]
    SubnetCountTooLarge {
        count: usize,
        max: usize,
    },

    /// Splitting the network into the requested number of subnets needs more prefix bits than the
    /// address family has.
    #[error("cannot split /{prefix} into {count} subnets: /{required_prefix} exceeds the maximum prefix length /{max}")]
    SubnetCountExceedsAddressSpace {
        count: usize,
        prefix: u8,
        required_prefix: u32,
        max: u8,
    },

    /// An operation received IPv4 and IPv6 operands at the same time.
    #[error("cannot combine an {left} operand with an {right} operand")]
    UnsupportedFamilyCombination {
        left: AddressFamily,
        right: AddressFamily,
    },
}
impl CidrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CidrError::InvalidAddressFormat { .. } => ErrorKind::InvalidAddressFormat,
            CidrError::InvalidCidrFormat { .. } => ErrorKind::InvalidCidrFormat,
            CidrError::PrefixOutOfRange { .. } => ErrorKind::PrefixOutOfRange,
            CidrError::InvalidSubnetCount { .. } => ErrorKind::InvalidSubnetCount,
            CidrError::SubnetCountTooLarge { .. } => ErrorKind::SubnetCountTooLarge,
            CidrError::SubnetCountExceedsAddressSpace { .. } => ErrorKind::SubnetCountExceedsAddressSpace,
            CidrError::UnsupportedFamilyCombination { .. } => ErrorKind::UnsupportedFamilyCombination,
        }
    }
}
impl Serialize for CidrError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CidrError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, CidrError>;


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind_and_message() {
        let err = CidrError::PrefixOutOfRange {
            prefix: String::from("33"),
            family: AddressFamily::Ipv4,
            max: 32,
        };
        assert_eq!(ErrorKind::PrefixOutOfRange, err.kind());
        assert_eq!("prefix length 33 is out of range for IPv4 (0 <= n <= 32)", err.to_string());

        let err = CidrError::UnsupportedFamilyCombination {
            left: AddressFamily::Ipv4,
            right: AddressFamily::Ipv6,
        };
        assert_eq!(ErrorKind::UnsupportedFamilyCombination, err.kind());
        assert_eq!("cannot combine an IPv4 operand with an IPv6 operand", err.to_string());
    }

    #[test]
    fn test_serialize() {
        let err = CidrError::InvalidSubnetCount { count: 0 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!("InvalidSubnetCount", json["kind"]);
        assert_eq!("cannot split a network into 0 subnets; at least 1 is required", json["message"]);
    }
}

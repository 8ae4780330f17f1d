use std::convert::TryFrom;
use std::fmt;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::bit_manip::bytes_to_binary;
use crate::error::{CidrError, Result};


/// The family (version) of an IP address.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum AddressFamily {
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
}
impl AddressFamily {
    /// Returns the number of bits in an address of this family.
    pub fn bit_count(&self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }
}
impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}


/// This trait is to be implemented by structures that represent an IP address.
///
/// All arithmetic goes through the unsigned 128-bit representation returned by `to_bits`, which
/// is wide enough for both families and never wraps silently.
pub trait IpAddress:
    BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self>
    + Copy + fmt::Display + FromStr<Err = AddressParseError> + Hash + Into<Address> + Ord + Sized
{
    /// The number of bits in an address of this type.
    const BIT_COUNT: u8;

    /// The family of this address type.
    const FAMILY: AddressFamily;

    /// Returns the numeric value of this address, with the leftmost byte of the canonical string
    /// representation as the most significant byte.
    fn to_bits(&self) -> u128;

    /// Constructs an address from its numeric value. Returns `None` if the value does not fit into
    /// `BIT_COUNT` bits.
    fn from_bits(bits: u128) -> Option<Self>;

    /// Returns the number of bytes required to encode this IP address in full.
    fn byte_count(&self) -> usize {
        usize::from(Self::BIT_COUNT / 8)
    }

    /// Serializes this IP address into its canonical byte-sequence representation.
    fn to_bytes(&self) -> Vec<u8> {
        let all_bytes = self.to_bits().to_be_bytes();
        all_bytes[all_bytes.len() - self.byte_count()..].to_vec()
    }

    /// Attempts to deserialize an IP address from its canonical byte-sequence representation.
    ///
    /// Returns `None` if the byte sequence has the wrong length.
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != usize::from(Self::BIT_COUNT / 8) {
            return None;
        }
        let bits = bytes.iter()
            .fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
        Self::from_bits(bits)
    }

    /// Returns this IP address with each bit negated.
    fn bitwise_negate(&self) -> Self;

    /// Returns the sum of this IP address and an offset. Returns `None` if the addition overflows
    /// beyond the range of the IP address.
    fn add_offset(&self, offset: u128) -> Option<Self> {
        Self::from_bits(self.to_bits().checked_add(offset)?)
    }

    /// Returns the difference between this IP address and an offset. Returns `None` if the
    /// subtraction goes below zero.
    fn subtract_offset(&self, offset: u128) -> Option<Self> {
        Self::from_bits(self.to_bits().checked_sub(offset)?)
    }
}


/// An IPv4 address.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ipv4Address {
    addr_value: u32,
}

impl Ipv4Address {
    /// Constructs a new IPv4 address from its 32-bit representation, where the leftmost byte in the
    /// canonical string representation is the most significant byte (i.e. `"1.2.3.4"` ->
    /// `0x01020304`).
    pub const fn new(
        addr_value: u32,
    ) -> Ipv4Address {
        Ipv4Address {
            addr_value,
        }
    }

    pub fn value(&self) -> u32 { self.addr_value }

    /// Returns the four bytes of this address.
    pub fn octets(&self) -> [u8; 4] {
        self.addr_value.to_be_bytes()
    }
}

impl IpAddress for Ipv4Address {
    const BIT_COUNT: u8 = 32;
    const FAMILY: AddressFamily = AddressFamily::Ipv4;

    fn to_bits(&self) -> u128 { u128::from(self.addr_value) }

    fn from_bits(bits: u128) -> Option<Ipv4Address> {
        u32::try_from(bits).ok()
            .map(Ipv4Address::new)
    }

    fn bitwise_negate(&self) -> Ipv4Address {
        Ipv4Address::new(!self.addr_value)
    }
}

impl FromStr for Ipv4Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressParseError::Empty);
        }

        let chunks: Vec<&str> = s.split('.').collect();
        if chunks.len() != 4 {
            return Err(AddressParseError::IncorrectChunkCount(chunks.len(), 4));
        }

        let mut addr_val: u32 = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.is_empty() {
                return Err(AddressParseError::EmptyChunk(i));
            }

            // str::parse would also take "+1"
            if !chunk.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AddressParseError::InvalidChunk(i, String::from(*chunk)));
            }
            let chunk_val: u32 = match chunk.parse() {
                Ok(v) if v <= 255 => v,
                _ => return Err(AddressParseError::ChunkOutOfRange(i, String::from(*chunk), 0, 255)),
            };

            addr_val = (addr_val << 8) | chunk_val;
        }

        Ok(Ipv4Address::new(addr_val))
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.octets();
        write!(f, "{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl BitAnd for Ipv4Address {
    type Output = Ipv4Address;

    fn bitand(self, rhs: Self) -> Self::Output {
        Ipv4Address::new(self.addr_value & rhs.addr_value)
    }
}

impl BitOr for Ipv4Address {
    type Output = Ipv4Address;

    fn bitor(self, rhs: Self) -> Self::Output {
        Ipv4Address::new(self.addr_value | rhs.addr_value)
    }
}

impl BitXor for Ipv4Address {
    type Output = Ipv4Address;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Ipv4Address::new(self.addr_value ^ rhs.addr_value)
    }
}


/// An IPv6 address.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ipv6Address {
    addr_value: u128,
}

impl Ipv6Address {
    /// Constructs a new IPv6 address from its 128-bit representation, where the leftmost group in
    /// the canonical string representation is the most significant (i.e. `"2001:db8::1"` ->
    /// `0x2001_0db8_0000_0000_0000_0000_0000_0001`).
    pub const fn new(
        addr_value: u128,
    ) -> Ipv6Address {
        Ipv6Address {
            addr_value,
        }
    }

    pub fn value(&self) -> u128 { self.addr_value }

    /// Returns this address represented as 16-bit chunks.
    pub fn to_chunks(&self) -> [u16; 8] {
        let mut ret = [0u16; 8];
        for (i, chunk) in ret.iter_mut().enumerate() {
            *chunk = (self.addr_value >> (112 - 16 * i)) as u16;
        }
        ret
    }

    /// Creates an IPv6 address from its 16-bit chunk representation.
    pub fn from_chunks(chunks: [u16; 8]) -> Ipv6Address {
        let addr_value = chunks.iter()
            .fold(0u128, |acc, c| (acc << 16) | u128::from(*c));
        Ipv6Address::new(addr_value)
    }

    /// Outputs the IPv6 address in its full string representation with all leading zeroes and no
    /// omissions of consecutive zero fields.
    pub fn to_full_string(&self) -> String {
        let chunk_strings: Vec<String> = self.to_chunks().iter()
            .map(|c| format!("{:04x}", c))
            .collect();
        chunk_strings.join(":")
    }

    /// Parses the colon-separated groups of one side of a `::` marker. `first_index` is the index
    /// of the first group within the whole address; it is only used for error reporting.
    fn parse_groups(part: &str, first_index: usize, ipv4_tail_allowed: bool) -> std::result::Result<Vec<u16>, AddressParseError> {
        let mut groups = Vec::with_capacity(8);
        if part.is_empty() {
            return Ok(groups);
        }

        let chunks: Vec<&str> = part.split(':').collect();
        for (i, chunk) in chunks.iter().enumerate() {
            let index = first_index + groups.len();
            let is_last = i == chunks.len() - 1;

            if ipv4_tail_allowed && is_last && chunk.contains('.') {
                // "::ffff:192.0.2.1"
                let ipv4: Ipv4Address = chunk.parse()
                    .map_err(|_| AddressParseError::InvalidChunk(index, String::from(*chunk)))?;
                groups.push((ipv4.value() >> 16) as u16);
                groups.push(ipv4.value() as u16);
                continue;
            }

            if chunk.is_empty() {
                return Err(AddressParseError::EmptyChunk(index));
            }
            if !chunk.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AddressParseError::InvalidChunk(index, String::from(*chunk)));
            }
            if chunk.len() > 4 {
                return Err(AddressParseError::ChunkTooLong(index, String::from(*chunk)));
            }
            let value = u16::from_str_radix(chunk, 16)
                .map_err(|_| AddressParseError::InvalidChunk(index, String::from(*chunk)))?;
            groups.push(value);
        }
        Ok(groups)
    }
}

impl IpAddress for Ipv6Address {
    const BIT_COUNT: u8 = 128;
    const FAMILY: AddressFamily = AddressFamily::Ipv6;

    fn to_bits(&self) -> u128 { self.addr_value }

    fn from_bits(bits: u128) -> Option<Ipv6Address> {
        Some(Ipv6Address::new(bits))
    }

    fn bitwise_negate(&self) -> Ipv6Address {
        Ipv6Address::new(!self.addr_value)
    }
}

impl FromStr for Ipv6Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressParseError::Empty);
        }

        let halves: Vec<&str> = s.split("::").collect();
        if halves.len() > 2 {
            // "1234::5678::9abc" is invalid
            return Err(AddressParseError::TooManyShorteningElements(halves.len() - 1, 1));
        }

        let mut chunks = [0u16; 8];
        if halves.len() == 1 {
            // full address "123:45:678:9:ab:cd:ef:21"
            let groups = Ipv6Address::parse_groups(halves[0], 0, true)?;
            if groups.len() != 8 {
                return Err(AddressParseError::IncorrectChunkCount(groups.len(), 8));
            }
            chunks.copy_from_slice(&groups);
        } else {
            // shortened address "123::456a"
            let head = Ipv6Address::parse_groups(halves[0], 0, false)?;
            let tail = Ipv6Address::parse_groups(halves[1], head.len(), true)?;
            if head.len() + tail.len() > 7 {
                // "::" must stand for at least one zero group
                return Err(AddressParseError::IncorrectChunkCount(head.len() + tail.len(), 7));
            }

            chunks[..head.len()].copy_from_slice(&head);
            chunks[8 - tail.len()..].copy_from_slice(&tail);
            // leave remaining chunks as zero
        }

        Ok(Ipv6Address::from_chunks(chunks))
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chunks = self.to_chunks();

        // find the longest run of at least two zero chunks; the leftmost one wins a tie
        let mut best: Option<(usize, usize)> = None;
        let mut i = 0;
        while i < chunks.len() {
            if chunks[i] != 0 {
                i += 1;
                continue;
            }
            let run_start = i;
            while i < chunks.len() && chunks[i] == 0 {
                i += 1;
            }
            let run_length = i - run_start;
            if run_length >= 2 && best.map(|(_, len)| run_length > len).unwrap_or(true) {
                best = Some((run_start, run_length));
            }
        }

        let hex = |cs: &[u16]| -> String {
            cs.iter()
                .map(|c| format!("{:x}", c))
                .collect::<Vec<String>>()
                .join(":")
        };
        match best {
            Some((start, length)) => {
                write!(f, "{}::{}", hex(&chunks[..start]), hex(&chunks[start + length..]))
            },
            None => write!(f, "{}", hex(&chunks)),
        }
    }
}

impl BitAnd for Ipv6Address {
    type Output = Ipv6Address;

    fn bitand(self, rhs: Self) -> Self::Output {
        Ipv6Address::new(self.addr_value & rhs.addr_value)
    }
}

impl BitOr for Ipv6Address {
    type Output = Ipv6Address;

    fn bitor(self, rhs: Self) -> Self::Output {
        Ipv6Address::new(self.addr_value | rhs.addr_value)
    }
}

impl BitXor for Ipv6Address {
    type Output = Ipv6Address;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Ipv6Address::new(self.addr_value ^ rhs.addr_value)
    }
}


/// An IP address of either family.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Address {
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
}
impl Address {
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::Ipv4(_) => AddressFamily::Ipv4,
            Address::Ipv6(_) => AddressFamily::Ipv6,
        }
    }

    /// Returns the bytes of this address: 4 for IPv4, 16 for IPv6.
    pub fn octets(&self) -> Vec<u8> {
        match self {
            Address::Ipv4(a) => a.to_bytes(),
            Address::Ipv6(a) => a.to_bytes(),
        }
    }

    pub fn to_bits(&self) -> u128 {
        match self {
            Address::Ipv4(a) => a.to_bits(),
            Address::Ipv6(a) => a.to_bits(),
        }
    }

    /// Constructs an address of the given family from its numeric value. Returns `None` if the
    /// value does not fit.
    pub fn from_bits(family: AddressFamily, bits: u128) -> Option<Address> {
        match family {
            AddressFamily::Ipv4 => Ipv4Address::from_bits(bits).map(Address::Ipv4),
            AddressFamily::Ipv6 => Ipv6Address::from_bits(bits).map(Address::Ipv6),
        }
    }

    /// Renders the address in binary: octets separated by dots for IPv4, 16-bit groups separated
    /// by colons for IPv6.
    pub fn to_binary(&self) -> String {
        let (group_size, separator) = match self {
            Address::Ipv4(_) => (1, "."),
            Address::Ipv6(_) => (2, ":"),
        };
        self.octets()
            .chunks(group_size)
            .map(bytes_to_binary)
            .collect::<Vec<String>>()
            .join(separator)
    }
}
impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            Err(AddressParseError::Empty)
        } else if s.contains(':') {
            // dots are allowed as an embedded IPv4 tail
            s.parse().map(Address::Ipv6)
        } else if s.contains('.') {
            s.parse().map(Address::Ipv4)
        } else {
            Err(AddressParseError::UnknownAddressType)
        }
    }
}
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ipv4(a) => fmt::Display::fmt(a, f),
            Address::Ipv6(a) => fmt::Display::fmt(a, f),
        }
    }
}
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl From<Ipv4Address> for Address {
    fn from(addr: Ipv4Address) -> Self { Address::Ipv4(addr) }
}
impl From<Ipv6Address> for Address {
    fn from(addr: Ipv6Address) -> Self { Address::Ipv6(addr) }
}


/// Why a piece of text is not an IP address.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,

    #[error("unknown IP address type")]
    UnknownAddressType,

    #[error("IP address has {0} chunk(s); expected {1}")]
    IncorrectChunkCount(usize, usize),

    #[error("IP address chunk with index {0} is empty")]
    EmptyChunk(usize),

    #[error("IP address chunk with index {0} ({1:?}) is not a valid number")]
    InvalidChunk(usize, String),

    #[error("IP address chunk with index {0} ({1}) is out of range {2} <= n <= {3}")]
    ChunkOutOfRange(usize, String, u32, u32),

    #[error("IP address chunk with index {0} ({1:?}) has more than 4 hex digits")]
    ChunkTooLong(usize, String),

    #[error("IP address has {0} shortening elements; expected maximum {1}")]
    TooManyShorteningElements(usize, usize),
}


/// The outcome of [`validate_address`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<AddressFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parses an IPv4 or IPv6 address.
pub fn parse_address(text: &str) -> Result<Address> {
    debug!(input = text, "parsing address");
    text.parse()
        .map_err(|reason| {
            debug!(input = text, %reason, "rejected address");
            CidrError::InvalidAddressFormat {
                input: String::from(text),
                reason,
            }
        })
}

/// Checks whether the text is an IPv4 or IPv6 address. Never fails; the verdict and the reason
/// for a rejection are part of the returned value.
pub fn validate_address(text: &str) -> AddressValidation {
    debug!(input = text, "validating address");
    match parse_address(text) {
        Ok(addr) => AddressValidation {
            is_valid: true,
            family: Some(addr.family()),
            error: None,
        },
        Err(e) => AddressValidation {
            is_valid: false,
            family: None,
            error: Some(e.to_string()),
        },
    }
}

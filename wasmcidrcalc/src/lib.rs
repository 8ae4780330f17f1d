//! Browser binding for the network calculator.
//!
//! The page writes an input string as UTF-16 into the shared buffer (see
//! [`cidrcalc_get_buffer_offset`] and [`cidrcalc_get_buffer_size_offset`]) and calls one of the
//! operation exports. Results are JSON documents delivered through `append_output`; failures are
//! JSON documents of the form `{"error": {"kind": ..., "message": ...}}` delivered through
//! `append_error`; input that cannot even be split up is reported on the error stream as plain
//! text. Inputs consisting of several values separate them with spaces or newlines.

mod io_interop;


use serde::Serialize;

use cidrcalc::{
    analyze, enumerate_with, next_in_range, parse_address, parse_cidr, partition, range_to_cidrs,
    suggest, try_ranges_overlap, validate_address, Address, CidrBlock, EnumerateOptions,
};

use crate::io_interop::{output_error, output_json, write_to_error};


pub(crate) const U16_BUFFER_LEN: usize = 1024;
pub(crate) static mut BUFFER_SIZE: usize = 0;
pub(crate) static mut U16_BUFFER: [u16; U16_BUFFER_LEN] = [0; U16_BUFFER_LEN];

/// Upper bound on the number of addresses a single enumeration may return.
const MAX_ENUMERATE_COUNT: usize = 65_536;


#[no_mangle]
pub extern "C" fn cidrcalc_get_buffer_size_offset() -> *mut usize {
    std::ptr::addr_of_mut!(BUFFER_SIZE)
}
#[no_mangle]
pub extern "C" fn cidrcalc_get_buffer_offset() -> *mut u16 {
    std::ptr::addr_of_mut!(U16_BUFFER) as *mut u16
}


fn read_input(what: &str) -> Option<String> {
    let buffer = std::ptr::addr_of!(U16_BUFFER);
    let size = unsafe { *std::ptr::addr_of!(BUFFER_SIZE) }.min(U16_BUFFER_LEN);
    match String::from_utf16(unsafe { &(&(*buffer))[..size] }) {
        Ok(s) => Some(s),
        Err(_) => {
            write_to_error(&format!("Failed to decode {}.", what));
            None
        },
    }
}

/// Splits the input into exactly `N` whitespace-separated values.
fn split_input<'a, const N: usize>(input: &'a str, what: &str) -> Option<[&'a str; N]> {
    let pieces: Vec<&str> = input.split_whitespace().collect();
    match <[&str; N]>::try_from(pieces) {
        Ok(p) => Some(p),
        Err(_) => {
            write_to_error(&format!("Expected {} separated by whitespace.", what));
            None
        },
    }
}

fn cidr_input(text: &str) -> Option<CidrBlock> {
    parse_cidr(text.trim())
        .map_err(|e| output_error(&e))
        .ok()
}

fn address_input(text: &str) -> Option<Address> {
    parse_address(text.trim())
        .map_err(|e| output_error(&e))
        .ok()
}


#[no_mangle]
pub extern "C" fn cidrcalc_validate() {
    if let Some(input) = read_input("address") {
        output_json(&validate_address(input.trim()));
    }
}

#[no_mangle]
pub extern "C" fn cidrcalc_analyze() {
    let Some(input) = read_input("network") else { return };
    if let Some(block) = cidr_input(&input) {
        output_json(&analyze(&block));
    }
}

#[no_mangle]
pub extern "C" fn cidrcalc_suggest() {
    let Some(input) = read_input("address") else { return };
    if let Some(addr) = address_input(&input) {
        output_json(&suggest(&addr));
    }
}

#[no_mangle]
pub extern "C" fn cidrcalc_split() {
    let Some(input) = read_input("split request") else { return };
    let Some([net_str, count_str]) = split_input::<2>(&input, "network and subnet count") else { return };
    let Some(block) = cidr_input(net_str) else { return };
    let count: usize = match count_str.parse() {
        Ok(c) => c,
        Err(_) => {
            write_to_error("Failed to parse subnet count.");
            return;
        },
    };

    match partition(&block, count) {
        Ok(plan) => output_json(&plan),
        Err(e) => output_error(&e),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainsResult {
    block: CidrBlock,
    address: Address,
    is_member: bool,
}

#[no_mangle]
pub extern "C" fn cidrcalc_contains() {
    let Some(input) = read_input("membership request") else { return };
    let Some([net_str, addr_str]) = split_input::<2>(&input, "network and address") else { return };
    let Some(block) = cidr_input(net_str) else { return };
    let Some(address) = address_input(addr_str) else { return };

    output_json(&ContainsResult {
        block,
        address,
        is_member: cidrcalc::is_member(&address, &block),
    });
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlapResult {
    first: CidrBlock,
    second: CidrBlock,
    overlap: bool,
}

#[no_mangle]
pub extern "C" fn cidrcalc_overlap() {
    let Some(input) = read_input("networks") else { return };
    let Some([one_str, other_str]) = split_input::<2>(&input, "two networks") else { return };
    let Some(first) = cidr_input(one_str) else { return };
    let Some(second) = cidr_input(other_str) else { return };

    match try_ranges_overlap(&first, &second) {
        Ok(overlap) => output_json(&OverlapResult { first, second, overlap }),
        Err(e) => output_error(&e),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnumerateResult {
    block: CidrBlock,
    addresses: Vec<Address>,
    truncated: bool,
}

fn enumerate_block(block: CidrBlock, max_count: usize) -> EnumerateResult {
    let options = EnumerateOptions { max_count: max_count.min(MAX_ENUMERATE_COUNT) };
    let addresses: Vec<Address> = enumerate_with(&block, &options).iter().collect();
    let truncated = match addresses.last() {
        Some(last) => matches!(next_in_range(&block, last), Ok(Some(_))),
        None => true,
    };
    EnumerateResult { block, addresses, truncated }
}

#[no_mangle]
pub extern "C" fn cidrcalc_enumerate() {
    let Some(input) = read_input("network") else { return };
    let pieces: Vec<&str> = input.split_whitespace().collect();
    let (net_str, max_count) = match pieces.as_slice() {
        [net_str] => (*net_str, EnumerateOptions::default().max_count),
        [net_str, max_str] => match max_str.parse() {
            Ok(m) => (*net_str, m),
            Err(_) => {
                write_to_error("Failed to parse maximum count.");
                return;
            },
        },
        _ => {
            write_to_error("Expected a network and an optional maximum count.");
            return;
        },
    };
    let Some(block) = cidr_input(net_str) else { return };

    output_json(&enumerate_block(block, max_count));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NextResult {
    block: CidrBlock,
    current: Address,
    next: Option<Address>,
}

#[no_mangle]
pub extern "C" fn cidrcalc_next() {
    let Some(input) = read_input("next-address request") else { return };
    let Some([net_str, addr_str]) = split_input::<2>(&input, "network and address") else { return };
    let Some(block) = cidr_input(net_str) else { return };
    let Some(current) = address_input(addr_str) else { return };

    match next_in_range(&block, &current) {
        Ok(next) => output_json(&NextResult { block, current, next }),
        Err(e) => output_error(&e),
    }
}

#[no_mangle]
pub extern "C" fn cidrcalc_derange() {
    let Some(input) = read_input("range") else { return };
    let Some([start_str, end_str]) = split_input::<2>(&input, "two addresses") else { return };
    let Some(start) = address_input(start_str) else { return };
    let Some(end) = address_input(end_str) else { return };

    match range_to_cidrs(&start, &end) {
        Ok(blocks) => output_json(&blocks),
        Err(e) => output_error(&e),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_input() {
        assert_eq!(Some(["10.0.0.0/8", "4"]), split_input::<2>(" 10.0.0.0/8\n4 ", "x"));
        assert_eq!(None, split_input::<2>("10.0.0.0/8", "x"));
        assert_eq!(None, split_input::<2>("a b c", "x"));
    }

    #[test]
    fn test_result_documents() {
        let block = parse_cidr("192.168.1.0/24").unwrap();
        let address: Address = "192.168.1.200".parse().unwrap();
        let json = serde_json::to_value(ContainsResult { block, address, is_member: true }).unwrap();
        assert_eq!("192.168.1.0/24", json["block"]);
        assert_eq!(true, json["isMember"]);

        let json = serde_json::to_value(NextResult { block, current: address, next: None }).unwrap();
        assert_eq!(serde_json::Value::Null, json["next"]);
    }

    #[test]
    fn test_enumerate_block_is_capped() {
        let result = enumerate_block(parse_cidr("::/0").unwrap(), usize::MAX);
        assert_eq!(MAX_ENUMERATE_COUNT, result.addresses.len());
        assert!(result.truncated);

        let result = enumerate_block(parse_cidr("192.0.2.0/30").unwrap(), usize::MAX);
        assert_eq!(4, result.addresses.len());
        assert!(!result.truncated);
    }
}

pub mod contains;
pub mod derange;
pub mod enumerate;
pub mod show_net;
pub mod split;
pub mod suggest;
pub mod validate;


use cidrcalc::{parse_address, parse_cidr, Address, CidrBlock};


/// Parses a command-line argument as CIDR notation, reporting failures on stderr.
pub fn cidr_arg(arg: &str) -> Option<CidrBlock> {
    match parse_cidr(arg.trim()) {
        Ok(block) => Some(block),
        Err(e) => {
            eprintln!("{}", e);
            None
        },
    }
}

/// Parses a command-line argument as an address, reporting failures on stderr.
pub fn address_arg(arg: &str) -> Option<Address> {
    match parse_address(arg.trim()) {
        Ok(addr) => Some(addr),
        Err(e) => {
            eprintln!("{}", e);
            None
        },
    }
}

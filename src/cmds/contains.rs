use cidrcalc::{is_member, next_in_range, try_ranges_overlap};

use crate::usage;
use crate::cmds::{address_arg, cidr_arg};


pub fn contains(args: &[String]) -> i32 {
    // cidrcalc --contains IPADDRESS/CIDRPREFIX IPADDRESS...
    if args.len() < 4 {
        usage();
        return 1;
    }

    let block = match cidr_arg(&args[2]) {
        Some(b) => b,
        None => return 1,
    };

    let mut ret = 0;
    for addr_str in &args[3..] {
        let addr = match address_arg(addr_str) {
            Some(a) => a,
            None => {
                ret = 1;
                continue;
            },
        };
        let verdict = if addr.family() != block.family() {
            "not in (different family)"
        } else if is_member(&addr, &block) {
            "in"
        } else {
            "not in"
        };
        println!("{} is {} {}", addr, verdict, block.to_network_block());
    }

    ret
}

pub fn overlap(args: &[String]) -> i32 {
    // cidrcalc --overlap IPADDRESS/CIDRPREFIX IPADDRESS/CIDRPREFIX
    if args.len() != 4 {
        usage();
        return 1;
    }

    let one = match cidr_arg(&args[2]) {
        Some(b) => b,
        None => return 1,
    };
    let other = match cidr_arg(&args[3]) {
        Some(b) => b,
        None => return 1,
    };

    match try_ranges_overlap(&one, &other) {
        Ok(true) => println!("{} and {} overlap", one.to_network_block(), other.to_network_block()),
        Ok(false) => println!("{} and {} do not overlap", one.to_network_block(), other.to_network_block()),
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        },
    }

    0
}

pub fn next(args: &[String]) -> i32 {
    // cidrcalc --next IPADDRESS/CIDRPREFIX IPADDRESS
    if args.len() != 4 {
        usage();
        return 1;
    }

    let block = match cidr_arg(&args[2]) {
        Some(b) => b,
        None => return 1,
    };
    let current = match address_arg(&args[3]) {
        Some(a) => a,
        None => return 1,
    };

    match next_in_range(&block, &current) {
        Ok(Some(next)) => println!("{}", next),
        Ok(None) => println!("end of range"),
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        },
    }

    0
}

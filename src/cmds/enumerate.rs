use cidrcalc::{enumerate_with, next_in_range, Address, EnumerateOptions};

use crate::usage;
use crate::cmds::cidr_arg;


pub fn enumerate(args: &[String]) -> i32 {
    // cidrcalc --enumerate IPADDRESS/CIDRPREFIX [MAXCOUNT]
    if args.len() < 3 || args.len() > 4 {
        usage();
        return 1;
    }

    let block = match cidr_arg(&args[2]) {
        Some(b) => b,
        None => return 1,
    };
    let mut options = EnumerateOptions::default();
    if let Some(max_str) = args.get(3) {
        options.max_count = match max_str.trim().parse() {
            Ok(m) => m,
            Err(e) => {
                eprintln!("failed to parse maximum count {:?}: {}", max_str, e);
                return 1;
            },
        };
    }

    let mut last: Option<Address> = None;
    for addr in &enumerate_with(&block, &options) {
        println!("{}", addr);
        last = Some(addr);
    }

    let truncated = match last {
        Some(l) => matches!(next_in_range(&block, &l), Ok(Some(_))),
        None => options.max_count == 0,
    };
    if truncated {
        eprintln!("(stopped after {} addresses)", options.max_count);
    }

    0
}

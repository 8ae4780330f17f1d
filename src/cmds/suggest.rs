use cidrcalc::suggest;

use crate::usage;
use crate::cmds::address_arg;


pub fn suggest_networks(args: &[String]) -> i32 {
    // cidrcalc --suggest IPADDRESS...
    if args.len() < 3 {
        usage();
        return 1;
    }

    let mut ret = 0;
    for addr_str in &args[2..] {
        match address_arg(addr_str) {
            Some(addr) => println!("{} => {}", addr, suggest(&addr)),
            None => ret = 1,
        }
    }
    ret
}

use cidrcalc::range_to_cidrs;

use crate::usage;
use crate::cmds::address_arg;


pub fn derange(args: &[String]) -> i32 {
    // cidrcalc --derange ONE OTHER
    if args.len() != 4 {
        usage();
        return 1;
    }

    let one = match address_arg(&args[2]) {
        Some(a) => a,
        None => return 1,
    };
    let other = match address_arg(&args[3]) {
        Some(a) => a,
        None => return 1,
    };

    match range_to_cidrs(&one, &other) {
        Ok(blocks) => {
            for block in blocks {
                println!("{}", block);
            }
            0
        },
        Err(e) => {
            eprintln!("{}", e);
            1
        },
    }
}

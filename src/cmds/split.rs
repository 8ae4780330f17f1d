use cidrcalc::{analyze, partition, AddressFamily, SubnetDescriptor};

use crate::usage;
use crate::cmds::cidr_arg;
use crate::cmds::show_net::output_analysis;
use crate::console::{Color, write_in_color};


const LABEL_COLOR: Color = Color::White;
const IP_ADDRESS_COLOR: Color = Color::Blue;


pub fn split(args: &[String]) -> i32 {
    // cidrcalc --split IPADDRESS/CIDRPREFIX SUBNETCOUNT
    if args.len() != 4 {
        usage();
        return 1;
    }

    let block = match cidr_arg(&args[2]) {
        Some(b) => b,
        None => return 1,
    };
    let count: usize = match args[3].trim().parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to parse subnet count {:?}: {}", args[3], e);
            return 1;
        },
    };

    let plan = match partition(&block, count) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        },
    };

    println!("Subnet to split:");
    output_analysis(&analyze(&block), false);
    println!();

    for (i, subnet) in plan.subnets.iter().enumerate() {
        println!("Subnet {} of {}:", i + 1, plan.requested_count);
        output_subnet(subnet, block.family());
        println!();
    }

    if !plan.unallocated.is_empty() {
        println!("Unused networks:");
        for unused in &plan.unallocated {
            println!("{}", unused);
        }
    }

    0
}

fn output_subnet(subnet: &SubnetDescriptor, family: AddressFamily) {
    let address_width = match family {
        AddressFamily::Ipv4 => 21,
        AddressFamily::Ipv6 => 46,
    };
    let output_row = |label: &str, value: &str| {
        write_in_color(label, Some(LABEL_COLOR), 11);
        write_in_color(value, Some(IP_ADDRESS_COLOR), address_width);
        println!();
    };

    output_row("Network:", &subnet.to_cidr().to_string());
    output_row("HostMin:", &subnet.first_usable.to_string());
    output_row("HostMax:", &subnet.last_usable.to_string());
    if family == AddressFamily::Ipv4 {
        output_row("Broadcast:", &subnet.broadcast.to_string());
    }
    output_row("Hosts/Net:", &subnet.usable_host_count.to_string());
}

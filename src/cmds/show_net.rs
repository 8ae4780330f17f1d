use cidrcalc::bit_manip::prefix_mask_bits;
use cidrcalc::{analyze, Address, AddressFamily, Classification, NetworkAnalysis};

use crate::cmds::cidr_arg;
use crate::console::{Color, write_in_color};


const LABEL_COLOR: Color = Color::White;
const IP_ADDRESS_COLOR: Color = Color::Blue;
const HOST_BITS_COLOR: Color = Color::Yellow;
const NET_BITS_COLOR: Color = Color::Green;
const MASK_BITS_COLOR: Color = Color::Red;
const CLASS_COLOR: Color = Color::Magenta;
const TRAITS_COLOR: Color = Color::Cyan;
const ADDR_SEP_COLOR: Color = Color::DarkGray;

const LABEL_WIDTH: isize = 11;


pub fn show_net(args: &[String]) -> i32 {
    // cidrcalc IPADDRESS/CIDRPREFIX...
    let mut analyses = Vec::with_capacity(args.len() - 1);
    for arg in &args[1..] {
        match cidr_arg(arg) {
            Some(block) => analyses.push(analyze(&block)),
            None => return 1,
        }
    }

    for (i, analysis) in analyses.iter().enumerate() {
        if i > 0 {
            println!();
        }
        output_analysis(analysis, true);
    }

    0
}

fn address_width(family: AddressFamily) -> isize {
    match family {
        AddressFamily::Ipv4 => 21,
        AddressFamily::Ipv6 => 46,
    }
}

/// Splits the binary form of an address into colored runs: network bits, host bits and group
/// separators. With an override color, all bits take that color.
pub(crate) fn color_binary(binary: &str, prefix: Option<u8>, override_color: Option<Color>) -> Vec<(String, Color)> {
    let mut runs: Vec<(String, Color)> = Vec::new();
    let mut bit_index: u8 = 0;
    for c in binary.chars() {
        let color = if c == '0' || c == '1' {
            let color = match (override_color, prefix) {
                (Some(oc), _) => oc,
                (None, Some(p)) if bit_index < p => NET_BITS_COLOR,
                _ => HOST_BITS_COLOR,
            };
            bit_index += 1;
            color
        } else {
            ADDR_SEP_COLOR
        };

        match runs.last_mut() {
            Some((text, last_color)) if *last_color == color => text.push(c),
            _ => runs.push((String::from(c), color)),
        }
    }
    runs
}

fn output_binary_address(addr: &Address, prefix: Option<u8>, override_color: Option<Color>) {
    for (text, color) in color_binary(&addr.to_binary(), prefix, override_color) {
        write_in_color(text, Some(color), 0);
    }
}

/// Lists the special ranges an address falls into.
pub(crate) fn traits_text(classification: &Classification) -> String {
    let traits: Vec<&str> = [
        (classification.is_private, "private"),
        (classification.is_loopback, "loopback"),
        (classification.is_multicast, "multicast"),
        (classification.is_link_local, "link-local"),
    ].iter()
        .filter(|(is, _name)| *is)
        .map(|(_is, name)| *name)
        .collect();

    if traits.is_empty() {
        String::from("public")
    } else {
        traits.join(", ")
    }
}

/// Outputs and dissects the analysis of a network. The originally given address is only shown if
/// `show_address` is set.
pub fn output_analysis(analysis: &NetworkAnalysis, show_address: bool) {
    let family = analysis.family;
    let prefix = analysis.prefix_length;
    let addr_width = address_width(family);
    let output_initial_columns = |label: &str, address: &str| {
        write_in_color(label, Some(LABEL_COLOR), LABEL_WIDTH);
        write_in_color(address, Some(IP_ADDRESS_COLOR), addr_width);
    };

    if show_address {
        let mask_bits = prefix_mask_bits(prefix, family.bit_count());
        let all_bits = prefix_mask_bits(family.bit_count(), family.bit_count());
        let mask_addr = Address::from_bits(family, mask_bits)
            .expect("prefix mask fits into the address width");
        let wildcard_addr = Address::from_bits(family, mask_bits ^ all_bits)
            .expect("wildcard fits into the address width");

        output_initial_columns("Address:", &analysis.block.address().to_string());
        output_binary_address(&analysis.block.address(), Some(prefix), None);
        println!();

        output_initial_columns("Netmask:", &format!("{} = {}", analysis.subnet_mask, prefix));
        output_binary_address(&mask_addr, None, Some(MASK_BITS_COLOR));
        println!();

        output_initial_columns("Wildcard:", &analysis.wildcard_mask);
        output_binary_address(&wildcard_addr, None, None);
        println!();

        write_in_color("=>", Some(LABEL_COLOR), 0);
        println!();
    }

    output_initial_columns("Network:", &analysis.network_as_cidr().to_string());
    output_binary_address(&analysis.network, Some(prefix), None);
    println!();

    if analysis.usable_hosts.bits() > 0 {
        output_initial_columns("HostMin:", &analysis.first_usable.to_string());
        output_binary_address(&analysis.first_usable, None, None);
        println!();
        output_initial_columns("HostMax:", &analysis.last_usable.to_string());
        output_binary_address(&analysis.last_usable, None, None);
    } else {
        write_in_color("no hosts", Some(LABEL_COLOR), 0);
    }
    println!();

    match family {
        AddressFamily::Ipv4 => {
            output_initial_columns("Broadcast:", &analysis.broadcast.to_string());
            output_binary_address(&analysis.broadcast, None, None);
        },
        AddressFamily::Ipv6 => {
            write_in_color("no broadcast", Some(LABEL_COLOR), 0);
        },
    }
    println!();

    output_initial_columns("Addresses:", &analysis.total_hosts.to_string());
    println!();

    output_initial_columns("Hosts/Net:", &analysis.usable_hosts.to_string());
    write_in_color(analysis.classification.network_class.description(), Some(CLASS_COLOR), 0);
    write_in_color(", ", Some(LABEL_COLOR), 0);
    write_in_color(traits_text(&analysis.classification), Some(TRAITS_COLOR), 0);
    println!();
}

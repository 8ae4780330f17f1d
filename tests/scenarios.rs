use cidrcalc::{
    analyze, analyze_str, enumerate, is_member, parse_cidr, partition, ranges_overlap,
    validate_address, Address, AddressFamily, ErrorKind, NetworkClass,
};


const IPV4_SAMPLES: &[&str] = &[
    "0.0.0.0/0", "1.2.3.4/1", "10.0.0.0/8", "172.20.13.77/12", "192.168.1.0/24", "192.168.1.77/26",
    "203.0.113.9/29", "198.51.100.7/30", "192.0.2.7/31", "192.0.2.7/32", "255.255.255.255/32",
];
const IPV6_SAMPLES: &[&str] = &[
    "::/0", "2001:db8::1/32", "2001:db8:1:2:3:4:5:6/64", "fe80::1/10", "fd00::abcd/127", "::1/128",
];

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}


#[test]
fn scenario_analyze_class_c() {
    let analysis = analyze_str("192.168.1.0/24").unwrap();
    assert_eq!(addr("192.168.1.0"), analysis.network);
    assert_eq!(addr("192.168.1.255"), analysis.broadcast);
    assert_eq!("255.255.255.0", analysis.subnet_mask);
    assert_eq!("256", analysis.total_hosts.to_string());
    assert_eq!("254", analysis.usable_hosts.to_string());
    assert_eq!(addr("192.168.1.1"), analysis.first_usable);
    assert_eq!(addr("192.168.1.254"), analysis.last_usable);
}

#[test]
fn scenario_analyze_class_a() {
    let analysis = analyze_str("10.0.0.0/8").unwrap();
    assert_eq!(NetworkClass::A, analysis.classification.network_class);
    assert!(analysis.classification.is_private);
    assert_eq!("16777216", analysis.total_hosts.to_string());
}

#[test]
fn scenario_validate() {
    let invalid = validate_address("256.1.1.1");
    assert!(!invalid.is_valid);
    assert_eq!(None, invalid.family);
    assert!(invalid.error.unwrap().contains("out of range"));

    let valid = validate_address("2001:db8::1");
    assert!(valid.is_valid);
    assert_eq!(Some(AddressFamily::Ipv6), valid.family);
    assert_eq!(None, valid.error);

    for bad in &["", "1.2.3", "1.2.3.4.5", "1..2.3", "01.2.3.x", "1:2:3:4:5:6:7:8:9", "1::2::3", "12345::", "g::1"] {
        assert!(!validate_address(bad).is_valid, "{:?} should be invalid", bad);
    }
}

#[test]
fn scenario_split() {
    let plan = partition(&parse_cidr("192.168.1.0/24").unwrap(), 4).unwrap();
    assert_eq!(4, plan.subnets.len());
    for subnet in &plan.subnets {
        assert_eq!(26, subnet.prefix_length);
    }
    assert_eq!(addr("192.168.1.0"), plan.subnets[0].network);
    assert_eq!(addr("192.168.1.63"), plan.subnets[0].broadcast);
    assert_eq!("62", plan.subnets[0].usable_host_count.to_string());
}

#[test]
fn scenario_overlap() {
    assert!(ranges_overlap(&parse_cidr("192.168.1.0/24").unwrap(), &parse_cidr("192.168.1.128/25").unwrap()));
}

#[test]
fn scenario_errors() {
    let kind = |text: &str| parse_cidr(text).unwrap_err().kind();
    assert_eq!(ErrorKind::InvalidCidrFormat, kind("10.0.0.0"));
    assert_eq!(ErrorKind::InvalidCidrFormat, kind("10.0.0.0/8/8"));
    assert_eq!(ErrorKind::InvalidCidrFormat, kind("10.0.0.0/x"));
    assert_eq!(ErrorKind::InvalidAddressFormat, kind("10.0.0/8"));
    assert_eq!(ErrorKind::PrefixOutOfRange, kind("10.0.0.0/33"));
    assert_eq!(ErrorKind::PrefixOutOfRange, kind("::/129"));

    let block = parse_cidr("10.0.0.0/30").unwrap();
    assert_eq!(ErrorKind::SubnetCountExceedsAddressSpace, partition(&block, 5).unwrap_err().kind());
    assert_eq!(ErrorKind::InvalidSubnetCount, partition(&block, 0).unwrap_err().kind());
    assert_eq!(ErrorKind::SubnetCountTooLarge, partition(&parse_cidr("::/0").unwrap(), usize::MAX).unwrap_err().kind());
}


#[test]
fn property_masks_combine_to_broadcast() {
    for text in IPV4_SAMPLES {
        let analysis = analyze_str(text).unwrap();
        let wildcard = addr(&analysis.wildcard_mask).to_bits();
        let mask = addr(&analysis.subnet_mask).to_bits();
        let network = analysis.network.to_bits();
        assert_eq!(0, network & wildcard, "{}", text);
        assert_eq!(analysis.broadcast.to_bits(), network | wildcard, "{}", text);
        assert_eq!(0xFFFF_FFFF, mask ^ wildcard, "{}", text);
    }
}

#[test]
fn property_total_hosts() {
    for text in IPV4_SAMPLES.iter().chain(IPV6_SAMPLES) {
        let analysis = analyze_str(text).unwrap();
        let host_bits = analysis.family.bit_count() - analysis.prefix_length;
        let expected = num_bigint_pow2(host_bits);
        assert_eq!(expected, analysis.total_hosts.to_string(), "{}", text);
    }
}

fn num_bigint_pow2(exponent: u8) -> String {
    // decimal doubling, independent of the implementation under test
    let mut digits = vec![1u8];
    for _ in 0..exponent {
        let mut carry = 0;
        for d in digits.iter_mut() {
            let v = *d * 2 + carry;
            *d = v % 10;
            carry = v / 10;
        }
        if carry > 0 {
            digits.push(carry);
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

#[test]
fn property_reanalysis_is_idempotent() {
    for text in IPV4_SAMPLES.iter().chain(IPV6_SAMPLES) {
        let analysis = analyze_str(text).unwrap();
        let again = analyze(&analysis.network_as_cidr());
        assert_eq!(analysis.network, again.network, "{}", text);
        assert_eq!(analysis.broadcast, again.broadcast, "{}", text);
        assert_eq!(analysis.last_address, again.last_address, "{}", text);
    }
}

#[test]
fn property_round_trip() {
    for text in IPV4_SAMPLES.iter().chain(IPV6_SAMPLES) {
        let once = parse_cidr(text).unwrap();
        assert_eq!(once, parse_cidr(&once.to_string()).unwrap(), "{}", text);
    }
}

#[test]
fn property_membership_of_ends() {
    for text in IPV4_SAMPLES.iter().chain(IPV6_SAMPLES) {
        let block = parse_cidr(text).unwrap();
        let analysis = analyze(&block);
        assert!(is_member(&analysis.network, &block), "{}", text);
        assert!(is_member(&analysis.broadcast, &block), "{}", text);
        assert!(is_member(&analysis.last_address, &block), "{}", text);
    }
}

#[test]
fn property_partition_coverage() {
    let cases: &[(&str, usize)] = &[
        ("192.168.1.0/24", 1), ("192.168.1.0/24", 2), ("192.168.1.0/24", 3), ("192.168.1.0/24", 7),
        ("10.0.0.0/8", 1000), ("0.0.0.0/0", 5), ("2001:db8::/48", 6), ("::/0", 3), ("192.0.2.0/30", 4),
    ];
    for (text, count) in cases {
        let block = parse_cidr(text).unwrap();
        let plan = partition(&block, *count).unwrap();
        assert_eq!(*count, plan.subnets.len());

        // subnets and unallocated remainder, in address order
        let mut pieces: Vec<(u128, u128)> = plan.subnets.iter()
            .map(|s| (s.network.to_bits(), s.last_address.to_bits()))
            .chain(plan.unallocated.iter().map(|u| (u.network().to_bits(), u.last_address().to_bits())))
            .collect();
        pieces.sort();

        assert_eq!(block.network().to_bits(), pieces[0].0, "{} / {}", text, count);
        assert_eq!(block.last_address().to_bits(), pieces[pieces.len() - 1].1, "{} / {}", text, count);
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].1 + 1, pair[1].0, "{} / {}", text, count);
        }
        for pair in plan.subnets.windows(2) {
            assert!(pair[0].network < pair[1].network);
        }
        if count.is_power_of_two() {
            assert!(plan.unallocated.is_empty());
        }
    }
}

#[test]
fn property_enumeration_is_lazy_and_bounded() {
    let block = parse_cidr("10.0.0.0/8").unwrap();
    let enumeration = enumerate(&block, 5);
    let first: Vec<Address> = enumeration.iter().collect();
    let second: Vec<Address> = enumeration.iter().collect();
    assert_eq!(5, first.len());
    assert_eq!(first, second);
    assert_eq!(addr("10.0.0.4"), first[4]);

    let whole = enumerate(&parse_cidr("::/0").unwrap(), 2);
    assert_eq!(vec![addr("::"), addr("::1")], whole.iter().collect::<Vec<_>>());
}

use cidrcalc::{validate_address, AddressValidation};

use crate::usage;


/// Describes the outcome of validating one piece of text.
pub(crate) fn describe(text: &str, validation: &AddressValidation) -> String {
    match (&validation.family, &validation.error) {
        (Some(family), _) if validation.is_valid => format!("{}: valid {} address", text, family),
        (_, Some(error)) => format!("{}: {}", text, error),
        _ => format!("{}: invalid", text),
    }
}

pub fn validate(args: &[String]) -> i32 {
    // cidrcalc --validate TEXT...
    if args.len() < 3 {
        usage();
        return 1;
    }

    let mut ret = 0;
    for arg in &args[2..] {
        let text = arg.trim();
        let validation = validate_address(text);
        if !validation.is_valid {
            ret = 1;
        }
        println!("{}", describe(text, &validation));
    }
    ret
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!("2001:db8::1: valid IPv6 address", describe("2001:db8::1", &validate_address("2001:db8::1")));
        assert_eq!("10.0.0.1: valid IPv4 address", describe("10.0.0.1", &validate_address("10.0.0.1")));

        let text = describe("256.1.1.1", &validate_address("256.1.1.1"));
        assert!(text.starts_with("256.1.1.1: invalid IP address"));
        assert!(text.contains("out of range"));
    }
}

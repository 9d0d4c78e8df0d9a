//! EAN-13 normalization and check digit

/// Keep only ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check digit for a 12-digit payload.
///
/// Digits at even 0-based indices weigh 1, odd indices weigh 3. Non-digit
/// characters are ignored and missing trailing digits count as zero.
pub fn ean13_check_digit(payload: &str) -> u8 {
    let sum: u32 = payload
        .bytes()
        .filter(u8::is_ascii_digit)
        .take(12)
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

/// Normalize arbitrary input into a 13-digit EAN.
///
/// Exactly 13 digits (after stripping everything else) pass through as-is.
/// Otherwise the first 12 digits, right-padded with zeros, get a computed
/// check digit appended.
pub fn make_ean13(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() == 13 {
        return digits;
    }

    let mut payload: String = digits.chars().take(12).collect();
    while payload.len() < 12 {
        payload.push('0');
    }
    let check = ean13_check_digit(&payload);
    payload.push(char::from(b'0' + check));
    payload
}

/// Whether `code` is 13 digits with a correct check digit
pub fn is_valid_ean13(code: &str) -> bool {
    code.len() == 13
        && code.bytes().all(|b| b.is_ascii_digit())
        && ean13_check_digit(&code[..12]) == code.as_bytes()[12] - b'0'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_known_codes() {
        assert_eq!(ean13_check_digit("400638133393"), 1);
        assert_eq!(make_ean13("400638133393"), "4006381333931");
        assert_eq!(ean13_check_digit("590123412345"), 7);
        assert_eq!(make_ean13("590123412345"), "5901234123457");
        assert!(is_valid_ean13("4006381333931"));
        assert!(!is_valid_ean13("4006381333932"));
    }

    #[test]
    fn test_thirteen_digits_pass_through_even_if_invalid() {
        assert_eq!(make_ean13("4006381333932"), "4006381333932");
        assert_eq!(make_ean13("400-638-133-393-1"), "4006381333931");
    }

    #[test]
    fn test_short_and_long_inputs() {
        assert_eq!(make_ean13(""), "0000000000000");
        assert_eq!(make_ean13("abc"), "0000000000000");
        assert_eq!(make_ean13("123"), format!("123000000000{}", ean13_check_digit("123000000000")));
        // 14 digits: truncated to 12 plus a fresh check digit
        assert_eq!(make_ean13("40063813339319"), "4006381333931");
    }

    proptest! {
        #[test]
        fn prop_check_digit_satisfies_weighted_sum(payload in "[0-9]{12}") {
            let check = ean13_check_digit(&payload);
            prop_assert!(check <= 9);

            let code = format!("{}{}", payload, check);
            let total: u32 = code
                .bytes()
                .enumerate()
                .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 1 } else { 3 })
                .sum();
            prop_assert_eq!(total % 10, 0);
            prop_assert!(is_valid_ean13(&code));
        }

        #[test]
        fn prop_make_is_idempotent(input in ".{0,24}") {
            let once = make_ean13(&input);
            prop_assert_eq!(once.len(), 13);
            prop_assert_eq!(make_ean13(&once), once);
        }
    }

    #[quickcheck]
    fn qc_valid_codes_are_unchanged(payload: Vec<u8>) -> bool {
        let payload: String = payload.iter().take(12).map(|b| char::from(b'0' + b % 10)).collect();
        let code = make_ean13(&payload);
        is_valid_ean13(&code) && make_ean13(&code) == code
    }
}

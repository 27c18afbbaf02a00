//! Belgian IBAN validation (ISO 7064 MOD 97-10).

/// Digits folded into the running remainder per step; small enough that
/// `remainder * 10^7 + block` always fits in a `u64`.
const BLOCK_DIGITS: usize = 7;

/// Remove all whitespace and uppercase.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Check that `raw` is a Belgian IBAN with a valid MOD-97 checksum.
///
/// Whitespace and letter case are ignored.
pub fn is_valid_belgian_iban(raw: &str) -> bool {
    let iban = normalize_iban(raw);

    let bytes = iban.as_bytes();
    if bytes.len() != 16 || &bytes[..2] != b"BE" || !bytes[2..].iter().all(u8::is_ascii_digit) {
        return false;
    }

    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let numeric = expand_letters(&rearranged);
    mod97(&numeric) == Some(1)
}

/// Replace letters by their two-digit values (A = 10 … Z = 35).
fn expand_letters(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for ch in s.chars() {
        if ch.is_ascii_uppercase() {
            out.push_str(&(ch as u32 - 'A' as u32 + 10).to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Remainder of a decimal digit string modulo 97, folded in 7-digit blocks.
fn mod97(digits: &str) -> Option<u64> {
    let bytes = digits.as_bytes();
    let mut remainder: u64 = 0;
    for block in bytes.chunks(BLOCK_DIGITS) {
        let block = std::str::from_utf8(block).ok()?;
        let prefixed = format!("{remainder}{block}");
        remainder = prefixed.parse::<u64>().ok()? % 97;
    }
    Some(remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID: &str = "BE68539007547034";

    #[test]
    fn classic_test_iban_is_valid() {
        assert!(is_valid_belgian_iban(VALID));
    }

    #[test]
    fn spaces_and_lowercase_are_accepted() {
        assert!(is_valid_belgian_iban("be68 5390 0754 7034"));
        assert!(is_valid_belgian_iban("  BE68\t5390 07547034 "));
    }

    #[test]
    fn wrong_country_or_length_is_rejected() {
        assert!(!is_valid_belgian_iban(""));
        assert!(!is_valid_belgian_iban("NL91ABNA0417164300"));
        assert!(!is_valid_belgian_iban("BE6853900754703"));
        assert!(!is_valid_belgian_iban("BE685390075470345"));
        assert!(!is_valid_belgian_iban("BE68A39007547034"));
        assert!(!is_valid_belgian_iban("FR68539007547034"));
    }

    #[test]
    fn wrong_checksum_is_rejected() {
        assert!(!is_valid_belgian_iban("BE69539007547034"));
    }

    #[test]
    fn mod97_matches_direct_computation() {
        assert_eq!(mod97("539007547034111468"), Some(539007547034111468 % 97));
        assert_eq!(mod97("96"), Some(96));
        assert_eq!(mod97(""), Some(0));
    }

    #[test]
    fn letters_expand_to_two_digits() {
        assert_eq!(expand_letters("1234BE68"), "1234111468");
        assert_eq!(expand_letters("AZ"), "1035");
    }

    proptest! {
        #[test]
        fn single_digit_change_breaks_checksum(pos in 2usize..16, delta in 1u8..10) {
            let mut bytes = VALID.as_bytes().to_vec();
            let digit = bytes[pos] - b'0';
            bytes[pos] = b'0' + (digit + delta) % 10;
            let mutated = String::from_utf8(bytes).unwrap();
            prop_assert!(!is_valid_belgian_iban(&mutated));
        }

        #[test]
        fn computed_check_digits_validate(bban in "[0-9]{12}") {
            // check digits = 98 - (bban + "BE00") mod 97
            let base = format!("{bban}111400");
            let check = 98 - mod97(&base).unwrap();
            let iban = format!("BE{check:02}{bban}");
            prop_assert!(is_valid_belgian_iban(&iban));
        }

        #[test]
        fn never_panics(raw in "\\PC{0,40}") {
            let _ = is_valid_belgian_iban(&raw);
        }
    }
}

//! UID syntax (PS3.5 section 9)

use regex::Regex;
use std::sync::LazyLock;

/// Maximum UID length in bytes
pub const MAX_UID_LENGTH: usize = 64;

static UID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").expect("valid UID pattern"));

/// Check if a string is a syntactically valid UID
///
/// Components are dot-separated decimal numbers without leading zeros.
pub fn is_valid(uid: &str) -> bool {
    !uid.is_empty() && uid.len() <= MAX_UID_LENGTH && UID_PATTERN.is_match(uid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.840.10008.5.1.4.1.1.88.33", true)]
    #[case("2.25.329800735698586629295641978511506172918", true)]
    #[case("0", true)]
    #[case("", false)]
    #[case("1.2.03", false)]
    #[case("1..2", false)]
    #[case("1.2.abc", false)]
    #[case(".1.2", false)]
    fn test_uid_syntax(#[case] uid: &str, #[case] valid: bool) {
        assert_eq!(is_valid(uid), valid);
    }

    #[test]
    fn test_uid_length_limit() {
        let long = format!("1.{}", "2".repeat(63));
        assert!(!is_valid(&long));
    }
}

//! UID generation

use uuid::Uuid;

/// Generate a UID under the `2.25` root from a random UUID
///
/// The UUID is written as one decimal integer, which keeps the UID within
/// 44 characters.
pub fn generate_uid() -> String {
    format!("2.25.{}", Uuid::new_v4().as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_model::uid;

    #[test]
    fn test_generated_uids_are_valid_and_distinct() {
        let a = generate_uid();
        let b = generate_uid();
        assert!(a.starts_with("2.25."));
        assert!(uid::is_valid(&a), "{}", a);
        assert!(a.len() <= uid::MAX_UID_LENGTH);
        assert_ne!(a, b);
    }
}

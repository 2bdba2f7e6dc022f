//! Wire format of the persisted completion set: a JSON array of integers.

use lesson_core::model::LessonId;

use crate::repository::StorageError;

/// Storage key that holds the completion set.
pub const PROGRESS_KEY: &str = "r-zero-start-progress";

/// Encode ids as a JSON array, e.g. `[1,2,5]`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_ids(ids: &[LessonId]) -> Result<String, StorageError> {
    serde_json::to_string(ids).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode a JSON array of ids.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for anything that is not an array of
/// non-negative integers.
pub fn decode_ids(raw: &str) -> Result<Vec<LessonId>, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_plain_integer_array() {
        let raw = encode_ids(&[LessonId::new(1), LessonId::new(2), LessonId::new(5)]).unwrap();
        assert_eq!(raw, "[1,2,5]");
    }

    #[test]
    fn decodes_plain_integer_array() {
        let ids = decode_ids(" [3, 1] ").unwrap();
        assert_eq!(ids, vec![LessonId::new(3), LessonId::new(1)]);
    }

    #[test]
    fn rejects_non_arrays() {
        for raw in ["not json", "null", "{\"a\":1}", "[\"1\"]", "[-1]", ""] {
            assert!(decode_ids(raw).is_err(), "accepted {raw:?}");
        }
    }
}

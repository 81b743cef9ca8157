//! Memory types for mendr.
//!
//! A memory record is a text fragment the healing loop can retrieve by
//! semantic similarity. Records are append-only and identified by their
//! insertion position.

use serde::{Deserialize, Serialize};

/// A stored memory fragment.
///
/// `id` is the record's position in the memory table (dense, starting at 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: u64,
    pub text: String,
}

/// A memory returned from a nearest-neighbour search, with its L2 distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMemory {
    pub record: MemoryRecord,
    /// Euclidean distance between the query vector and the stored vector.
    pub distance: f32,
}

/// Build the memory text stored for a human-approved correction.
pub fn correction_memory_text(query: &str, corrected_answer: &str) -> String {
    format!("For a query like '{query}', a good answer is: '{corrected_answer}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_memory_text_template() {
        let text = correction_memory_text("What is Rust?", "A systems language.");
        assert_eq!(
            text,
            "For a query like 'What is Rust?', a good answer is: 'A systems language.'"
        );
    }

    #[test]
    fn test_memory_record_serde() {
        let record = MemoryRecord {
            id: 3,
            text: "remember me".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":3,"text":"remember me"}"#);
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Difficulty tier of a content item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// One level up, capped at `Advanced`.
    pub fn bump(self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate | Difficulty::Advanced => Difficulty::Advanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item eligible for selection.
///
/// Candidates come from an untrusted upstream feed. The duration is kept
/// signed so malformed entries survive deserialization and get dropped by
/// the filter instead of failing the whole feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub channel_id: String,
    pub duration_sec: i64,
    pub topic: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, with = "time::serde::timestamp::option")]
    pub published_at: Option<OffsetDateTime>,

    // Display metadata carried for the caller; never consulted by the engine.
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        duration_sec: i64,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            duration_sec,
            topic: topic.into(),
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            published_at: None,
            title: String::new(),
            channel_title: None,
            thumbnail: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_published_at(mut self, published_at: OffsetDateTime) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Case-insensitive topic match: exact topic equality or tag membership.
    pub fn matches_topic(&self, topic: &str) -> bool {
        self.topic.eq_ignore_ascii_case(topic)
            || self.tags.iter().any(|t| t.eq_ignore_ascii_case(topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_bump_caps_at_advanced() {
        assert_eq!(Difficulty::Beginner.bump(), Difficulty::Intermediate);
        assert_eq!(Difficulty::Intermediate.bump(), Difficulty::Advanced);
        assert_eq!(Difficulty::Advanced.bump(), Difficulty::Advanced);
    }

    #[test]
    fn test_matches_topic_case_insensitive() {
        let c = Candidate::new("v1", "ch1", 300, "Rust");
        assert!(c.matches_topic("rust"));
        assert!(c.matches_topic("RUST"));
        assert!(!c.matches_topic("go"));
    }

    #[test]
    fn test_matches_topic_via_tags() {
        let c = Candidate::new("v1", "ch1", 300, "systems programming")
            .with_tags(vec!["Rust".to_string(), "memory".to_string()]);
        assert!(c.matches_topic("rust"));
        assert!(c.matches_topic("Memory"));
        assert!(!c.matches_topic("python"));
    }

    #[test]
    fn test_candidate_deserializes_sparse_feed_entry() {
        // Upstream feeds routinely omit optional metadata.
        let json = r#"{"id":"v1","channel_id":"ch1","duration_sec":240,"topic":"rust"}"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.difficulty, Difficulty::Beginner);
        assert!(c.published_at.is_none());
        assert!(c.tags.is_empty());
    }
}

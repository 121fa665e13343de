use serde::{Deserialize, Serialize};

/// Smallest number of images a request may ask for
pub const MIN_REQUESTED_COUNT: u32 = 1;
/// Largest number of images a request may ask for
pub const MAX_REQUESTED_COUNT: u32 = 10;

/// Structured marketing-scene description driving prompt composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneParameters {
    pub product_type: String,
    pub theme: String,
    pub mood: String,
    pub placement: String,
    /// Free text appended to the scene description
    pub user_addition: String,
    pub aspect_ratio: String,
    /// Number of images to generate, always within `1..=10`
    pub requested_count: u32,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            product_type: "beer".to_string(),
            theme: "restaurant".to_string(),
            mood: "exciting".to_string(),
            placement: "on the table".to_string(),
            user_addition: String::new(),
            aspect_ratio: "16:9".to_string(),
            requested_count: MIN_REQUESTED_COUNT,
        }
    }
}

impl SceneParameters {
    /// Replace the requested count with a clamped value
    #[must_use]
    pub fn with_count(mut self, requested: &str) -> Self {
        self.requested_count = parse_requested_count(requested);
        self
    }
}

/// Interpret a form-supplied image count
///
/// Integers are clamped to `1..=10`; anything that is not an integer
/// falls back to a single image.
pub fn parse_requested_count(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(count) => {
            let clamped = count.clamp(i64::from(MIN_REQUESTED_COUNT), i64::from(MAX_REQUESTED_COUNT));
            u32::try_from(clamped).unwrap_or(MIN_REQUESTED_COUNT)
        }
        Err(_) => MIN_REQUESTED_COUNT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_within_range_are_kept() {
        assert_eq!(parse_requested_count("1"), 1);
        assert_eq!(parse_requested_count("4"), 4);
        assert_eq!(parse_requested_count(" 10 "), 10);
    }

    #[test]
    fn out_of_range_counts_are_clamped() {
        assert_eq!(parse_requested_count("15"), 10);
        assert_eq!(parse_requested_count("0"), 1);
        assert_eq!(parse_requested_count("-3"), 1);
        assert_eq!(parse_requested_count("99999999999999"), 10);
    }

    #[test]
    fn non_numeric_counts_fall_back_to_one() {
        assert_eq!(parse_requested_count(""), 1);
        assert_eq!(parse_requested_count("three"), 1);
        assert_eq!(parse_requested_count("2.5"), 1);
    }

    #[test]
    fn with_count_clamps() {
        let params = SceneParameters::default().with_count("15");
        assert_eq!(params.requested_count, 10);
    }
}

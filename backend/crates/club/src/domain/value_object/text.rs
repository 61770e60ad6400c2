//! Bounded text fields
//!
//! Length rules for free-text fields, counted in characters after trimming.

/// Event description: 3..=500
pub const EVENT_DESCRIPTION: TextRule = TextRule::new("Description", 3, 500);

/// Event rules: 3..=500
pub const EVENT_RULES: TextRule = TextRule::new("Rules", 3, 500);

/// Event name: 1..=120
pub const EVENT_NAME: TextRule = TextRule::new("Name", 1, 120);

/// Event venue: 1..=200
pub const EVENT_VENUE: TextRule = TextRule::new("Venue", 1, 200);

/// Testimonial description: 3..=200
pub const TESTIMONIAL_DESCRIPTION: TextRule = TextRule::new("Description", 3, 200);

/// Member name: 1..=100
pub const MEMBER_NAME: TextRule = TextRule::new("Name", 1, 100);

/// Member description: 0..=1000
pub const MEMBER_DESCRIPTION: TextRule = TextRule::new("Description", 0, 1000);

/// Photo caption: 0..=1000
pub const PHOTO_CONTENT: TextRule = TextRule::new("Content", 0, 1000);

/// Length rule for one text field
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    field: &'static str,
    min: usize,
    max: usize,
}

impl TextRule {
    pub const fn new(field: &'static str, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }

    /// Trim and check the length; the error is a user-facing message
    pub fn apply(&self, value: &str) -> Result<String, String> {
        let value = value.trim();
        let length = value.chars().count();

        if length == 0 && self.min > 0 {
            return Err(format!("{} is required", self.field));
        }
        if length < self.min {
            return Err(format!(
                "{} must be at least {} characters",
                self.field, self.min
            ));
        }
        if length > self.max {
            return Err(format!(
                "{} must be at most {} characters",
                self.field, self.max
            ));
        }

        Ok(value.to_string())
    }

    /// Apply the rule, pushing the message into `errors` on failure
    pub fn collect(&self, value: &str, errors: &mut Vec<String>) -> Option<String> {
        self.apply(value).map_err(|e| errors.push(e)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(EVENT_DESCRIPTION.apply("ab").is_err());
        assert_eq!(EVENT_DESCRIPTION.apply("  abc  ").unwrap(), "abc");
        assert!(EVENT_DESCRIPTION.apply(&"x".repeat(501)).is_err());
        assert!(TESTIMONIAL_DESCRIPTION.apply(&"x".repeat(200)).is_ok());
        assert!(TESTIMONIAL_DESCRIPTION.apply(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_required_message() {
        assert_eq!(EVENT_NAME.apply("   ").unwrap_err(), "Name is required");
        assert_eq!(MEMBER_DESCRIPTION.apply("").unwrap(), "");
    }

    #[test]
    fn test_collect() {
        let mut errors = Vec::new();
        assert!(EVENT_RULES.collect("x", &mut errors).is_none());
        assert!(EVENT_VENUE.collect("Hall A", &mut errors).is_some());
        assert_eq!(errors.len(), 1);
    }
}

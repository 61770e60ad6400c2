//! Slug Value Object
//!
//! イベント名から生成する URL 用の識別子。
//!
//! ## 生成規則
//! - NFKD 正規化後、ASCII 英数字以外（アクセント記号など）を落とす
//! - 小文字化し、空白・`-`・`_` の連続を 1 つの `-` にまとめる
//! - 先頭と末尾の `-` は除去
//! - 結果が空なら `event`

use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Fallback when the name has no usable characters
const FALLBACK_SLUG: &str = "event";

/// URL slug for an event
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from an event name
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.nfkd() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else if c.is_whitespace() || c == '-' || c == '_' {
                pending_dash = true;
            }
        }

        if slug.is_empty() {
            slug.push_str(FALLBACK_SLUG);
        }

        Self(slug)
    }

    /// Disambiguated variant: `{slug}-{millis}-{counter}`
    pub fn with_suffix(&self, millis: i64, counter: u32) -> Self {
        Self(format!("{}-{}-{}", self.0, millis, counter))
    }

    /// Create from database value (assumed already valid)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(Slug::from_name("Code Sprint 2024").as_str(), "code-sprint-2024");
        assert_eq!(Slug::from_name("  Hack__the--Night  ").as_str(), "hack-the-night");
    }

    #[test]
    fn test_strips_symbols_and_accents() {
        assert_eq!(Slug::from_name("Café & Code!").as_str(), "cafe-code");
        assert_eq!(Slug::from_name("C++ / Rust?").as_str(), "c-rust");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(Slug::from_name("!!!").as_str(), "event");
        assert_eq!(Slug::from_name("イベント").as_str(), "event");
    }

    #[test]
    fn test_suffix() {
        let slug = Slug::from_name("Quiz");
        assert_eq!(slug.with_suffix(1700000000000, 2).as_str(), "quiz-1700000000000-2");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a member profile inside the club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[default]
    Default,
    Year1,
    Year2,
    Year3,
    Coordinator,
}

impl MemberRole {
    pub const ALL: [MemberRole; 5] = [
        MemberRole::Default,
        MemberRole::Year1,
        MemberRole::Year2,
        MemberRole::Year3,
        MemberRole::Coordinator,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            MemberRole::Default => "default",
            MemberRole::Year1 => "year1",
            MemberRole::Year2 => "year2",
            MemberRole::Year3 => "year3",
            MemberRole::Coordinator => "coordinator",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Parse user input, with the error message listing valid roles
    pub fn parse(code: &str) -> Result<Self, String> {
        Self::from_code(code).ok_or_else(|| {
            "Invalid role. Must be one of: default, year1, year2, year3, coordinator".to_string()
        })
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

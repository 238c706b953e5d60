//! Age buckets
//!
//! Canonical breakpoints (inclusive upper bounds):
//!
//! | Bucket          | Ages     |
//! |-----------------|----------|
//! | early_childhood | ..=7     |
//! | youth           | 8..=17   |
//! | young_adult     | 18..=35  |
//! | midlife         | 36..=65  |
//! | wisdom_years    | 66..     |
//!
//! Ages are not validated here; negative values land in `early_childhood`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    EarlyChildhood,
    Youth,
    YoungAdult,
    Midlife,
    WisdomYears,
}

impl AgeBucket {
    /// All buckets, youngest first
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::EarlyChildhood,
        AgeBucket::Youth,
        AgeBucket::YoungAdult,
        AgeBucket::Midlife,
        AgeBucket::WisdomYears,
    ];

    pub fn for_age(age: i64) -> Self {
        match age {
            i64::MIN..=7 => AgeBucket::EarlyChildhood,
            8..=17 => AgeBucket::Youth,
            18..=35 => AgeBucket::YoungAdult,
            36..=65 => AgeBucket::Midlife,
            _ => AgeBucket::WisdomYears,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::EarlyChildhood => "early_childhood",
            AgeBucket::Youth => "youth",
            AgeBucket::YoungAdult => "young_adult",
            AgeBucket::Midlife => "midlife",
            AgeBucket::WisdomYears => "wisdom_years",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery advice for the production notes
pub fn age_considerations(age: i64) -> &'static str {
    if age <= 12 {
        "Use simple language, concrete examples, and frequent encouragement"
    } else if age <= 18 {
        "Balance guidance with independence, use relatable examples"
    } else {
        "Respect autonomy, use sophisticated examples, encourage reflection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_childhood_includes_seven() {
        assert_eq!(AgeBucket::for_age(5), AgeBucket::for_age(7));
        assert_eq!(AgeBucket::for_age(7), AgeBucket::EarlyChildhood);
        assert_eq!(AgeBucket::for_age(8), AgeBucket::Youth);
    }

    #[test]
    fn test_young_adult_midlife_boundary() {
        assert_eq!(AgeBucket::for_age(35), AgeBucket::YoungAdult);
        assert_eq!(AgeBucket::for_age(36), AgeBucket::Midlife);
        assert_ne!(AgeBucket::for_age(35), AgeBucket::for_age(36));
    }

    #[test]
    fn test_remaining_boundaries() {
        assert_eq!(AgeBucket::for_age(17), AgeBucket::Youth);
        assert_eq!(AgeBucket::for_age(18), AgeBucket::YoungAdult);
        assert_eq!(AgeBucket::for_age(65), AgeBucket::Midlife);
        assert_eq!(AgeBucket::for_age(66), AgeBucket::WisdomYears);
        assert_eq!(AgeBucket::for_age(130), AgeBucket::WisdomYears);
    }

    #[test]
    fn test_unvalidated_ages() {
        assert_eq!(AgeBucket::for_age(-4), AgeBucket::EarlyChildhood);
        assert_eq!(AgeBucket::for_age(i64::MAX), AgeBucket::WisdomYears);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for bucket in AgeBucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket.as_str()));
        }
    }

    #[test]
    fn test_age_considerations() {
        assert!(age_considerations(12).starts_with("Use simple language"));
        assert!(age_considerations(13).starts_with("Balance guidance"));
        assert!(age_considerations(19).starts_with("Respect autonomy"));
    }
}

//! Customer (CRM) row types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which identity fields (if any) a synthetic customer shares with the
/// external reference population.
///
/// Exactly `base_count` records carry one of `Triple`/`Email`/`Phone`/`None`;
/// the remaining `dup_count` records are tagged `Duplicate` and derive from a
/// `None`-category base record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlapCategory {
    /// Shares name, email and phone with a reference row.
    Triple,
    /// Shares email only.
    Email,
    /// Shares phone only.
    Phone,
    /// No shared identity fields.
    None,
    /// Near-duplicate of a `None`-category base record.
    Duplicate,
}

impl OverlapCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapCategory::Triple => "TRIPLE",
            OverlapCategory::Email => "EMAIL",
            OverlapCategory::Phone => "PHONE",
            OverlapCategory::None => "NONE",
            OverlapCategory::Duplicate => "DUPLICATE",
        }
    }

    /// True for the base (non-duplicate) categories.
    pub fn is_base(&self) -> bool {
        !matches!(self, OverlapCategory::Duplicate)
    }
}

impl fmt::Display for OverlapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown overlap category `{0}`")]
pub struct ParseCategoryError(String);

impl FromStr for OverlapCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRIPLE" => Ok(OverlapCategory::Triple),
            "EMAIL" => Ok(OverlapCategory::Email),
            "PHONE" => Ok(OverlapCategory::Phone),
            "NONE" => Ok(OverlapCategory::None),
            "DUPLICATE" => Ok(OverlapCategory::Duplicate),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// Subscription tier, cycled deterministically over the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionLevel {
    Free,
    Basic,
    Standard,
    Premium,
}

impl SubscriptionLevel {
    pub const ALL: [SubscriptionLevel; 4] = [
        SubscriptionLevel::Free,
        SubscriptionLevel::Basic,
        SubscriptionLevel::Standard,
        SubscriptionLevel::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionLevel::Free => "FREE",
            SubscriptionLevel::Basic => "BASIC",
            SubscriptionLevel::Standard => "STANDARD",
            SubscriptionLevel::Premium => "PREMIUM",
        }
    }
}

impl fmt::Display for SubscriptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic CRM row.
///
/// `customer_id` is derived from the dense 1-based row index
/// (`CUST-0000000001`); duplicate records suffix the base id with `_DUP`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    pub profession: String,
    pub date_joined: NaiveDate,
    pub subscription_level: SubscriptionLevel,
    pub overlap_category: OverlapCategory,
}

/// One row of the externally-owned reference population.
///
/// Rows where both `email` and `phone` are null are useless for overlap
/// assignment and are filtered out on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ReferenceRecord {
    /// True when the row carries at least one usable identity field.
    pub fn is_usable(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_str() {
        for cat in [
            OverlapCategory::Triple,
            OverlapCategory::Email,
            OverlapCategory::Phone,
            OverlapCategory::None,
            OverlapCategory::Duplicate,
        ] {
            assert_eq!(cat.as_str().parse::<OverlapCategory>().unwrap(), cat);
        }
        assert!("TRIPEL".parse::<OverlapCategory>().is_err());
    }

    #[test]
    fn category_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&OverlapCategory::Duplicate).unwrap();
        assert_eq!(json, "\"DUPLICATE\"");
    }

    #[test]
    fn reference_usability_requires_email_or_phone() {
        assert!(!ReferenceRecord::default().is_usable());
        let r = ReferenceRecord {
            phone: Some("06 11 22 33 44".to_string()),
            ..Default::default()
        };
        assert!(r.is_usable());
    }
}

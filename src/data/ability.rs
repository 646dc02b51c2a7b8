//! Ability records as stored in the catalog data files.
//! On disk the keys are `ability_category`, `ability_name`, `ability_type`, `description`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityCategory {
    Investigative,
    General,
}

impl AbilityCategory {
    pub const ALL: [AbilityCategory; 2] = [Self::Investigative, Self::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investigative => "investigative",
            Self::General => "general",
        }
    }

    /// Heading used on sheets and in build-point banners.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Investigative => "Investigative",
            Self::General => "General",
        }
    }
}

impl fmt::Display for AbilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ability category '{0}' (expected investigative or general)")]
pub struct UnknownCategory(pub String);

impl FromStr for AbilityCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "investigative" => Ok(Self::Investigative),
            "general" => Ok(Self::General),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// One ability from a catalog file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRecord {
    #[serde(rename = "ability_category", alias = "category")]
    pub category: AbilityCategory,
    #[serde(rename = "ability_name", alias = "name")]
    pub name: String,
    /// Subcategory shown next to investigative abilities (Academic, Interpersonal, Technical).
    #[serde(rename = "ability_type", alias = "type", default)]
    pub ability_type: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_keys() {
        let raw = r#"{"ability_category":"investigative","ability_name":"Accounting","ability_type":"Academic","description":"Money trails."}"#;
        let record: AbilityRecord = serde_json::from_str(raw).expect("record should parse");
        assert_eq!(record.category, AbilityCategory::Investigative);
        assert_eq!(record.name, "Accounting");
        assert_eq!(record.ability_type, "Academic");
    }

    #[test]
    fn accepts_short_aliases_and_missing_type() {
        let raw = r#"{"category":"general","name":"Athletics","description":"Running, jumping."}"#;
        let record: AbilityRecord = serde_json::from_str(raw).expect("record should parse");
        assert_eq!(record.category, AbilityCategory::General);
        assert_eq!(record.ability_type, "");
    }

    #[test]
    fn category_from_str_is_case_insensitive() {
        assert_eq!("General".parse::<AbilityCategory>(), Ok(AbilityCategory::General));
        assert!("occult".parse::<AbilityCategory>().is_err());
    }
}

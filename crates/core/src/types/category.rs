//! Catalog categories.

use serde::{Deserialize, Serialize};

/// Category of a catalog item.
///
/// The set is fixed; unknown values are rejected at creation and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Traditional,
    Chocolate,
    Cookies,
    Cakes,
    Candies,
    Other,
}

impl Category {
    /// All known categories, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Traditional,
        Self::Chocolate,
        Self::Cookies,
        Self::Cakes,
        Self::Candies,
        Self::Other,
    ];

    /// The canonical lowercase name, as used on the wire and in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::Chocolate => "chocolate",
            Self::Cookies => "cookies",
            Self::Cakes => "cakes",
            Self::Candies => "candies",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traditional" => Ok(Self::Traditional),
            "chocolate" => Ok(Self::Chocolate),
            "cookies" => Ok(Self::Cookies),
            "cakes" => Ok(Self::Cakes),
            "candies" => Ok(Self::Candies),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_all_known() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("savoury".parse::<Category>().is_err());
        assert!("Chocolate".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Traditional).unwrap();
        assert_eq!(json, "\"traditional\"");

        let back: Category = serde_json::from_str("\"cakes\"").unwrap();
        assert_eq!(back, Category::Cakes);
    }
}

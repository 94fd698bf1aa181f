//! Closed set of expense categories.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Fuel,
    Food,
    Maintenance,
    Wash,
    PlatformFees,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Fuel,
        ExpenseCategory::Food,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Wash,
        ExpenseCategory::PlatformFees,
        ExpenseCategory::Other,
    ];

    /// Storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Food => "food",
            Self::Maintenance => "maintenance",
            Self::Wash => "wash",
            Self::PlatformFees => "platform_fees",
            Self::Other => "other",
        }
    }

    /// Whether a liters quantity may be recorded with this category.
    #[must_use]
    pub const fn tracks_liters(self) -> bool {
        matches!(self, Self::Fuel)
    }
}

impl core::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fuel" => Ok(Self::Fuel),
            "food" => Ok(Self::Food),
            "maintenance" => Ok(Self::Maintenance),
            "wash" | "car_wash" => Ok(Self::Wash),
            "platform_fees" | "platform-fees" | "fees" => Ok(Self::PlatformFees),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_codes_round_trip() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::try_from(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn only_fuel_tracks_liters() {
        let tracked: Vec<_> = ExpenseCategory::ALL
            .into_iter()
            .filter(|c| c.tracks_liters())
            .collect();
        assert_eq!(tracked, vec![ExpenseCategory::Fuel]);
    }
}

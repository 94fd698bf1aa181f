use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Ride-hailing platform an earning was received from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Uber,
    NinetyNine,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Uber, Platform::NinetyNine, Platform::Other];

    /// Platforms an earnings edit always writes one record for.
    pub const EDITABLE: [Platform; 2] = [Platform::Uber, Platform::NinetyNine];

    /// Storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uber => "uber",
            Self::NinetyNine => "ninety_nine",
            Self::Other => "other",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uber => "Uber",
            Self::NinetyNine => "99",
            Self::Other => "Other",
        }
    }
}

impl core::fmt::Display for Platform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Platform {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uber" => Ok(Self::Uber),
            "ninety_nine" | "ninetynine" | "ninety-nine" | "99" => Ok(Self::NinetyNine),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_aliases() {
        for platform in Platform::ALL {
            assert_eq!(Platform::try_from(platform.as_str()), Ok(platform));
        }
        assert_eq!(Platform::try_from("99"), Ok(Platform::NinetyNine));
        assert_eq!(Platform::try_from(" UBER "), Ok(Platform::Uber));
        assert_eq!(
            Platform::try_from("lyft"),
            Err(ValidationError::UnknownPlatform("lyft".to_string()))
        );
    }
}

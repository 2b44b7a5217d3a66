use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// An audience-specific subset of the drawing register.
///
/// Membership is non-exclusive: a document can be issued to several
/// audiences at once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    /// Documents issued to the client.
    ForClient,
    /// Documents issued to the precast manufacturer.
    ForManufacture,
    /// Documents issued to the installation crew.
    ForInstallation,
}

impl Package {
    /// Every package, in rendering order.
    pub const ALL: [Self; 3] = [Self::ForClient, Self::ForManufacture, Self::ForInstallation];

    /// Returns the stable key used in filenames and configuration.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ForClient => "for_client",
            Self::ForManufacture => "for_manufacture",
            Self::ForInstallation => "for_installation",
        }
    }

    /// Returns the display title used in rendered reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ForClient => "For client",
            Self::ForManufacture => "For manufacture",
            Self::ForInstallation => "For installation",
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known package.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown package '{0}': expected one of for_client, for_manufacture, for_installation")]
pub struct UnknownPackageError(String);

impl FromStr for Package {
    type Err = UnknownPackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|package| package.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPackageError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrips_through_from_str() {
        for package in Package::ALL {
            assert_eq!(package.key().parse::<Package>(), Ok(package));
        }
    }

    #[test]
    fn from_str_ignores_case() {
        assert_eq!("FOR_CLIENT".parse::<Package>(), Ok(Package::ForClient));
    }

    #[test]
    fn unknown_package_is_rejected() {
        let error = "for_everyone".parse::<Package>().unwrap_err();
        assert!(error.to_string().starts_with("Unknown package 'for_everyone'"));
    }

    #[test]
    fn serde_uses_keys() {
        let json = serde_json::to_string(&Package::ForManufacture).unwrap();
        assert_eq!(json, "\"for_manufacture\"");
    }
}

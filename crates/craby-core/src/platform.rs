use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A host platform whose target triples are packaged into one multi-architecture bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Android,
    Ios,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform family `{0}` (expected `android` or `ios`)")]
pub struct UnknownPlatform(pub String);

impl PlatformFamily {
    pub const ALL: [PlatformFamily; 2] = [PlatformFamily::Android, PlatformFamily::Ios];

    pub fn name(self) -> &'static str {
        match self {
            PlatformFamily::Android => "android",
            PlatformFamily::Ios => "ios",
        }
    }

    /// Whether module discovery on this family needs the prepare handshake.
    ///
    /// Android resolves TurboModules before the app's files directory is known to the
    /// binding layer, so a synthetic lookup has to deliver it first.
    pub fn requires_bootstrap(self) -> bool {
        matches!(self, PlatformFamily::Android)
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlatformFamily {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(PlatformFamily::Android),
            "ios" => Ok(PlatformFamily::Ios),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

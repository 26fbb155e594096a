//! Error types for ImpactSonic

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpactSonicError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No clip mapped for material '{0}'")]
    MissingClip(String),

    #[error("No middleware event resolved for material '{material}' ({path})")]
    MissingEvent { material: String, path: String },

    #[error("Clip '{clip}' references material '{material}' which is not in the materials list")]
    UnknownMaterial { clip: String, material: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ImpactSonicError {
    /// Material the error refers to, if any.
    pub fn material(&self) -> Option<&str> {
        match self {
            Self::MissingClip(material)
            | Self::MissingEvent { material, .. }
            | Self::UnknownMaterial { material, .. } => Some(material),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImpactSonicError>;

//! Error types for settings parsing, validation and loading.

use thiserror::Error;

/// Errors raised at the settings boundary.
///
/// Simulation code itself never fails; every fallible input is checked
/// here before it can reach a [`crate::config::Settings`] value.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The control name does not match any setting.
    #[error("unknown setting `{name}`")]
    UnknownSetting {
        /// Name as given by the caller
        name: String,
    },

    /// The raw value could not be parsed as the setting's type.
    #[error("cannot parse `{raw}` for `{name}`: {reason}")]
    Parse {
        /// Setting name
        name: &'static str,
        /// Raw input text
        raw: String,
        /// Parser message
        reason: String,
    },

    /// NaN or infinite numbers are rejected rather than clamped.
    #[error("`{name}` must be finite, got {value}")]
    NonFinite {
        /// Setting name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Colour strings must be `#rrggbb`.
    #[error("invalid colour `{raw}`, expected #rrggbb")]
    InvalidColor {
        /// Raw input text
        raw: String,
    },

    /// A settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// A settings file is not valid JSON for [`crate::config::Settings`].
    #[error("malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
}

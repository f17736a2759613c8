//! Oracle error types.

use std::fmt;
use thiserror::Error;

/// Result type for oracle queries.
pub type ItmResult<T> = Result<T, ItmError>;

/// A [`LinkParameters`](crate::LinkParameters) input the model refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkInput {
    TxHeight,
    RxHeight,
    Climate,
    TimePct,
    LocationPct,
    SituationPct,
    SurfaceRefractivity,
    Frequency,
    Polarization,
    GroundPermittivity,
    GroundConductivity,
    Mdvar,
}

impl LinkInput {
    /// Map an ITM input-validation return code.
    fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1000 => Self::TxHeight,
            1001 => Self::RxHeight,
            1002 => Self::Climate,
            1003 => Self::TimePct,
            1004 => Self::LocationPct,
            1005 => Self::SituationPct,
            1008 => Self::SurfaceRefractivity,
            1009 => Self::Frequency,
            1010 => Self::Polarization,
            1011 => Self::GroundPermittivity,
            1012 => Self::GroundConductivity,
            1013 => Self::Mdvar,
            _ => return None,
        })
    }

    /// Field name in `LinkParameters` and its accepted range.
    pub fn describe(self) -> (&'static str, &'static str) {
        match self {
            Self::TxHeight => ("tx_height_m", "0.5 to 3000 m"),
            Self::RxHeight => ("rx_height_m", "0.5 to 3000 m"),
            Self::Climate => ("climate", "one of the seven radio climates"),
            Self::TimePct => ("time_pct", "0 < time < 100"),
            Self::LocationPct => ("location_pct", "0 < location < 100"),
            Self::SituationPct => ("situation_pct", "0 < situation < 100"),
            Self::SurfaceRefractivity => ("surface_refractivity", "250 to 400 N-units"),
            Self::Frequency => ("frequency_mhz", "20 to 20000 MHz"),
            Self::Polarization => ("polarization", "horizontal or vertical"),
            Self::GroundPermittivity => ("ground_permittivity", "> 1"),
            Self::GroundConductivity => ("ground_conductivity", "> 0"),
            Self::Mdvar => ("mdvar", "a supported variability mode"),
        }
    }
}

impl fmt::Display for LinkInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (field, range) = self.describe();
        write!(f, "{field} (expected {range})")
    }
}

/// Why an oracle query produced no loss.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItmError {
    #[error("ITM library not found; set MESHRF_ITM_LIBRARY or put it on the loader path")]
    LibraryNotFound,

    #[error("Failed to load ITM library: {0}")]
    LoadError(String),

    #[error("Symbol not found in ITM library: {0}")]
    SymbolNotFound(String),

    /// A link parameter is outside the model's validity range.
    #[error("Link parameter out of range: {0}")]
    InvalidInput(LinkInput),

    /// The path is too short or too long for the model.
    #[error("Path distance out of range")]
    DistanceOutOfRange,

    /// The PFL array is malformed.
    #[error("Invalid terrain profile")]
    InvalidTerrainProfile,

    #[error("ITM error code: {0}")]
    Unknown(i32),
}

impl ItmError {
    /// Translate a failing ITM return code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1014 => Self::DistanceOutOfRange,
            1018 => Self::InvalidTerrainProfile,
            _ => LinkInput::from_code(code).map_or(Self::Unknown(code), Self::InvalidInput),
        }
    }
}

//! Link parameters, terrain profiles and query results.

/// Radio climate zone. Discriminants are the codes ITM expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(i32)]
pub enum Climate {
    Equatorial = 1,
    ContinentalSubtropical = 2,
    MaritimeSubtropical = 3,
    Desert = 4,
    ContinentalTemperate = 5,
    MaritimeTemperateOverLand = 6,
    MaritimeTemperateOverSea = 7,
}

/// Antenna polarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(i32)]
pub enum Polarization {
    Horizontal = 0,
    Vertical = 1,
}

/// How the time/location/situation percentiles are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(i32)]
pub enum VariabilityMode {
    SingleMessage = 0,
    Accidental = 1,
    Mobile = 2,
    Broadcast = 3,
}

/// ITM `mdvar`: a variability mode plus optional elimination of the
/// location and situation variabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModeOfVariability {
    pub mode: VariabilityMode,
    pub eliminate_location: bool,
    pub eliminate_situation: bool,
}

impl ModeOfVariability {
    /// Mode with both variabilities kept.
    pub const fn new(mode: VariabilityMode) -> Self {
        Self {
            mode,
            eliminate_location: false,
            eliminate_situation: false,
        }
    }

    /// Integer code passed to ITM.
    pub const fn code(self) -> i32 {
        let mut code = self.mode as i32;
        if self.eliminate_location {
            code += 10;
        }
        if self.eliminate_situation {
            code += 20;
        }
        code
    }
}

/// Mobile mode with location variability eliminated (`mdvar` 12).
impl Default for ModeOfVariability {
    fn default() -> Self {
        Self {
            eliminate_location: true,
            ..Self::new(VariabilityMode::Mobile)
        }
    }
}

impl From<ModeOfVariability> for i32 {
    fn from(mdvar: ModeOfVariability) -> i32 {
        mdvar.code()
    }
}

/// Caveat bits attached to a successful loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItmWarnings(i32);

impl ItmWarnings {
    /// A terminal height was clamped to the model's range.
    pub const TX_HEIGHT_CLAMPED: i32 = 0x0001;
    pub const RX_HEIGHT_CLAMPED: i32 = 0x0002;
    /// Frequency outside the calibrated band.
    pub const FREQUENCY_EXTRAPOLATED: i32 = 0x0004;
    /// Path shorter than the model is calibrated for.
    pub const SHORT_PATH: i32 = 0x0008;

    pub fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn has_warnings(self) -> bool {
        self.0 != 0
    }

    /// Whether every bit of `flag` is set.
    pub fn contains(self, flag: i32) -> bool {
        self.0 & flag == flag
    }
}

/// Status of a successful oracle query.
///
/// Failures are reported as `Err(ItmError)` instead of a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossStatus {
    /// The loss was computed without caveats.
    Success,
    /// The loss is usable but the model flagged extrapolation or clamping.
    SuccessWithWarning,
}

/// Path loss returned by a [`PropagationOracle`](crate::PropagationOracle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLoss {
    /// Basic transmission loss (dB).
    pub loss_db: f64,
    pub warnings: ItmWarnings,
}

impl PathLoss {
    /// Create a warning-free result.
    pub fn new(loss_db: f64) -> Self {
        Self {
            loss_db,
            warnings: ItmWarnings::default(),
        }
    }

    pub fn status(&self) -> LossStatus {
        if self.warnings.has_warnings() {
            LossStatus::SuccessWithWarning
        } else {
            LossStatus::Success
        }
    }
}

/// Link parameters handed to the propagation oracle with every query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkParameters {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f64,
    /// Transmitter antenna height above ground (meters).
    pub tx_height_m: f64,
    /// Receiver antenna height above ground (meters).
    pub rx_height_m: f64,
    pub polarization: Polarization,
    pub climate: Climate,
    /// Surface refractivity N₀ (N-units).
    pub surface_refractivity: f64,
    /// Relative permittivity of the ground.
    pub ground_permittivity: f64,
    /// Ground conductivity (S/m).
    pub ground_conductivity: f64,
    pub mdvar: ModeOfVariability,
    /// Time reliability percentile, strictly between 0 and 100.
    pub time_pct: f64,
    /// Location reliability percentile, strictly between 0 and 100.
    pub location_pct: f64,
    /// Situation confidence percentile, strictly between 0 and 100.
    pub situation_pct: f64,
}

impl Default for LinkParameters {
    fn default() -> Self {
        Self {
            frequency_mhz: 915.0,
            tx_height_m: 10.0,
            rx_height_m: 2.0,
            polarization: Polarization::Vertical,
            climate: Climate::ContinentalTemperate,
            surface_refractivity: 301.0,
            // average ground
            ground_permittivity: 15.0,
            ground_conductivity: 0.005,
            mdvar: ModeOfVariability::default(),
            time_pct: 50.0,
            location_pct: 50.0,
            situation_pct: 50.0,
        }
    }
}

/// Elevation samples at a fixed spacing, transmitter first.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainProfile {
    step_m: f64,
    elevations: Vec<f64>,
}

impl TerrainProfile {
    /// Empty profile with the given sample spacing.
    pub fn new(step_m: f64) -> Self {
        Self::from_elevations(step_m, &[])
    }

    pub fn from_elevations(step_m: f64, elevations: &[f64]) -> Self {
        Self {
            step_m,
            elevations: elevations.to_vec(),
        }
    }

    pub fn push(&mut self, elevation_m: f64) {
        self.elevations.push(elevation_m);
    }

    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    /// Spacing between consecutive samples (meters).
    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    /// Ground distance from the first to the last sample (meters).
    pub fn length_m(&self) -> f64 {
        self.elevations.len().saturating_sub(1) as f64 * self.step_m
    }

    /// PFL array: `[intervals, step_m, z0, z1, ...]` where `intervals` is the
    /// sample count minus one.
    pub fn to_pfl(&self) -> Vec<f64> {
        let intervals = self.elevations.len().saturating_sub(1) as f64;
        [intervals, self.step_m]
            .into_iter()
            .chain(self.elevations.iter().copied())
            .collect()
    }
}

/// Check that a PFL array is self-consistent.
///
/// The header must announce exactly as many intervals as there are elevation
/// samples after it, with at least one interval and a positive step.
pub fn validate_pfl(pfl: &[f64]) -> bool {
    let [intervals, step, ..] = *pfl else {
        return false;
    };
    pfl.len() >= 4
        && intervals.fract() == 0.0
        && intervals >= 1.0
        && intervals as usize + 3 == pfl.len()
        && step.is_finite()
        && step > 0.0
}

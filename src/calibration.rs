//! Linear sensor calibration
//!
//! Raw readings are corrected with an additive offset (pH, turbidity) or a
//! multiplier (TDS). The same three values can be provisioned at build time or
//! fetched from the backend settings document the companion app writes.

use serde::{Deserialize, Serialize};

use crate::validate::is_usable_multiplier;

#[derive(Debug, PartialEq)]
pub enum CalibrationError {
    NonFiniteOffset,
    UnusableMultiplier,
    InvalidJson,
    BufferTooSmall,
}

/// Calibration constants for the three water quality sensors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Added to the raw pH reading
    pub ph_offset: f32,
    /// Multiplies the raw TDS reading
    pub tds_multiplier: f32,
    /// Added to the raw turbidity reading
    pub turbidity_offset: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Uncalibrated sensor output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawReading {
    pub ph: f32,
    pub tds: f32,
    pub turbidity: f32,
}

/// Calibrated measurement (pH units, TDS ppm, turbidity NTU)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    pub ph: f32,
    pub tds: f32,
    pub turbidity: f32,
}

impl Calibration {
    /// Leaves every reading unchanged
    pub const IDENTITY: Calibration = Calibration::new(0.0, 1.0, 0.0);

    pub const fn new(ph_offset: f32, tds_multiplier: f32, turbidity_offset: f32) -> Self {
        Self {
            ph_offset,
            tds_multiplier,
            turbidity_offset,
        }
    }

    pub fn ph(&self, raw: f32) -> f32 {
        raw + self.ph_offset
    }

    pub fn tds(&self, raw: f32) -> f32 {
        raw * self.tds_multiplier
    }

    pub fn turbidity(&self, raw: f32) -> f32 {
        raw + self.turbidity_offset
    }

    pub fn apply(&self, raw: RawReading) -> Reading {
        Reading {
            ph: self.ph(raw.ph),
            tds: self.tds(raw.tds),
            turbidity: self.turbidity(raw.turbidity),
        }
    }

    /// A zero multiplier would zero out every TDS reading.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !self.ph_offset.is_finite() || !self.turbidity_offset.is_finite() {
            return Err(CalibrationError::NonFiniteOffset);
        }
        if !is_usable_multiplier(self.tds_multiplier) {
            return Err(CalibrationError::UnusableMultiplier);
        }
        Ok(())
    }

    /// Parse the calibration settings document stored by the backend, e.g.
    /// `{"ph_offset":0.5,"tds_multiplier":1.02,"turbidity_offset":-0.3}`.
    ///
    /// Missing keys keep their identity value. The result is validated before
    /// it is returned.
    pub fn from_settings_json(json: &[u8]) -> Result<Self, CalibrationError> {
        let (calibration, _) = serde_json_core::from_slice::<Calibration>(json).map_err(|e| {
            log::error!("Invalid calibration document: {:?}", e);
            CalibrationError::InvalidJson
        })?;

        calibration.validate()?;

        log::info!(
            "Calibration loaded: ph_offset={} tds_multiplier={} turbidity_offset={}",
            calibration.ph_offset,
            calibration.tds_multiplier,
            calibration.turbidity_offset
        );

        Ok(calibration)
    }

    /// Serialize into the backend settings document format.
    pub fn to_settings_json(&self, buf: &mut [u8]) -> Result<usize, CalibrationError> {
        serde_json_core::to_slice(self, buf).map_err(|_| CalibrationError::BufferTooSmall)
    }
}

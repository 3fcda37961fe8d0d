//! Layout model
//!
//! Placement and colour recommendations produced by the layout analyzer
//! and consumed immediately by the banner compositor.

use serde::{Deserialize, Serialize};
use crate::utils::errors::AnalysisError;

/// Pixel coordinates on the banner canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Recommended text and logo layout for one banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub text_placement: Placement,
    pub text_color: String,
    pub logo_placement: Placement,
}

#[derive(Debug, Deserialize)]
struct RawPlacement {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    text_placement: RawPlacement,
    text_color: String,
    logo_placement: RawPlacement,
}

impl RawPlacement {
    fn into_placement(self, field: &str) -> Result<Placement, AnalysisError> {
        let coordinate = |value: f64, axis: &str| {
            if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
                return Err(AnalysisError::InvalidLayout(format!(
                    "{}.{} is not a pixel coordinate: {}",
                    field, axis, value
                )));
            }
            Ok(value.round() as u32)
        };

        Ok(Placement {
            x: coordinate(self.x, "x")?,
            y: coordinate(self.y, "y")?,
        })
    }
}

impl Layout {
    /// Build a layout from the model's parsed JSON response
    pub fn from_value(value: serde_json::Value) -> Result<Self, AnalysisError> {
        let raw: RawLayout = serde_json::from_value(value)
            .map_err(|e| AnalysisError::InvalidLayout(e.to_string()))?;

        Ok(Self {
            text_placement: raw.text_placement.into_placement("text_placement")?,
            text_color: raw.text_color,
            logo_placement: raw.logo_placement.into_placement("logo_placement")?,
        })
    }
}

//! Caller-supplied ink strokes
//!
//! A stroke is a colored polyline in page user space. The JSON shape matches
//! what browser signature pads post: `{"color": {"r", "g", "b"}, "curve": [{"x", "y"}]}`.

use serde::{Deserialize, Serialize};

use crate::error::SignError;

/// RGB color with each channel normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    fn channels(&self) -> [(&'static str, f64); 3] {
        [("r", self.r), ("g", self.g), ("b", self.b)]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One freehand stroke to paint onto a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub color: Rgb,
    #[serde(alias = "curve")]
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(color: Rgb, points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self {
            color,
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// A single point cannot form a path; such strokes paint nothing.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Check the stroke can be encoded. `index` is its position in the
    /// caller's list and is carried into the error.
    pub fn validate(&self, index: usize) -> Result<(), SignError> {
        let invalid = |reason: String| SignError::InvalidStroke { index, reason };

        if self.points.is_empty() {
            return Err(invalid("stroke has no points".to_string()));
        }

        for (name, value) in self.color.channels() {
            // NaN fails the range check too
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!(
                    "color channel {} = {} is outside [0, 1]",
                    name, value
                )));
            }
        }

        if let Some((i, p)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| !fits_real(p.x) || !fits_real(p.y))
        {
            return Err(invalid(format!(
                "point {} ({}, {}) is not a finite single-precision coordinate",
                i, p.x, p.y
            )));
        }

        Ok(())
    }
}

/// Coordinates are written as f32 reals; anything that narrows to an
/// infinity has no PDF number syntax.
fn fits_real(value: f64) -> bool {
    (value as f32).is_finite()
}

/// Validate every stroke up front, reporting the first failure.
pub fn validate_strokes(strokes: &[Stroke]) -> Result<(), SignError> {
    strokes
        .iter()
        .enumerate()
        .try_for_each(|(i, stroke)| stroke.validate(i))
}

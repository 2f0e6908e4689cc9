use serde::Serialize;

/// Fixed conversion factor between the two units the scale reports.
pub const LB_PER_KG: f64 = 2.20462;

/// A decoded weight sample, carried in both units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightReading {
    pub kilograms: f64,
    pub pounds: f64,
}

impl WeightReading {
    pub fn from_pounds(pounds: f64) -> Self {
        Self {
            kilograms: pounds / LB_PER_KG,
            pounds,
        }
    }

    pub fn from_kilograms(kilograms: f64) -> Self {
        Self {
            kilograms,
            pounds: kilograms * LB_PER_KG,
        }
    }
}

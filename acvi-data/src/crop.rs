use serde::{Deserialize, Serialize};

/// Crops with calibrated stress thresholds.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Wheat,
    Maize,
}

impl Crop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Wheat => "wheat",
            Crop::Maize => "maize",
        }
    }

    pub fn from_name(name: &str) -> Option<Crop> {
        match name {
            "wheat" => Some(Crop::Wheat),
            "maize" => Some(Crop::Maize),
            _ => None,
        }
    }

    pub fn thresholds(&self) -> CropThresholds {
        match self {
            Crop::Wheat => CropThresholds::wheat(),
            Crop::Maize => CropThresholds::maize(),
        }
    }
}

/// Crop-specific temperature thresholds, all in degrees Celsius.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CropThresholds {
    /// Daily maximum above which a day counts as heat-stressed
    pub heat_stress_temp: f64,
    pub optimal_temp: f64,
    /// Base temperature for growing-degree-day accumulation
    pub base_temp: f64,
    pub max_temp: f64,
    /// Daily minimum below which a day counts as a frost day
    pub frost_temp: f64,
}

impl CropThresholds {
    pub const fn wheat() -> Self {
        CropThresholds {
            heat_stress_temp: 30.0,
            optimal_temp: 20.0,
            base_temp: 0.0,
            max_temp: 35.0,
            frost_temp: 0.0,
        }
    }

    pub const fn maize() -> Self {
        CropThresholds {
            heat_stress_temp: 35.0,
            optimal_temp: 25.0,
            base_temp: 10.0,
            max_temp: 40.0,
            frost_temp: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_lookup() {
        assert_eq!(Crop::from_name("wheat"), Some(Crop::Wheat));
        assert_eq!(Crop::from_name("rice"), None);
        assert_eq!(Crop::Maize.thresholds().heat_stress_temp, 35.0);
        assert_eq!(Crop::Wheat.thresholds().base_temp, 0.0);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named daily climate parameter.
///
/// The first eight are base parameters supplied by the data-acquisition
/// collaborator; the rest are derived fields appended once by the series
/// processing step. The string form of each variant is also its CSV column
/// name.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    TemperatureRange,
    Precipitation,
    SoilMoisture,
    Evapotranspiration,
    Humidity,
    MaxWind,
    SolarRadiation,
    DegreeDays,
    VaporPressureDeficit,
    DryDay,
    DrySpellLength,
    HeatDay,
    FrostDay,
}

impl Parameter {
    /// Base parameters expected from the external data source.
    pub const BASE: [Parameter; 8] = [
        Parameter::Temperature,
        Parameter::TemperatureRange,
        Parameter::Precipitation,
        Parameter::SoilMoisture,
        Parameter::Evapotranspiration,
        Parameter::Humidity,
        Parameter::MaxWind,
        Parameter::SolarRadiation,
    ];

    /// Parameters a location must carry to survive quality screening.
    pub const REQUIRED: [Parameter; 3] = [
        Parameter::Temperature,
        Parameter::Precipitation,
        Parameter::SoilMoisture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::TemperatureRange => "temperature_range",
            Parameter::Precipitation => "precipitation",
            Parameter::SoilMoisture => "soil_moisture",
            Parameter::Evapotranspiration => "evapotranspiration",
            Parameter::Humidity => "humidity",
            Parameter::MaxWind => "max_wind",
            Parameter::SolarRadiation => "solar_radiation",
            Parameter::DegreeDays => "degree_days",
            Parameter::VaporPressureDeficit => "vapor_pressure_deficit",
            Parameter::DryDay => "dry_day",
            Parameter::DrySpellLength => "dry_spell_length",
            Parameter::HeatDay => "heat_day",
            Parameter::FrostDay => "frost_day",
        }
    }

    /// Look up a parameter by its column name.
    pub fn from_name(name: &str) -> Option<Parameter> {
        let all = [
            Parameter::Temperature,
            Parameter::TemperatureRange,
            Parameter::Precipitation,
            Parameter::SoilMoisture,
            Parameter::Evapotranspiration,
            Parameter::Humidity,
            Parameter::MaxWind,
            Parameter::SolarRadiation,
            Parameter::DegreeDays,
            Parameter::VaporPressureDeficit,
            Parameter::DryDay,
            Parameter::DrySpellLength,
            Parameter::HeatDay,
            Parameter::FrostDay,
        ];
        all.into_iter().find(|p| p.as_str() == name)
    }

    /// True for fields computed by the series processing step rather than
    /// supplied by the data source.
    pub fn is_derived(&self) -> bool {
        !Parameter::BASE.contains(self)
    }

    /// Physically plausible value range for a base parameter, used to screen
    /// sensor glitches before any derivation. Derived fields have no limits.
    pub fn physical_limits(&self) -> Option<(f64, f64)> {
        match self {
            Parameter::Temperature => Some((-60.0, 60.0)),
            Parameter::TemperatureRange => Some((0.0, 50.0)),
            Parameter::Precipitation => Some((0.0, 500.0)),
            Parameter::SoilMoisture => Some((0.0, 1.0)),
            Parameter::Evapotranspiration => Some((0.0, 20.0)),
            Parameter::Humidity => Some((0.0, 100.0)),
            Parameter::MaxWind => Some((0.0, 60.0)),
            Parameter::SolarRadiation => Some((0.0, 50.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Parameter;

    #[test]
    fn test_name_round_trip() {
        for p in Parameter::BASE {
            assert_eq!(Parameter::from_name(p.as_str()), Some(p));
        }
        assert_eq!(
            Parameter::from_name("vapor_pressure_deficit"),
            Some(Parameter::VaporPressureDeficit)
        );
        assert_eq!(Parameter::from_name("nonsense"), None);
    }

    #[test]
    fn test_derived_flags() {
        assert!(!Parameter::Temperature.is_derived());
        assert!(Parameter::DegreeDays.is_derived());
        assert!(Parameter::DegreeDays.physical_limits().is_none());
    }
}

use crate::parameter::Parameter;
use crate::series::TimeSeries;
use std::collections::BTreeMap;

/// Which parameters a location actually carries, and how complete each is.
///
/// Computed once per location so that signal selection downstream checks a
/// single record instead of probing the series repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCoverage {
    missing: BTreeMap<Parameter, f64>,
}

impl ParameterCoverage {
    pub fn has(&self, parameter: Parameter) -> bool {
        self.missing.contains_key(&parameter)
    }

    /// Missing fraction for a present parameter, `None` when absent.
    pub fn missing_fraction(&self, parameter: Parameter) -> Option<f64> {
        self.missing.get(&parameter).copied()
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.missing.keys().copied()
    }
}

impl From<&TimeSeries> for ParameterCoverage {
    fn from(series: &TimeSeries) -> Self {
        let mut missing = BTreeMap::new();
        for parameter in series.parameters() {
            if let Some(fraction) = series.missing_fraction(parameter) {
                missing.insert(parameter, fraction);
            }
        }
        ParameterCoverage { missing }
    }
}

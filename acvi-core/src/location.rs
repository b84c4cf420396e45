use crate::series::TimeSeries;

/// One geographic location and its daily climate record.
///
/// The identifier is a stable, globally unique string key (e.g.
/// "UA_Poltava"). Records are treated as immutable once constructed.
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub series: TimeSeries,
}

impl LocationRecord {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, series: TimeSeries) -> Self {
        LocationRecord {
            id: id.into(),
            latitude,
            longitude,
            series,
        }
    }
}

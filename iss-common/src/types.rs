use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Public address of the machine, as reported by the IP echo service.
///
/// Kept as text: dotted-quad, IPv6 or whatever the service hands back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpAddress(String);

impl IpAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IpAddress {
    fn from(addr: String) -> Self {
        Self(addr)
    }
}

impl From<&str> for IpAddress {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

/// Observer position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// One predicted overhead pass of the ISS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassEvent {
    /// Unix timestamp (seconds) at which the station rises above the horizon
    pub risetime: i64,
    /// How long the station stays visible, in seconds
    pub duration: u64,
}

impl PassEvent {
    pub fn new(risetime: i64, duration: u64) -> Self {
        Self { risetime, duration }
    }

    /// Rise time as a UTC timestamp, `None` if outside chrono's range.
    pub fn rise_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.risetime, 0).single()
    }

    /// Moment the station drops below the horizon again, `None` on overflow
    pub fn set_time(&self) -> Option<DateTime<Utc>> {
        let duration = i64::try_from(self.duration).ok()?;
        let visible = chrono::Duration::try_seconds(duration)?;
        self.rise_time()?.checked_add_signed(visible)
    }

    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.duration)
    }
}

/// Ordered pass predictions, in the order the prediction service returned them.
pub type PassEventSequence = Vec<PassEvent>;

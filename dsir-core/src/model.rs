use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters of a `/data` request.
#[derive(Debug, Clone, PartialEq)]
pub struct RainQuery {
    pub address: String,
    /// Lower bound on what counts as rain; interpreted by the server.
    pub threshold: f64,
}

impl RainQuery {
    pub fn new(address: impl Into<String>, threshold: f64) -> Self {
        Self { address: address.into(), threshold }
    }

    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [("address", self.address.clone()), ("threshold", self.threshold.to_string())]
    }
}

/// Successful `/data` payload.
///
/// The body is kept exactly as the server sent it; that value is what the
/// templates receive. The accessors only read from it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RainResult(Value);

impl RainResult {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn precip(&self) -> Option<f64> {
        self.0.get("precip").and_then(Value::as_f64)
    }

    /// Days since it rained.
    pub fn dsir(&self) -> Option<f64> {
        self.0.get("dsir").and_then(Value::as_f64)
    }

    /// Formatted address of the resolved location.
    pub fn address(&self) -> Option<&str> {
        self.0.get("address").and_then(Value::as_str)
    }

    /// ISO date of the last rain day.
    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    /// True when some precipitation was recorded. A missing or non-numeric field counts as none.
    pub fn has_precip(&self) -> bool {
        self.precip().is_some_and(|p| p > 0.0)
    }
}

/// Parameters of a `/historydata` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub airport: String,
    pub date: String,
}

impl HistoryQuery {
    pub fn new(airport: impl Into<String>, date: impl Into<String>) -> Self {
        Self { airport: airport.into(), date: date.into() }
    }

    pub fn to_params(&self) -> [(&'static str, &str); 2] {
        [("airport", self.airport.as_str()), ("date", self.date.as_str())]
    }
}

/// `/historydata` payload, handed to the history template untouched.
pub type HistoryResult = Value;

/// Body of a failed `/data` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ErrorPayload {
    pub fn reason(&self) -> FailureReason {
        FailureReason::from(self.message.as_str())
    }
}

/// Server-supplied reason for a failed rain lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NoResults,
    NoLocation,
    NoRain,
    Other(String),
    /// The failure carried no reason at all: no body, a non-JSON body, or no response.
    Unrecognised,
}

impl From<&str> for FailureReason {
    fn from(message: &str) -> Self {
        match message {
            "no results" => FailureReason::NoResults,
            "no location" => FailureReason::NoLocation,
            "no rain" => FailureReason::NoRain,
            other => FailureReason::Other(other.to_string()),
        }
    }
}

/// Parse a user supplied threshold, falling back to 0 when it is not a number.
pub fn parse_threshold(raw: &str) -> f64 {
    raw.trim().parse::<f64>().ok().filter(|t| t.is_finite()).unwrap_or(0.0)
}

///! ISS pass predictions via the open-notify style `iss-pass.json` API

use async_trait::async_trait;
use iss_common::{Coordinates, PassEvent, PassEventSequence};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::response::{fetch, field_is_not, validate};
use crate::error::{LookupResult, Stage};

/// Number of passes requested when nothing else is configured
pub const DEFAULT_PASS_COUNT: u32 = 5;

/// Largest `n` the prediction service accepts
pub const MAX_PASS_COUNT: u32 = 100;

/// Raw JSON returned by the prediction service
#[derive(Debug, Deserialize)]
struct PassResponse {
    // Never read; makes a body without `message` a parse error
    #[allow(dead_code)]
    message: String,
    response: Vec<PassEvent>,
}

fn pass_failed(body: &Value) -> bool {
    field_is_not(body, "message", "success")
}

#[async_trait]
pub trait PassLookup: Send + Sync {
    /// Upcoming passes over `coords`, soonest first as the service orders them
    async fn passes(&self, coords: Coordinates) -> LookupResult<PassEventSequence>;
}

/// HTTP client for the pass prediction service
#[derive(Debug, Clone)]
pub struct PassClient {
    client: Client,
    base_url: String,
    count: u32,
}

impl PassClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            count: DEFAULT_PASS_COUNT,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn lookup_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/iss-pass.json?lat={}&lon={}&n={}",
            self.base_url.trim_end_matches('/'),
            coords.latitude,
            coords.longitude,
            self.count
        )
    }
}

#[async_trait]
impl PassLookup for PassClient {
    async fn passes(&self, coords: Coordinates) -> LookupResult<PassEventSequence> {
        let url = self.lookup_url(coords);
        let (status, body) = fetch(&self.client, Stage::Passes, &url).await?;
        parse_pass_response(status, body, self.count)
    }
}

/// Keeps at most `count` passes.
fn parse_pass_response(status: u16, body: String, count: u32) -> LookupResult<PassEventSequence> {
    let resp: PassResponse = validate(Stage::Passes, status, body, pass_failed)?;
    Ok(bounded(resp.response, count))
}

fn bounded(mut passes: PassEventSequence, count: u32) -> PassEventSequence {
    if passes.len() > count as usize {
        tracing::debug!(
            "Prediction service returned {} passes, keeping {}",
            passes.len(),
            count
        );
        passes.truncate(count as usize);
    }
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;

    const TWO_PASSES: &str = r#"{
        "message": "success",
        "request": {"altitude": 100, "datetime": 900, "latitude": 37.0, "longitude": -122.0, "passes": 2},
        "response": [
            {"risetime": 1000, "duration": 600},
            {"risetime": 2000, "duration": 500}
        ]
    }"#;

    #[test]
    fn test_parse_success_in_order() {
        let passes = parse_pass_response(200, TWO_PASSES.to_string(), 5).unwrap();
        assert_eq!(passes, vec![PassEvent::new(1000, 600), PassEvent::new(2000, 500)]);
    }

    #[test]
    fn test_truncates_to_requested_count() {
        let passes = parse_pass_response(200, TWO_PASSES.to_string(), 1).unwrap();
        assert_eq!(passes, vec![PassEvent::new(1000, 600)]);
    }

    #[test]
    fn test_empty_response_list() {
        let body = r#"{"message":"success","response":[]}"#;
        let passes = parse_pass_response(200, body.to_string(), 5).unwrap();
        assert!(passes.is_empty());
    }

    #[test]
    fn test_message_failure_is_service_logic() {
        let body = r#"{"message":"failure","reason":"Latitude must be number between -80.0 and 80.0"}"#;
        let err = parse_pass_response(200, body.to_string(), 5).unwrap_err();
        match err {
            LookupError::ServiceLogic { stage, body: raw } => {
                assert_eq!(stage, Stage::Passes);
                assert_eq!(raw, body);
            }
            other => panic!("expected ServiceLogic, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_event() {
        let body = r#"{"message":"success","response":[{"risetime":"soon"}]}"#;
        let err = parse_pass_response(200, body.to_string(), 5).unwrap_err();
        assert!(matches!(err, LookupError::Parse { stage: Stage::Passes, .. }));
    }

    #[test]
    fn test_fractional_duration_rejected() {
        let body = r#"{"message":"success","response":[{"risetime":1000,"duration":600.5}]}"#;
        let err = parse_pass_response(200, body.to_string(), 5).unwrap_err();
        assert!(matches!(err, LookupError::Parse { stage: Stage::Passes, .. }));
    }

    #[test]
    fn test_bad_gateway() {
        let err = parse_pass_response(502, "Bad Gateway".to_string(), 5).unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.body(), Some("Bad Gateway"));
    }

    #[test]
    fn test_lookup_url() {
        let client = PassClient::new(Client::new(), "http://api.open-notify.org").with_count(3);
        assert_eq!(
            client.lookup_url(Coordinates::new(37.5, -122.25)),
            "http://api.open-notify.org/iss-pass.json?lat=37.5&lon=-122.25&n=3"
        );
    }
}

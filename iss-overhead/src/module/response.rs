///! Shared request and response validation for the lookup services
///!
///! All three services follow the same contract: a success status, then a
///! JSON body that may still carry a failure marker of its own, then the
///! fields we actually want. [`validate`] checks those in that order.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{LookupError, LookupResult, Stage};

/// Predicate over the parsed body that flags a service-reported failure.
pub type FailureCheck = fn(&Value) -> bool;

/// For services without an in-band failure marker
pub fn no_failure_marker(_body: &Value) -> bool {
    false
}

/// True when `field` is present as a string and is anything but `success_value`.
///
/// A missing field is not a service failure; the typed parse that follows
/// reports it.
pub fn field_is_not(body: &Value, field: &str, success_value: &str) -> bool {
    match body.get(field).and_then(Value::as_str) {
        Some(value) => value != success_value,
        None => false,
    }
}

/// Validate one raw response and extract `T` from it.
pub fn validate<T: DeserializeOwned>(
    stage: Stage,
    status: u16,
    body: String,
    is_failure: FailureCheck,
) -> LookupResult<T> {
    if !(200..300).contains(&status) {
        return Err(LookupError::ServiceStatus { stage, status, body });
    }

    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(source) => return Err(LookupError::Parse { stage, body, source }),
    };

    if is_failure(&value) {
        return Err(LookupError::ServiceLogic { stage, body });
    }

    serde_json::from_value(value).map_err(|source| LookupError::Parse { stage, body, source })
}

/// GET `url`, returning the status and raw body for [`validate`].
pub async fn fetch(client: &Client, stage: Stage, url: &str) -> LookupResult<(u16, String)> {
    tracing::debug!(stage = %stage, url = %url, "Sending lookup request");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LookupError::transport(stage, e))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| LookupError::transport(stage, e))?;

    tracing::debug!(stage = %stage, status, bytes = body.len(), "Lookup response received");

    Ok((status, body))
}

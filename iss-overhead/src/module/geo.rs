///! IP geolocation via an ip-api style JSON service
///!
///! `GET <base>/json/<ip>` answers `{"status":"success","lat":..,"lon":..}`
///! or, for private/reserved/unknown addresses, HTTP 200 with
///! `{"status":"fail","message":".."}`.

use async_trait::async_trait;
use iss_common::{Coordinates, IpAddress};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::response::{fetch, field_is_not, validate};
use crate::error::{LookupResult, Stage};

/// Raw JSON returned by the geolocation service
#[derive(Debug, Deserialize)]
struct GeoResponse {
    // Never read; makes a body without `status` a parse error
    #[allow(dead_code)]
    status: String,
    lat: f64,
    lon: f64,
}

fn geo_failed(body: &Value) -> bool {
    field_is_not(body, "status", "success")
}

#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Approximate location of `ip`
    async fn locate(&self, ip: &IpAddress) -> LookupResult<Coordinates>;
}

/// HTTP client for the geolocation service
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: Client,
    base_url: String,
}

impl GeoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Request URL for `ip`; the address goes in as a single path segment.
    pub fn lookup_url(&self, ip: &IpAddress) -> String {
        format!(
            "{}/json/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(ip.as_str())
        )
    }
}

#[async_trait]
impl GeoLookup for GeoClient {
    async fn locate(&self, ip: &IpAddress) -> LookupResult<Coordinates> {
        let url = self.lookup_url(ip);
        let (status, body) = fetch(&self.client, Stage::Coordinates, &url).await?;
        parse_geo_response(status, body)
    }
}

fn parse_geo_response(status: u16, body: String) -> LookupResult<Coordinates> {
    let resp: GeoResponse = validate(Stage::Coordinates, status, body, geo_failed)?;
    Ok(Coordinates::new(resp.lat, resp.lon))
}

///! Public IP discovery via an IP echo service (ipify-style JSON API)

use async_trait::async_trait;
use iss_common::IpAddress;
use reqwest::Client;
use serde::Deserialize;

use super::response::{fetch, no_failure_marker, validate};
use crate::error::{LookupResult, Stage};

/// Raw JSON returned by the echo service
#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

#[async_trait]
pub trait IpLookup: Send + Sync {
    /// Public address of the machine running this code
    async fn public_ip(&self) -> LookupResult<IpAddress>;
}

/// HTTP client for the IP echo service
#[derive(Debug, Clone)]
pub struct IpEchoClient {
    client: Client,
    url: String,
}

impl IpEchoClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IpLookup for IpEchoClient {
    async fn public_ip(&self) -> LookupResult<IpAddress> {
        let (status, body) = fetch(&self.client, Stage::Ip, &self.url).await?;
        parse_ip_response(status, body)
    }
}

fn parse_ip_response(status: u16, body: String) -> LookupResult<IpAddress> {
    let resp: IpEchoResponse = validate(Stage::Ip, status, body, no_failure_marker)?;
    Ok(IpAddress::new(resp.ip))
}

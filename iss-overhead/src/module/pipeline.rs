///! Pass lookup pipeline
///!
///! IP echo → geolocation → pass prediction, strictly in that order. The
///! first failing stage ends the run and its error is returned unchanged.

use anyhow::Context;
use iss_common::PassEventSequence;
use reqwest::Client;

use super::geo::{GeoClient, GeoLookup};
use super::ip::{IpEchoClient, IpLookup};
use super::pass::{PassClient, PassLookup};
use crate::config::OverheadConfig;
use crate::error::{LookupResult, Stage};

/// Chains the three lookups for "the machine running this code".
pub struct PassPipeline {
    ip: Box<dyn IpLookup>,
    geo: Box<dyn GeoLookup>,
    pass: Box<dyn PassLookup>,
}

impl PassPipeline {
    pub fn new(
        ip: impl IpLookup + 'static,
        geo: impl GeoLookup + 'static,
        pass: impl PassLookup + 'static,
    ) -> Self {
        Self {
            ip: Box::new(ip),
            geo: Box::new(geo),
            pass: Box::new(pass),
        }
    }

    /// HTTP-backed pipeline; all three lookups share one connection pool.
    pub fn from_config(config: &OverheadConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            IpEchoClient::new(client.clone(), config.ip_url.as_str()),
            GeoClient::new(client.clone(), config.geo_base_url.as_str()),
            PassClient::new(client, config.pass_base_url.as_str()).with_count(config.pass_count),
        ))
    }

    /// Next ISS passes over the caller's current location.
    pub async fn next_passes(&self) -> LookupResult<PassEventSequence> {
        tracing::info!(stage = %Stage::Ip, "Resolving public IP");
        let ip = self.ip.public_ip().await.inspect_err(log_failure)?;

        tracing::info!(stage = %Stage::Coordinates, ip = %ip, "Resolving location");
        let coords = self.geo.locate(&ip).await.inspect_err(log_failure)?;

        tracing::info!(stage = %Stage::Passes, coords = %coords, "Fetching pass predictions");
        let passes = self.pass.passes(coords).await.inspect_err(log_failure)?;

        tracing::info!("Received {} pass predictions", passes.len());
        Ok(passes)
    }
}

fn log_failure(e: &crate::error::LookupError) {
    tracing::warn!(stage = %e.stage(), "Pipeline aborted at {} stage", e.stage());
}

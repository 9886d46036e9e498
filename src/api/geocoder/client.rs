use anyhow::anyhow;
use reqwest::Url;

use super::types::*;

/// Thin client for the Photon geocoding API.
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base: Url,
}

impl Client {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let base = base
            .parse()
            .map_err(|e| anyhow!("{} is not a valid url: {}", base, e))?;

        Ok(Self {
            inner: client,
            base,
        })
    }

    /// Forward-geocodes `address`, returning `None` when Photon has no match.
    pub async fn geocode(&self, address: &str) -> anyhow::Result<Option<Coord>> {
        let mut url = self
            .base
            .join("/api")
            .map_err(|e| anyhow!("error joining url: {e}"))?;
        url.query_pairs_mut().append_pair("q", address);

        let response: FeatureCollection = self
            .inner
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.features.first().map(|f| Coord {
            lat: f.geometry.coordinates[1],
            lon: f.geometry.coordinates[0],
        }))
    }

    /// Raw search passthrough; the caller gets Photon's feature collection
    /// unmodified.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        lang: &str,
    ) -> anyhow::Result<serde_json::Value> {
        let mut url = self
            .base
            .join("/api")
            .map_err(|e| anyhow!("error joining url: {e}"))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("lang", lang);

        let response = self
            .inner
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}

///! Element-set sources
///!
///! Sources are grouped by provider. Groups are tried in priority order and
///! every endpoint inside a group is tried in order.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::SourceError;

const USER_AGENT: &str = "Mozilla/5.0 Orbitrack/0.1";

const CELESTRAK_GROUPS: &[&str] = &[
    "active",
    "stations",
    "weather",
    "gps-ops",
    "galileo",
    "glonass-ops",
    "beidou",
    "science",
    "starlink",
    "oneweb",
    "iridium-33-debris",
    "iridium-next",
    "noaa",
    "goes",
    "resource",
    "cubesat",
    "amateur",
    "x-comm",
    "geo",
    "intelsat",
    "ses",
    "orbcomm",
    "globalstar",
    "military",
    "radar",
];

const N2YO_CATALOGS: &[&str] = &["stations", "weather", "gps"];

const LEGACY_FILES: &[&str] = &["stations.txt", "weather.txt", "gps.txt"];

/// An ordered list of endpoints served by one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroup {
    pub name: String,
    pub urls: Vec<String>,
}

impl SourceGroup {
    pub fn new(name: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            name: name.into(),
            urls,
        }
    }
}

/// CelesTrak groups, then N2YO, then the legacy CelesTrak text files
pub fn default_source_groups() -> Vec<SourceGroup> {
    vec![
        SourceGroup::new(
            "celestrak",
            CELESTRAK_GROUPS
                .iter()
                .map(|group| {
                    format!(
                        "https://celestrak.org/NORAD/elements/gp.php?GROUP={}&FORMAT=tle",
                        group
                    )
                })
                .collect(),
        ),
        SourceGroup::new(
            "n2yo",
            N2YO_CATALOGS
                .iter()
                .map(|catalog| format!("https://www.n2yo.com/tle/download.php?catalog={}", catalog))
                .collect(),
        ),
        SourceGroup::new(
            "celestrak-legacy",
            LEGACY_FILES
                .iter()
                .map(|file| format!("https://celestrak.org/NORAD/elements/{}", file))
                .collect(),
        ),
    ]
}

/// Fetches the raw text body behind one endpoint
#[async_trait]
pub trait ElementSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Production source over HTTP
pub struct HttpElementSource {
    client: Client,
}

impl HttpElementSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ElementSource for HttpElementSource {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SourceError::Body {
            url: url.to_string(),
            source,
        })
    }
}

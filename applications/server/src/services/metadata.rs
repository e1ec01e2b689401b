//! Cloud instance-metadata lookups for the diagnostics endpoint.
//!
//! The metadata service only exists inside a cloud instance. Every failure
//! (refused connection, timeout, non-2xx status) turns into `None`; nothing
//! here returns an error to the caller.

use crate::error::{Result, ServerError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Value reported for a field the metadata service could not provide
pub const UNKNOWN: &str = "unknown";

const INSTANCE_ID_PATH: &str = "instance-id";
const AVAILABILITY_ZONE_PATH: &str = "placement/availability-zone";

/// What the metadata service said about this instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceIdentity {
    pub instance_id: Option<String>,
    pub availability_zone: Option<String>,
}

impl InstanceIdentity {
    pub fn instance_id_or_unknown(&self) -> &str {
        self.instance_id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn availability_zone_or_unknown(&self) -> &str {
        self.availability_zone.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Bounded-timeout client for the instance metadata service
#[derive(Debug, Clone)]
pub struct InstanceMetadataClient {
    http: Client,
    base_url: String,
}

impl InstanceMetadataClient {
    /// `base_url` is the metadata root, e.g. `http://169.254.169.254/latest/meta-data`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ServerError::Internal(format!("metadata client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one metadata path as text
    pub async fn fetch(&self, path: &str) -> Option<String> {
        let url = format!("{}/{}", self.base_url, path);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Metadata request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "Metadata request rejected");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body.trim().to_string()),
            Err(e) => {
                debug!(url = %url, error = %e, "Metadata body unreadable");
                None
            }
        }
    }

    /// Instance id, then availability zone.
    ///
    /// The zone is only requested once the instance id came back.
    pub async fn identity(&self) -> InstanceIdentity {
        let Some(instance_id) = self.fetch(INSTANCE_ID_PATH).await else {
            tracing::info!("Not running on EC2 or metadata unavailable");
            return InstanceIdentity::default();
        };

        let availability_zone = self.fetch(AVAILABILITY_ZONE_PATH).await;
        InstanceIdentity {
            instance_id: Some(instance_id),
            availability_zone,
        }
    }
}

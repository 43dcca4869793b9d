// System status endpoint

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::FmgClient;
use crate::error::Error;

/// Subset of `get /sys/status` used for connection checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemStatus {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "Serial Number")]
    pub serial_number: Option<String>,
    #[serde(default, rename = "Admin Domain Configuration")]
    pub admin_domain_configuration: Option<String>,
    #[serde(default, rename = "Platform Type")]
    pub platform_type: Option<String>,
}

impl FmgClient {
    /// `get /sys/status`
    pub async fn system_status(&self) -> Result<SystemStatus, Error> {
        debug!("fetching system status");
        let data = self
            .get("/sys/status")
            .await?
            .ok_or_else(|| Error::UnexpectedResponse("/sys/status returned no data".into()))?;
        serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: data.to_string(),
        })
    }
}

// ── Runtime provider configuration ──
//
// These types describe *how* to reach FortiManager and which device the
// resources address by default. They carry credential data but never
// touch disk: the CLI constructs a `ProviderConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

pub use fmgdevice_api::{Credentials, TlsMode};

/// How writes are coordinated with other FortiManager administrators.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkspaceMode {
    /// Writes go straight to the ADOM database.
    #[default]
    Disable,
    /// Every write locks the ADOM, commits, and unlocks.
    Normal,
}

/// Configuration for one FortiManager connection.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// FortiManager URL (e.g., `https://fmg.example.net`).
    pub url: Url,
    pub credentials: Credentials,
    pub tls: TlsMode,
    pub timeout: Duration,
    /// ADOM used for workspace locking.
    pub adom: Option<String>,
    /// Default managed device for `{device}` path segments.
    pub device_name: Option<String>,
    /// Default VDOM for `{vdom}` path segments.
    pub device_vdom: String,
    pub workspace_mode: WorkspaceMode,
    /// Client retry count applied on every CRUD call.
    pub retries: u32,
}

impl ProviderConfig {
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self {
            url,
            credentials,
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            adom: None,
            device_name: None,
            device_vdom: "root".into(),
            workspace_mode: WorkspaceMode::Disable,
            retries: 1,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device_name = Some(device.into());
        self
    }

    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.device_vdom = vdom.into();
        self
    }

    pub fn with_workspace(mut self, adom: impl Into<String>) -> Self {
        self.adom = Some(adom.into());
        self.workspace_mode = WorkspaceMode::Normal;
        self
    }
}

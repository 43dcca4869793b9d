// ── CRUD dispatcher ──
//
// One generic implementation of create/read/update/delete for every
// `ResourceDef`. State goes through `expand` on the way out and `flatten`
// on the way back; URLs come from the paradict.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Number, Value};
use tracing::{debug, info, warn};

use fmgdevice_api::{Credentials, FmgClient, SystemStatus, TransportConfig};

use crate::config::{ProviderConfig, WorkspaceMode};
use crate::convert::{FlattenOptions, expand_object, flatten_object};
use crate::error::CoreError;
use crate::paradict;
use crate::resource::ResourceDef;
use crate::schema::FieldKind;
use crate::state::ResourceData;

/// Connection to FortiManager plus the provider-level defaults.
///
/// Cheaply cloneable; clones share the underlying client and session.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    client: FmgClient,
    config: ProviderConfig,
}

impl Provider {
    /// Build a provider without authenticating.
    pub fn new(config: ProviderConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
            ..TransportConfig::default()
        }
        .with_retries(config.retries);
        let client = FmgClient::new(config.url.clone(), &config.credentials, &transport)?;
        Ok(Self::with_client(client, config))
    }

    /// Wrap an existing client.
    pub fn with_client(client: FmgClient, config: ProviderConfig) -> Self {
        Self {
            inner: Arc::new(ProviderInner { client, config }),
        }
    }

    /// Build a provider and log in when using session credentials.
    pub async fn connect(config: ProviderConfig) -> Result<Self, CoreError> {
        let provider = Self::new(config)?;
        if let Credentials::Session { username, password } = &provider.inner.config.credentials {
            provider.inner.client.login(username, password).await?;
            debug!(username = %username, "session authentication successful");
        }
        info!(url = %provider.inner.config.url, "connected to FortiManager");
        Ok(provider)
    }

    /// Log out if a session is held. Logout failures are not fatal.
    pub async fn disconnect(&self) {
        if self.inner.client.has_session() {
            if let Err(e) = self.inner.client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        debug!("disconnected");
    }

    /// Connect, run `f`, disconnect.
    pub async fn oneshot<F, Fut, T>(config: ProviderConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Provider) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let provider = Provider::connect(config).await?;
        let result = f(provider.clone()).await;
        provider.disconnect().await;
        result
    }

    pub fn client(&self) -> &FmgClient {
        &self.inner.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.inner.config
    }

    pub async fn system_status(&self) -> Result<SystemStatus, CoreError> {
        Ok(self.inner.client.system_status().await?)
    }

    // ── CRUD ─────────────────────────────────────────────────────────

    /// Create the object described by `data` and refresh `data` from it.
    pub async fn create(&self, def: &ResourceDef, data: &mut ResourceData) -> Result<(), CoreError> {
        self.in_workspace(self.create_object(def, data))
            .await
            .map_err(|e| e.context(def.context("creating")))
    }

    /// Refresh `data` from FortiManager. A missing object clears the ID.
    pub async fn read(&self, def: &ResourceDef, data: &mut ResourceData) -> Result<(), CoreError> {
        self.read_object(def, data)
            .await
            .map_err(|e| e.context(def.context("reading")))
    }

    pub async fn update(&self, def: &ResourceDef, data: &mut ResourceData) -> Result<(), CoreError> {
        self.in_workspace(self.update_object(def, data))
            .await
            .map_err(|e| e.context(def.context("updating")))
    }

    /// Delete the object and clear the ID. Singletons cannot be deleted,
    /// so only the local ID is cleared for them, without touching the
    /// ADOM workspace.
    pub async fn delete(&self, def: &ResourceDef, data: &mut ResourceData) -> Result<(), CoreError> {
        if def.is_singleton() {
            debug!(resource = def.type_name, "singleton delete only clears state");
            data.clear_id();
            return Ok(());
        }
        self.in_workspace(self.delete_object(def, data))
            .await
            .map_err(|e| e.context(def.context("deleting")))
    }

    /// Adopt an existing object into state.
    ///
    /// `overrides` supplies `device_name`, `device_vdom` and parent keys.
    /// Fails with `NotFound` when the object does not exist.
    pub async fn import(
        &self,
        def: &ResourceDef,
        key: &str,
        overrides: Map<String, Value>,
    ) -> Result<ResourceData, CoreError> {
        let mut data = ResourceData::new(overrides);
        match def.key_field() {
            Some(field) => {
                data.set(field.name, key_to_value(field.kind, key));
                data.set_id(key);
            }
            None => data.set_id(def.label),
        }

        self.read(def, &mut data).await?;
        if data.id().is_none() {
            return Err(CoreError::NotFound {
                url: format!("{} {key}", def.type_name),
            }
            .context(def.context("importing")));
        }
        Ok(data)
    }

    // ── Operation bodies ─────────────────────────────────────────────

    async fn create_object(
        &self,
        def: &ResourceDef,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let params = self.prepare(def, data);
        let object = expand_object(def.fields, data.attributes(), "")?;
        let url = def.collection_path(&params)?;

        if def.is_singleton() {
            debug!(resource = def.type_name, url, "set singleton");
            self.inner.client.set(&url, Value::Object(object)).await?;
            data.set_id(def.label);
        } else {
            debug!(resource = def.type_name, url, "add row");
            let response = self.inner.client.add(&url, Value::Object(object)).await?;
            let key = def
                .key_value(data)
                .or_else(|| response_key(def, response.as_ref()))
                .ok_or_else(|| {
                    CoreError::Internal(format!("no key returned for new {} object", def.label))
                })?;
            data.set_id(key);
        }

        self.read_object(def, data).await
    }

    async fn read_object(&self, def: &ResourceDef, data: &mut ResourceData) -> Result<(), CoreError> {
        let params = self.prepare(def, data);
        let url = def.object_path(&params, data)?;
        debug!(resource = def.type_name, url, "get object");

        let object = match self.inner.client.get(&url).await {
            Ok(Some(Value::Object(object))) => Some(object),
            Ok(Some(Value::Array(rows))) if rows.is_empty() => None,
            Ok(None) => None,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
            Ok(Some(other)) => {
                return Err(CoreError::Flatten {
                    path: String::new(),
                    reason: format!("expected an object, got {other}"),
                });
            }
        };
        let Some(object) = object else {
            debug!(
                resource = def.type_name,
                id = data.id().unwrap_or_default(),
                "object removed upstream, clearing ID"
            );
            data.clear_id();
            return Ok(());
        };

        let opts = FlattenOptions {
            sort: data.subtable_sort()?,
        };
        let flattened = flatten_object(def.fields, &object, Some(data.attributes()), opts, "")?;
        data.merge_flattened(&def.schema_names(), flattened);

        if def.is_singleton() {
            data.set_id(def.label);
        } else if let Some(key) = def.key_value(data) {
            data.set_id(key);
        }
        Ok(())
    }

    async fn update_object(
        &self,
        def: &ResourceDef,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let params = self.prepare(def, data);
        let object = Value::Object(expand_object(def.fields, data.attributes(), "")?);
        let url = def.object_path(&params, data)?;

        if def.is_singleton() {
            debug!(resource = def.type_name, url, "set singleton");
            self.inner.client.set(&url, object).await?;
        } else {
            debug!(resource = def.type_name, url, "update row");
            self.inner.client.update(&url, object).await?;
        }

        self.read_object(def, data).await
    }

    async fn delete_object(
        &self,
        def: &ResourceDef,
        data: &mut ResourceData,
    ) -> Result<(), CoreError> {
        let params = self.prepare(def, data);
        let url = def.object_path(&params, data)?;
        debug!(resource = def.type_name, url, "delete row");
        match self.inner.client.delete(&url).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => debug!(url, "object already gone"),
            Err(e) => return Err(e.into()),
        }
        data.clear_id();
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Resolve path parameters and reset the client retry count.
    fn prepare(&self, def: &ResourceDef, data: &ResourceData) -> paradict::ParamDict {
        self.inner.client.set_retries(self.inner.config.retries);
        paradict::resolve(def, data, &self.inner.config)
    }

    /// Run a write inside lock/commit/unlock when workspace mode is on.
    async fn in_workspace<T>(
        &self,
        op: impl Future<Output = Result<T, CoreError>>,
    ) -> Result<T, CoreError> {
        let adom = match (&self.inner.config.workspace_mode, &self.inner.config.adom) {
            (WorkspaceMode::Normal, Some(adom)) => adom.as_str(),
            _ => return op.await,
        };
        let client = &self.inner.client;

        client.lock_adom(adom).await?;
        let result = match op.await {
            Ok(value) => client
                .commit_adom(adom)
                .await
                .map(|()| value)
                .map_err(CoreError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = client.unlock_adom(adom).await {
            warn!(adom, error = %e, "failed to unlock ADOM workspace");
        }
        result
    }
}

/// Key of a freshly added row from the `add` response (`{"id": 7}` style).
fn response_key(def: &ResourceDef, response: Option<&Value>) -> Option<String> {
    let field = def.key_field()?;
    match response?.get(field.api_name().as_ref())? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn key_to_value(kind: FieldKind, key: &str) -> Value {
    match kind {
        FieldKind::Integer => key
            .parse::<i64>()
            .map_or_else(|_| Value::String(key.to_owned()), |n| Value::Number(Number::from(n))),
        _ => Value::String(key.to_owned()),
    }
}

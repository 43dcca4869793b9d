// ── Path parameters ──
//
// FortiManager addresses device objects by URL, e.g.
// `/pm/config/device/{device}/vdom/{vdom}/router/static/{seq_num}`.
// The paradict holds the values substituted into those placeholders:
// device and vdom from state or provider defaults, parent keys from state.

use indexmap::IndexMap;

use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::resource::ResourceDef;
use crate::state::{DEVICE_NAME, DEVICE_VDOM, ResourceData};

pub const DEVICE: &str = "device";
pub const VDOM: &str = "vdom";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamDict(IndexMap<String, String>);

impl ParamDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every `{name}` in `template`.
    pub fn render(&self, template: &str, resource: &str) -> Result<String, CoreError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                CoreError::Internal(format!("unterminated placeholder in {template}"))
            })?;
            let name = &after[..close];
            let value = self.get(name).ok_or_else(|| CoreError::MissingParameter {
                name: name.to_owned(),
                resource: resource.to_owned(),
            })?;
            out.push_str(&escape_segment(value));
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// FortiManager escapes `/` inside a key segment as `\/`.
pub fn escape_segment(value: &str) -> String {
    value.replace('/', "\\/")
}

/// Build the paradict for one resource from state and provider defaults.
///
/// Missing values are not an error here: `render` reports the first
/// placeholder the template actually needs.
pub fn resolve(def: &ResourceDef, data: &ResourceData, config: &ProviderConfig) -> ParamDict {
    let mut params = ParamDict::new();

    if let Some(device) = data
        .get_str(DEVICE_NAME)
        .or_else(|| config.device_name.clone())
    {
        params.insert(DEVICE, device);
    }

    let vdom = data
        .get_str(DEVICE_VDOM)
        .unwrap_or_else(|| config.device_vdom.clone());
    params.insert(VDOM, vdom);

    for parent in def.parents {
        if let Some(value) = data.get_str(parent.attr) {
            params.insert(parent.placeholder, value);
        }
    }

    params
}

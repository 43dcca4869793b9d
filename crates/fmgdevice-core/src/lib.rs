//! Schema-driven FortiManager device resources.
//!
//! This crate turns declarative resource tables into CRUD operations
//! against a FortiManager-managed FortiGate:
//!
//! - **[`schema`]** / **[`resources`]**: static field tables and the
//!   registry of shipped resource types.
//! - **[`convert`]**: `expand` (state → API) and `flatten` (API → state),
//!   including FortiManager's shape quirks and sub-table sorting.
//! - **[`paradict`]**: path parameters (`device`, `vdom`, parent keys)
//!   substituted into URL templates.
//! - **[`Provider`]**: one generic create/read/update/delete/import
//!   implementation on top of [`fmgdevice_api::FmgClient`].

pub mod config;
pub mod convert;
pub mod error;
pub mod paradict;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, ProviderConfig, TlsMode, WorkspaceMode};
pub use convert::{FlattenOptions, SubtableSort};
pub use error::CoreError;
pub use paradict::ParamDict;
pub use provider::Provider;
pub use resource::{KeySpec, ParentKey, ResourceDef};
pub use schema::{Field, FieldKind};
pub use state::ResourceData;

pub use fmgdevice_api::SystemStatus;

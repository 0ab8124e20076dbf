pub mod api;
pub mod blocking;
pub mod cache;
pub mod client;
pub mod error;
pub mod fields;
pub mod models;
pub mod provider;
pub mod registry;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod mock;

pub use api::TrackerApi;
pub use client::{Auth, JiraClient, JiraConfig};
pub use error::Error;
pub use models::*;

// Provider re-exports
pub use blocking::BlockingJiraProvider;
pub use provider::{AttachmentChecks, JiraProvider};
pub use registry::ProviderRegistry;
pub use session::Session;

// Metadata re-exports
pub use cache::MetadataCache;
pub use fields::{FieldKind, build_issue_input};

// Settings re-exports
pub use settings::{
    EnvSettingsStore, FileSettingsStore, MemorySettingsStore, NoopSettingsEditor, SettingsEditor,
    SettingsStore, TrackerSettings,
};

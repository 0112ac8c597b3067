//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod principal;
pub mod release;
pub mod scrape_config;
pub mod settings;
pub mod state;
pub mod target;
pub mod unit;

pub use error::{ProvisionError, SettingsError, TargetError};
pub use principal::{Owner, Principal, PrincipalKind};
pub use release::ReleaseSpec;
pub use scrape_config::{ConfigDocument, MergeOutcome, merge_target};
pub use settings::Settings;
pub use state::{ArtifactPresence, ServiceState, StatusReport};
pub use target::ScrapeTarget;
pub use unit::ServiceUnit;

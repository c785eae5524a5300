//! Core library for the daily menu notifier.
//!
//! This crate defines:
//! - Configuration resolved from a TOML file and the environment
//! - Fetching today's entry from the weekly menu API
//! - Adaptive card rendering and webhook delivery
//! - The per-location run pipeline
//!
//! It is used by `menu-cli`, but can also be driven from tests or other binaries.

pub mod card;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod notifier;
pub mod pipeline;
pub mod today;

pub use config::{Config, ConfigFile};
pub use error::{ConfigError, FetchError};
pub use fetcher::{FoodAndCoClient, MenuSource};
pub use model::{Location, MenuItem, TodayMenu, WeeklyMenuResponse};
pub use notifier::{Notifier, PostOutcome, WebhookNotifier};
pub use pipeline::{LocationOutcome, LocationReport, RunReport};
pub use today::Today;

use crate::model::{Location, TodayMenu};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod webhook;

pub use webhook::WebhookNotifier;

/// What happened to a single post. Never an error: delivery is best effort
/// and failures are already logged by the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Delivered { status: StatusCode },
    Rejected { status: StatusCode },
    Failed { reason: String },
}

impl PostOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PostOutcome::Delivered { .. })
    }
}

#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn post(&self, location: &Location, menu: &TodayMenu) -> PostOutcome;
}

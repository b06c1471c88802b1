//! Explicit status channel for fetch operations.
//!
//! The data state alone cannot tell "still loading" from "failed", so every
//! service publishes a `FetchStatus` next to its value.

use chrono::{DateTime, Utc};

use crate::api::FetchErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No operation has been issued yet.
    #[default]
    Idle,
    Loading,
    Ready { updated_at: DateTime<Utc> },
    Failed { kind: FetchErrorKind, at: DateTime<Utc> },
}

impl FetchStatus {
    pub fn ready_now() -> Self {
        FetchStatus::Ready { updated_at: Utc::now() }
    }

    pub fn failed_now(kind: FetchErrorKind) -> Self {
        FetchStatus::Failed { kind, at: Utc::now() }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchStatus::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed { .. })
    }

    /// Short human readable form for status lines.
    pub fn display(&self) -> String {
        match self {
            FetchStatus::Idle => "not loaded".to_string(),
            FetchStatus::Loading => "loading".to_string(),
            FetchStatus::Ready { updated_at } => format!("updated {}", age_display(*updated_at)),
            FetchStatus::Failed { kind, at } => {
                format!("failed ({}) {}", kind, age_display(*at))
            }
        }
    }
}

fn age_display(at: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

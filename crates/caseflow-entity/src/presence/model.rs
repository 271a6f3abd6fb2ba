//! Activity value objects.
//!
//! An [`Activity`] describes what a staff member is doing right now: idle,
//! or viewing/editing a named case record. Activities are immutable — a new
//! value replaces the old one, never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Connected but not working on any record.
    Idle,
    /// Reading a case record.
    Viewing,
    /// Actively modifying a case record.
    Editing,
}

impl ActivityKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Viewing => "viewing",
            Self::Editing => "editing",
        }
    }
}

/// The kind of case record an activity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A traveler's case file.
    Traveler,
    /// A co-traveling dependent.
    Dependent,
    /// An invoice.
    Invoice,
}

impl TargetKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traveler => "traveler",
            Self::Dependent => "dependent",
            Self::Invoice => "invoice",
        }
    }
}

/// The case record an activity points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTarget {
    /// Record kind.
    #[serde(rename = "target_kind")]
    pub kind: TargetKind,
    /// Opaque record identifier (e.g. a traveler reference number).
    #[serde(rename = "target_id")]
    pub id: String,
}

/// An immutable snapshot of what a user is doing on one session.
///
/// The target is present exactly when the kind is viewing or editing;
/// idle activities carry no target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity kind.
    pub kind: ActivityKind,
    /// The record being viewed or edited, absent when idle.
    #[serde(flatten)]
    pub target: Option<ActivityTarget>,
    /// Optional free-text detail (e.g. the field being edited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When this activity snapshot was constructed.
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// An idle activity with no target.
    pub fn idle() -> Self {
        Self {
            kind: ActivityKind::Idle,
            target: None,
            description: None,
            timestamp: Utc::now(),
        }
    }

    /// A viewing activity for the given case record.
    pub fn viewing(kind: TargetKind, id: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Viewing,
            target: Some(ActivityTarget {
                kind,
                id: id.into(),
            }),
            description: None,
            timestamp: Utc::now(),
        }
    }

    /// An editing activity for the given case record.
    pub fn editing(kind: TargetKind, id: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Editing,
            target: Some(ActivityTarget {
                kind,
                id: id.into(),
            }),
            description: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this activity is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self.kind, ActivityKind::Idle)
    }
}

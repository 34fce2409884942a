//! Per-record activity: a snapshot flag plus an optional time profile.

use serde::{Deserialize, Serialize};

/// Whether a record participates in a compilation.
///
/// A record always has a snapshot flag. Time-series networks may attach a
/// profile with one entry per time step; when a compilation asks for a time
/// index, the profile entry wins over the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activity {
    snapshot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<Vec<bool>>,
}

impl Activity {
    /// Activity that does not vary in time.
    pub fn fixed(active: bool) -> Self {
        Self {
            snapshot: active,
            profile: None,
        }
    }

    /// Activity with a per-time-step profile.
    pub fn with_profile(snapshot: bool, profile: Vec<bool>) -> Self {
        Self {
            snapshot,
            profile: Some(profile),
        }
    }

    /// The snapshot flag.
    pub fn snapshot(&self) -> bool {
        self.snapshot
    }

    /// The time profile, if any.
    pub fn profile(&self) -> Option<&[bool]> {
        self.profile.as_deref()
    }

    /// Activity at the given time index (`None` = snapshot).
    ///
    /// Indices past the end of the profile fall back to the snapshot; the
    /// graph rejects profiles whose length differs from its step count, so
    /// this only happens for records without a profile.
    pub fn at(&self, time_index: Option<usize>) -> bool {
        match (time_index, &self.profile) {
            (Some(t), Some(profile)) => profile.get(t).copied().unwrap_or(self.snapshot),
            _ => self.snapshot,
        }
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::fixed(true)
    }
}

impl From<bool> for Activity {
    fn from(active: bool) -> Self {
        Self::fixed(active)
    }
}

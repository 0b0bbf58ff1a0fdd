//! Serializable snapshots of a track tree, for inspection and debugging.

use std::collections::BTreeMap;

use serde::Serialize;

use super::sample::Sample;
use super::set::{Member, TrackSet};
use super::source::{Track, TrackId};
use crate::error::TrackError;

/// Duration and volume of a track, recursing through nested sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackSummary {
    Leaf {
        duration_secs: f64,
        volume: f64,
    },
    Set {
        duration_secs: f64,
        volume: f64,
        members: BTreeMap<TrackId, TrackSummary>,
    },
}

impl TrackSummary {
    pub fn duration_secs(&self) -> f64 {
        match self {
            TrackSummary::Leaf { duration_secs, .. } | TrackSummary::Set { duration_secs, .. } => {
                *duration_secs
            }
        }
    }

    pub fn volume(&self) -> f64 {
        match self {
            TrackSummary::Leaf { volume, .. } | TrackSummary::Set { volume, .. } => *volume,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<S: Sample> Member<S> {
    pub fn summary(&self) -> TrackSummary {
        match self {
            Member::Leaf(t) => {
                let t = t.borrow();
                match t.as_set() {
                    Some(set) => set.summary(),
                    None => TrackSummary::Leaf {
                        duration_secs: t.duration().as_secs_f64(),
                        volume: t.volume(),
                    },
                }
            }
            Member::Set(s) => s.borrow().summary(),
        }
    }
}

impl<S: Sample> TrackSet<S> {
    pub fn summary(&self) -> TrackSummary {
        TrackSummary::Set {
            duration_secs: self.duration().as_secs_f64(),
            volume: self.volume(),
            members: self
                .iter()
                .map(|(id, member)| (id.clone(), member.summary()))
                .collect(),
        }
    }
}

//! Arrangements: track trees described in JSON.
//!
//! An arrangement lists the starting tracks and a sequence of steps to play
//! against them:
//!
//! ```json
//! {
//!   "sample_rate": 8000,
//!   "tracks": {
//!     "drone": { "kind": "envelope", "volume": 0.2, "seconds": 4.0 },
//!     "swell": { "kind": "set", "members": {
//!       "low":  { "kind": "envelope", "volume": 0.0, "seconds": 1.0 },
//!       "high": { "kind": "envelope", "volume": 0.0 }
//!     }}
//!   },
//!   "steps": [
//!     { "op": "even_out" },
//!     { "op": "adjust_volume", "volume": 0.6, "seconds": 2.0, "exclude": ["drone"] },
//!     { "op": "continue", "seconds": 1.0 }
//!   ]
//! }
//! ```
//!
//! A step with `exclude` runs against the root set minus those ids; the
//! excluded tracks are left alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{duration_from_secs, TrackError};
use crate::track::{EnvelopeTrack, Member, Track, TrackId, TrackSet, TrackSummary};
use crate::DEFAULT_SAMPLE_RATE;

/// A track in an arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrangementNode {
    /// A held level, already `seconds` long.
    Envelope {
        volume: f64,
        #[serde(default)]
        seconds: f64,
    },
    Set {
        members: BTreeMap<TrackId, ArrangementNode>,
    },
}

/// One operation applied to the root set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Continue {
        seconds: f64,
        #[serde(default)]
        exclude: Vec<TrackId>,
    },
    AdjustVolume {
        volume: f64,
        seconds: f64,
        #[serde(default)]
        exclude: Vec<TrackId>,
    },
    EvenOut {
        #[serde(default)]
        exclude: Vec<TrackId>,
    },
}

impl Step {
    fn excluded(&self) -> &[TrackId] {
        match self {
            Step::Continue { exclude, .. }
            | Step::AdjustVolume { exclude, .. }
            | Step::EvenOut { exclude } => exclude,
        }
    }

    fn apply(&self, root: &TrackSet<f64>) -> Result<(), TrackError> {
        let mut view = root.exclude(self.excluded());
        match self {
            Step::Continue { seconds, .. } => view.continue_for(duration_from_secs(*seconds)?),
            Step::AdjustVolume { volume, seconds, .. } => {
                view.checked_adjust_volume(*volume, duration_from_secs(*seconds)?)?
            }
            Step::EvenOut { .. } => view.even_out(),
        }
        Ok(())
    }
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

/// A complete arrangement: starting tracks, steps, and the render rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    pub tracks: BTreeMap<TrackId, ArrangementNode>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Arrangement {
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the starting tree without running any steps.
    pub fn build(&self) -> Result<TrackSet<f64>, TrackError> {
        build_set(&self.tracks)
    }

    /// Build the tree and run every step against it.
    pub fn perform(&self) -> Result<TrackSet<f64>, TrackError> {
        let root = self.build()?;
        for (i, step) in self.steps.iter().enumerate() {
            log::debug!("arrangement step {i}: {step:?}");
            step.apply(&root)?;
        }
        Ok(root)
    }

    /// Perform the arrangement and render it at its configured sample rate.
    pub fn render(&self) -> Result<Vec<f64>, TrackError> {
        let root = self.perform()?;
        let samples = root.checked_encode(self.sample_rate)?;
        log::debug!(
            "rendered {} samples ({:?}) at {} Hz",
            samples.len(),
            root.duration(),
            self.sample_rate
        );
        Ok(samples)
    }

    /// Perform the arrangement and summarize the resulting tree.
    pub fn describe(&self) -> Result<TrackSummary, TrackError> {
        Ok(self.perform()?.summary())
    }
}

fn build_set(nodes: &BTreeMap<TrackId, ArrangementNode>) -> Result<TrackSet<f64>, TrackError> {
    let mut builder = TrackSet::builder();
    for (id, node) in nodes {
        builder = builder.member(id.clone(), build_member(node)?);
    }
    builder.build()
}

fn build_member(node: &ArrangementNode) -> Result<Member<f64>, TrackError> {
    match node {
        ArrangementNode::Envelope { volume, seconds } => {
            if !volume.is_finite() {
                return Err(TrackError::NonFiniteVolume(*volume));
            }
            let duration = duration_from_secs(*seconds)?;
            Ok(Member::leaf(EnvelopeTrack::with_duration(*volume, duration)))
        }
        ArrangementNode::Set { members } => Ok(Member::set(build_set(members)?)),
    }
}

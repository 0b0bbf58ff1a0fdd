//! Tracks: composable, time-extensible sound sources.
//!
//! Leaf generators implement [`Track`]; a [`TrackSet`] mixes any number of
//! them (including other sets) and is itself a `Track`. Nothing here
//! synthesizes a waveform beyond [`EnvelopeTrack`]'s held levels and ramps.

pub mod envelope;
pub mod sample;
pub mod set;
pub mod source;
pub mod summary;

pub use envelope::EnvelopeTrack;
pub use sample::Sample;
pub use set::{Member, SharedSet, TrackSet, TrackSetBuilder};
pub use source::{share, SharedTrack, Track, TrackId};
pub use summary::TrackSummary;

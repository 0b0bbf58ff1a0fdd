//! The track capability: the one interface every sound source implements.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::sample::Sample;
use super::set::TrackSet;
use crate::error::TrackError;

/// A mutable stream of audio.
///
/// At any moment a track has a *current sound* (a tone, a noise colour, a
/// held level...). It grows either by producing more of that sound or by
/// ramping the sound's volume somewhere new. Concrete generators live
/// outside this crate; anything implementing `Track` can be mixed in a
/// [`TrackSet`](super::TrackSet).
pub trait Track<S: Sample> {
    /// Elapsed time of the material produced so far.
    fn duration(&self) -> Duration;

    /// Render the whole track at `sample_rate`.
    ///
    /// Must not advance any internal state: two calls without a mutation in
    /// between return the same samples. The length should be about
    /// `duration * sample_rate`.
    fn encode(&self, sample_rate: u32) -> Vec<S>;

    /// Average volume of the current sound.
    fn volume(&self) -> f64;

    /// Elongate the track by `duration` of its current sound.
    fn continue_for(&mut self, duration: Duration);

    /// Elongate the track by `transition` while the current sound ramps
    /// from its present volume to `new_volume`.
    fn adjust_volume(&mut self, new_volume: f64, transition: Duration);

    /// Continue every part of the track up to the track's full length.
    ///
    /// A single sound has nothing to equalize; [`TrackSet`] overrides this.
    fn even_out(&mut self) {}

    /// This track viewed as a set, if it is one.
    fn as_set(&self) -> Option<&TrackSet<S>> {
        None
    }

    /// [`encode`](Track::encode), refusing a zero sample rate.
    fn checked_encode(&self, sample_rate: u32) -> Result<Vec<S>, TrackError> {
        if sample_rate == 0 {
            return Err(TrackError::ZeroSampleRate);
        }
        Ok(self.encode(sample_rate))
    }

    /// [`adjust_volume`](Track::adjust_volume), refusing NaN and infinite volumes.
    fn checked_adjust_volume(
        &mut self,
        new_volume: f64,
        transition: Duration,
    ) -> Result<(), TrackError> {
        if !new_volume.is_finite() {
            return Err(TrackError::NonFiniteVolume(new_volume));
        }
        self.adjust_volume(new_volume, transition);
        Ok(())
    }
}

/// A track that may be referenced from several places at once.
pub type SharedTrack<S> = Rc<RefCell<dyn Track<S>>>;

/// Wrap a concrete track for shared membership.
pub fn share<S, T>(track: T) -> SharedTrack<S>
where
    S: Sample,
    T: Track<S> + 'static,
{
    Rc::new(RefCell::new(track))
}

/// Identifies a member within one track set. Not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        TrackId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        TrackId(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        TrackId(id)
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for TrackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::EnvelopeTrack;

    #[test]
    fn checked_encode_rejects_zero_rate() {
        let track = EnvelopeTrack::with_duration(0.5, Duration::from_secs(1));
        let encoded: Result<Vec<f64>, _> = track.checked_encode(0);
        assert!(matches!(encoded, Err(TrackError::ZeroSampleRate)));
        assert_eq!(Track::<f64>::checked_encode(&track, 100).unwrap().len(), 100);
    }

    #[test]
    fn checked_adjust_volume_leaves_track_untouched_on_error() {
        let mut track = EnvelopeTrack::new(0.5);
        let err = Track::<f64>::checked_adjust_volume(&mut track, f64::INFINITY, Duration::from_secs(1));
        assert!(matches!(err, Err(TrackError::NonFiniteVolume(_))));
        assert_eq!(Track::<f64>::duration(&track), Duration::ZERO);
        assert_eq!(Track::<f64>::volume(&track), 0.5);

        Track::<f64>::checked_adjust_volume(&mut track, 0.8, Duration::from_secs(1)).unwrap();
        assert_eq!(Track::<f64>::volume(&track), 0.8);
    }

    #[test]
    fn shared_tracks_alias() {
        let a = share::<f64, _>(EnvelopeTrack::new(1.0));
        let b = Rc::clone(&a);
        a.borrow_mut().continue_for(Duration::from_secs(2));
        assert_eq!(b.borrow().duration(), Duration::from_secs(2));
    }

    #[test]
    fn track_id_conversions() {
        let id = TrackId::from("pad");
        assert_eq!(id, TrackId::new(String::from("pad")));
        assert_eq!(id.as_str(), "pad");
        assert_eq!(format!("{id}"), "pad");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pad\"");
    }
}

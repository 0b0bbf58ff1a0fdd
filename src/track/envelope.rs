//! Envelope track: a reference leaf whose signal is its own volume curve.
//!
//! Holds a piecewise-linear level: flat stretches from `continue_for` and
//! linear ramps from `adjust_volume`. Useful as a control signal, for
//! arrangements, and for checking mixing arithmetic by ear or by eye.

use std::time::Duration;

use super::source::Track;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// One stretch of the envelope, ramping linearly from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    length: Duration,
    from: f64,
    to: f64,
}

impl Segment {
    fn is_flat_at(&self, level: f64) -> bool {
        self.from == level && self.to == level
    }

    fn level_at(&self, offset_ns: u128) -> f64 {
        let t = offset_ns as f64 / self.length.as_nanos() as f64;
        self.from + (self.to - self.from) * t
    }
}

/// A track rendering a held level with linear volume ramps.
#[derive(Debug, Clone)]
pub struct EnvelopeTrack {
    segments: Vec<Segment>,
    /// Level of the current sound.
    level: f64,
}

impl EnvelopeTrack {
    /// An empty track whose current sound sits at `volume`.
    pub fn new(volume: f64) -> Self {
        EnvelopeTrack {
            segments: Vec::new(),
            level: volume,
        }
    }

    /// A track already holding `volume` for `duration`.
    pub fn with_duration(volume: f64, duration: Duration) -> Self {
        let mut track = EnvelopeTrack::new(volume);
        track.continue_for(duration);
        track
    }
}

/// Number of whole samples in `duration` at `sample_rate`, using exact integer math.
fn sample_count(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_nanos() * sample_rate as u128 / NANOS_PER_SEC) as usize
}

impl Track<f64> for EnvelopeTrack {
    fn duration(&self) -> Duration {
        self.segments.iter().map(|s| s.length).sum()
    }

    fn encode(&self, sample_rate: u32) -> Vec<f64> {
        let total = sample_count(self.duration(), sample_rate);
        let mut out = Vec::with_capacity(total);

        let mut segments = self.segments.iter().filter(|s| !s.length.is_zero());
        let mut current = segments.next();
        let mut segment_start: u128 = 0;

        for i in 0..total {
            let t = i as u128 * NANOS_PER_SEC / sample_rate as u128;
            while let Some(seg) = current {
                let end = segment_start + seg.length.as_nanos();
                if t < end {
                    break;
                }
                segment_start = end;
                current = segments.next();
            }
            let level = match current {
                Some(seg) => seg.level_at(t - segment_start),
                None => self.level,
            };
            out.push(level);
        }
        out
    }

    fn volume(&self) -> f64 {
        self.level
    }

    fn continue_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.is_flat_at(self.level) => last.length += duration,
            _ => self.segments.push(Segment {
                length: duration,
                from: self.level,
                to: self.level,
            }),
        }
    }

    fn adjust_volume(&mut self, new_volume: f64, transition: Duration) {
        if !transition.is_zero() {
            self.segments.push(Segment {
                length: transition,
                from: self.level,
                to: new_volume,
            });
        }
        self.level = new_volume;
    }
}

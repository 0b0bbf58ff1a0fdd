//! Track sets: tracks that manage other tracks in bulk.
//!
//! A set mixes its members additively: the longest member decides the
//! duration, volumes add up, and signals are summed sample by sample. Sets
//! nest, so a whole arrangement is a tree with leaf generators at the
//! bottom.
//!
//! Members are shared (`Rc<RefCell<..>>`), never copied. [`TrackSet::exclude`]
//! hands out a second view over the same tracks, and mutating through either
//! view is visible in both. A set must never contain itself, directly or
//! through a nested set; doing so panics on the re-entrant borrow.

use std::cell::RefCell;
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use super::sample::Sample;
use super::source::{SharedTrack, Track, TrackId};
use crate::error::TrackError;

/// A nested set that may be referenced from several parents.
pub type SharedSet<S> = Rc<RefCell<TrackSet<S>>>;

/// A member of a [`TrackSet`].
///
/// Nested sets usually get their own variant, but a set stored as a plain
/// `Leaf` is still recognized through [`Track::as_set`] and evened out the
/// same way.
#[derive(Clone)]
pub enum Member<S: Sample> {
    Leaf(SharedTrack<S>),
    Set(SharedSet<S>),
}

impl<S: Sample> Member<S> {
    pub fn leaf<T: Track<S> + 'static>(track: T) -> Self {
        Member::Leaf(Rc::new(RefCell::new(track)))
    }

    pub fn set(set: TrackSet<S>) -> Self {
        Member::Set(Rc::new(RefCell::new(set)))
    }

    /// True for nested sets, whichever variant holds them.
    pub fn is_set(&self) -> bool {
        match self {
            Member::Leaf(t) => t.borrow().as_set().is_some(),
            Member::Set(_) => true,
        }
    }

    /// True when both members point at the same underlying track.
    pub fn ptr_eq(&self, other: &Member<S>) -> bool {
        match (self, other) {
            (Member::Leaf(a), Member::Leaf(b)) => Rc::ptr_eq(a, b),
            (Member::Set(a), Member::Set(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Member::Leaf(t) => t.borrow().duration(),
            Member::Set(s) => s.borrow().duration(),
        }
    }

    pub fn volume(&self) -> f64 {
        match self {
            Member::Leaf(t) => t.borrow().volume(),
            Member::Set(s) => s.borrow().volume(),
        }
    }

    pub fn encode(&self, sample_rate: u32) -> Vec<S> {
        match self {
            Member::Leaf(t) => t.borrow().encode(sample_rate),
            Member::Set(s) => s.borrow().encode(sample_rate),
        }
    }

    pub fn continue_for(&self, duration: Duration) {
        match self {
            Member::Leaf(t) => t.borrow_mut().continue_for(duration),
            Member::Set(s) => s.borrow_mut().continue_for(duration),
        }
    }

    pub fn adjust_volume(&self, new_volume: f64, transition: Duration) {
        match self {
            Member::Leaf(t) => t.borrow_mut().adjust_volume(new_volume, transition),
            Member::Set(s) => s.borrow_mut().adjust_volume(new_volume, transition),
        }
    }

    pub fn even_out(&self) {
        match self {
            Member::Leaf(t) => t.borrow_mut().even_out(),
            Member::Set(s) => s.borrow_mut().even_out(),
        }
    }
}

impl<S: Sample> std::fmt::Debug for Member<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Member::Leaf(t) => f
                .debug_struct("Leaf")
                .field("duration", &t.borrow().duration())
                .field("volume", &t.borrow().volume())
                .finish(),
            Member::Set(s) => f.debug_tuple("Set").field(&*s.borrow()).finish(),
        }
    }
}

/// A track made of other tracks, keyed by [`TrackId`].
///
/// Membership is fixed once the set is built; see [`TrackSet::builder`].
#[derive(Clone, Debug)]
pub struct TrackSet<S: Sample> {
    members: BTreeMap<TrackId, Member<S>>,
}

impl<S: Sample> Default for TrackSet<S> {
    fn default() -> Self {
        TrackSet {
            members: BTreeMap::new(),
        }
    }
}

impl<S: Sample> TrackSet<S> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TrackSetBuilder<S> {
        TrackSetBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Member<S>> {
        self.members.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TrackId> {
        self.members.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TrackId, Member<S>> {
        self.members.iter()
    }

    /// A set holding every member except the listed ones.
    ///
    /// The result shares its members with `self`. Unknown and repeated ids
    /// are ignored.
    pub fn exclude<I, K>(&self, ids: I) -> TrackSet<S>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let ids: Vec<K> = ids.into_iter().collect();
        let excluded: BTreeSet<&str> = ids.iter().map(K::as_ref).collect();
        let members = self
            .members
            .iter()
            .filter(|(id, _)| !excluded.contains(id.as_str()))
            .map(|(id, member)| (id.clone(), member.clone()))
            .collect();
        TrackSet { members }
    }
}

impl<S: Sample> Track<S> for TrackSet<S> {
    /// Duration of the longest member; zero for an empty set.
    fn duration(&self) -> Duration {
        self.members
            .values()
            .map(Member::duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Sum of every member's signal. Shorter members are padded with silence.
    fn encode(&self, sample_rate: u32) -> Vec<S> {
        let encoded: Vec<Vec<S>> = self
            .members
            .values()
            .map(|m| m.encode(sample_rate))
            .collect();
        let len = encoded.iter().map(Vec::len).max().unwrap_or(0);

        let mut mix = vec![S::ZERO; len];
        for track in &encoded {
            for (out, &sample) in mix.iter_mut().zip(track) {
                *out += sample;
            }
        }
        mix
    }

    /// Sum of the members' volumes.
    fn volume(&self) -> f64 {
        self.members.values().map(Member::volume).sum()
    }

    fn continue_for(&mut self, duration: Duration) {
        log::trace!("continue_for: {duration:?} across {} members", self.len());
        for member in self.members.values() {
            member.continue_for(duration);
        }
    }

    /// Continue every member until it is as long as the longest one.
    ///
    /// Nested sets are evened out internally before being compared against
    /// this set's longest member. Durations only ever grow.
    fn even_out(&mut self) {
        let target = self.duration();
        for (id, member) in &self.members {
            member.even_out();
            let current = member.duration();
            if current < target {
                log::trace!("even_out: extending '{id}' from {current:?} to {target:?}");
                member.continue_for(target - current);
            }
        }
    }

    fn as_set(&self) -> Option<&TrackSet<S>> {
        Some(self)
    }

    /// Ramp every member to an equal share of `new_volume`.
    ///
    /// Shares are equal regardless of the members' previous volumes. An empty
    /// set has nothing to share the volume between and is left untouched.
    fn adjust_volume(&mut self, new_volume: f64, transition: Duration) {
        if self.members.is_empty() {
            log::debug!("adjust_volume: ignoring volume {new_volume} on empty track set");
            return;
        }
        let share = new_volume / self.members.len() as f64;
        for member in self.members.values() {
            member.adjust_volume(share, transition);
        }
    }
}

impl<'a, S: Sample> IntoIterator for &'a TrackSet<S> {
    type Item = (&'a TrackId, &'a Member<S>);
    type IntoIter = btree_map::Iter<'a, TrackId, Member<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Collects members for a [`TrackSet`], rejecting duplicate ids.
pub struct TrackSetBuilder<S: Sample> {
    members: BTreeMap<TrackId, Member<S>>,
    duplicate: Option<TrackId>,
}

impl<S: Sample> TrackSetBuilder<S> {
    pub fn new() -> Self {
        TrackSetBuilder {
            members: BTreeMap::new(),
            duplicate: None,
        }
    }

    pub fn member(mut self, id: impl Into<TrackId>, member: Member<S>) -> Self {
        let id = id.into();
        if self.members.contains_key(&id) {
            self.duplicate.get_or_insert(id);
        } else {
            self.members.insert(id, member);
        }
        self
    }

    pub fn leaf<T: Track<S> + 'static>(self, id: impl Into<TrackId>, track: T) -> Self {
        self.member(id, Member::leaf(track))
    }

    pub fn shared(self, id: impl Into<TrackId>, track: SharedTrack<S>) -> Self {
        self.member(id, Member::Leaf(track))
    }

    pub fn set(self, id: impl Into<TrackId>, set: TrackSet<S>) -> Self {
        self.member(id, Member::set(set))
    }

    /// Finish the set, failing on the first id that was added twice.
    pub fn build(self) -> Result<TrackSet<S>, TrackError> {
        match self.duplicate {
            Some(id) => Err(TrackError::DuplicateId(id)),
            None => Ok(TrackSet {
                members: self.members,
            }),
        }
    }
}

impl<S: Sample> Default for TrackSetBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

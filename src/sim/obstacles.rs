//! Obstacle stream
//!
//! A rolling window of pipe pairs: spawned on the right, scrolled left each
//! tick, retired past the trailing edge. Front of the window is the oldest
//! (leftmost) pair; pairs are kept in spatial order.

use std::collections::VecDeque;

use rand::Rng;

use super::state::ObstaclePair;
use crate::Tuning;

/// Bounded, ordered set of active pipe pairs
#[derive(Debug, Clone)]
pub struct ObstacleWindow {
    pairs: VecDeque<ObstaclePair>,
    next_id: u32,
}

/// Pairs removed and added by a window reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowChange {
    pub retired: Vec<u32>,
    pub spawned: Vec<u32>,
}

impl Default for ObstacleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleWindow {
    pub fn new() -> Self {
        Self {
            pairs: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Oldest (leftmost) pair
    pub fn front(&self) -> Option<&ObstaclePair> {
        self.pairs.front()
    }

    /// Newest (rightmost) pair
    pub fn back(&self) -> Option<&ObstaclePair> {
        self.pairs.back()
    }

    pub fn get(&self, id: u32) -> Option<&ObstaclePair> {
        self.pairs.iter().find(|p| p.id == id)
    }

    /// Pairs from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &ObstaclePair> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ObstaclePair> {
        self.pairs.iter_mut()
    }

    /// Append a fresh pair at `x` with a randomised gap centre; returns its id
    pub fn spawn_pair<R: Rng>(&mut self, x: f32, tuning: &Tuning, rng: &mut R) -> u32 {
        let range = tuning.gap_offset_range();
        let offset = (rng.random::<f32>() - 0.5) * range;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.pairs
            .push_back(ObstaclePair::new(id, x, tuning.gap_center + offset, tuning));

        log::debug!("Spawned pair {} at x={:.3} gap={:.3}", id, x, tuning.gap_center + offset);
        id
    }

    /// Scroll every pair left by `speed`
    pub fn advance(&mut self, speed: f32) {
        for pair in &mut self.pairs {
            pair.shift_x(-speed);
        }
    }

    /// Retire the oldest pair once it is fully past `trailing_edge_x` and
    /// spawn its replacement
    ///
    /// The replacement goes to the spawn point, or exactly one spacing behind
    /// the current rearmost pair when that is further right.
    /// Returns `(retired, spawned)` ids.
    pub fn recycle<R: Rng>(
        &mut self,
        trailing_edge_x: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<(u32, u32)> {
        let front_x = self.pairs.front()?.x();
        if front_x >= trailing_edge_x - tuning.pipe_width {
            return None;
        }

        let retired = self.pairs.pop_front()?.id;
        log::debug!("Retired pair {} at x={:.3}", retired, front_x);

        let x = match self.pairs.back() {
            Some(rear) => tuning.spawn_x.max(rear.x() + tuning.spacing),
            None => tuning.spawn_x,
        };
        let spawned = self.spawn_pair(x, tuning, rng);
        Some((retired, spawned))
    }

    /// Top the window up to `max_count`, one spacing at a time
    ///
    /// Only spawns while the rearmost pair has scrolled left of
    /// `spawn_x - spacing`. An empty window is seeded at `spawn_x`.
    pub fn fill_if_needed<R: Rng>(
        &mut self,
        spawn_x: f32,
        spacing: f32,
        max_count: usize,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<u32> {
        let mut spawned = Vec::new();
        while self.pairs.len() < max_count {
            let x = match self.pairs.back() {
                Some(rear) if rear.x() < spawn_x - spacing => rear.x() + spacing,
                Some(_) => break,
                None => spawn_x,
            };
            spawned.push(self.spawn_pair(x, tuning, rng));
        }
        spawned
    }

    /// Remove every pair; returns their ids oldest first
    pub fn clear(&mut self) -> Vec<u32> {
        self.pairs.drain(..).map(|p| p.id).collect()
    }

    /// Replace the window with `max_pipes` evenly spaced pairs starting at the spawn point
    pub fn reset_window<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> WindowChange {
        let retired = self.clear();

        let mut spawned = Vec::new();
        let mut x = tuning.spawn_x;
        for i in 0..tuning.max_pipes {
            if i > 0 {
                x += tuning.spacing;
            }
            spawned.push(self.spawn_pair(x, tuning, rng));
        }

        WindowChange { retired, spawned }
    }
}

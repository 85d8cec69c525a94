//! Play queue generation
//!
//! A session plays every tier-1 level, then every tier-2 level, then every
//! tier-3 level. Order inside a tier is shuffled each session. The tier-1
//! maze level doesn't take part in the tier-1 shuffle: it always closes
//! tier 1.

use std::ops::Deref;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::catalog::{LevelDescriptor, LevelId, Tier};

/// Ordered levels for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayQueue {
    levels: Vec<LevelDescriptor>,
}

impl PlayQueue {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<LevelDescriptor> {
        self.levels
    }

    /// Index of the pinned maze level, if the queue has one
    ///
    /// Only a maze level sitting right before the first tier-2/3 level (or
    /// at the end of an all-tier-1 queue) counts as pinned.
    pub fn maze_position(&self) -> Option<usize> {
        let tier1_end = self
            .levels
            .iter()
            .position(|l| l.tier() != Some(Tier::One))
            .unwrap_or(self.levels.len());
        let last = tier1_end.checked_sub(1)?;
        self.levels[last].is_maze().then_some(last)
    }
}

impl Deref for PlayQueue {
    type Target = [LevelDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.levels
    }
}

impl From<Vec<LevelDescriptor>> for PlayQueue {
    fn from(levels: Vec<LevelDescriptor>) -> Self {
        Self::new(levels)
    }
}

impl<'a> IntoIterator for &'a PlayQueue {
    type Item = &'a LevelDescriptor;
    type IntoIter = std::slice::Iter<'a, LevelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

/// Build a play queue using the thread-local RNG
pub fn generate_queue(catalog: &[LevelDescriptor]) -> PlayQueue {
    generate_queue_with_rng(catalog, &mut rand::rng())
}

/// Build a reproducible play queue from a seed
pub fn generate_queue_seeded(catalog: &[LevelDescriptor], seed: u64) -> PlayQueue {
    let mut rng = Pcg32::seed_from_u64(seed);
    generate_queue_with_rng(catalog, &mut rng)
}

/// Build a play queue drawing randomness from `rng`
///
/// Levels outside tiers 1-3 are dropped. If tier 1 holds several maze
/// levels, the first one in catalog order is pinned and the rest are
/// shuffled along with the other tier-1 levels.
pub fn generate_queue_with_rng<R: Rng + ?Sized>(
    catalog: &[LevelDescriptor],
    rng: &mut R,
) -> PlayQueue {
    let mut tier1 = Vec::new();
    let mut tier2 = Vec::new();
    let mut tier3 = Vec::new();
    let mut maze: Option<LevelDescriptor> = None;
    let mut extra_mazes: Vec<&LevelId> = Vec::new();
    let mut dropped = 0;

    for level in catalog {
        match level.tier() {
            Some(Tier::One) if level.is_maze() => {
                if maze.is_none() {
                    maze = Some(level.clone());
                } else {
                    extra_mazes.push(&level.id);
                    tier1.push(level.clone());
                }
            }
            Some(Tier::One) => tier1.push(level.clone()),
            Some(Tier::Two) => tier2.push(level.clone()),
            Some(Tier::Three) => tier3.push(level.clone()),
            None => dropped += 1,
        }
    }

    if !extra_mazes.is_empty() {
        let ids: Vec<String> = extra_mazes.iter().map(|id| id.to_string()).collect();
        log::warn!(
            "Tier 1 has {} extra maze levels ({}); only the first is pinned",
            ids.len(),
            ids.join(", ")
        );
    }

    tier1.shuffle(rng);
    tier2.shuffle(rng);
    tier3.shuffle(rng);

    log::debug!(
        "Queue: {} tier-1 + {} maze + {} tier-2 + {} tier-3 ({} dropped)",
        tier1.len(),
        usize::from(maze.is_some()),
        tier2.len(),
        tier3.len(),
        dropped
    );

    let mut levels = Vec::with_capacity(tier1.len() + tier2.len() + tier3.len() + 1);
    levels.extend(tier1);
    levels.extend(maze);
    levels.extend(tier2);
    levels.extend(tier3);

    PlayQueue { levels }
}

//! Session flow
//!
//! Drives the store through one play-through: menu → game → results.
//! The controller owns a [`GameStore`] handle and is the only place that
//! writes several cells as one step.

use rand::Rng;

use crate::catalog::{LevelCatalog, LevelDescriptor};
use crate::consts::DEFAULT_HEARTS;
use crate::queue::{PlayQueue, generate_queue_with_rng};
use crate::store::{GameStore, Screen};

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every level in the queue was completed
    Victory,
    /// Ran out of hearts
    Defeat,
}

/// Result of completing or failing a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Play continues at this queue index
    Continue(usize),
    /// The session is over; the results screen is up
    Finished(Outcome),
}

/// Device orientation as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Session controller over a shared store
#[derive(Debug, Clone)]
pub struct Session {
    store: GameStore,
    /// Screen to restore once the device is turned back to landscape
    resume_screen: Option<Screen>,
}

impl Session {
    pub fn new(store: GameStore) -> Self {
        Self {
            store,
            resume_screen: None,
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Start a new session with a freshly shuffled queue
    pub fn start(&mut self, catalog: &LevelCatalog) {
        self.start_with_rng(catalog, &mut rand::rng());
    }

    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, catalog: &LevelCatalog, rng: &mut R) {
        let queue = generate_queue_with_rng(catalog.levels(), rng);
        self.begin(queue);
    }

    /// Start a new session on a prepared queue
    pub fn begin(&mut self, queue: PlayQueue) {
        let count = queue.len();
        // Single write so subscribers never see a half-built queue
        self.store.levels.set(queue);
        self.store.current_level_index.set(0);
        self.store.hearts.set(DEFAULT_HEARTS);

        if count == 0 {
            log::warn!("Session started with an empty play queue");
            self.show(Screen::Results);
        } else {
            log::info!("Session started: {} levels", count);
            self.show(Screen::Playing);
        }
    }

    /// Level currently being played
    pub fn current_level(&self) -> Option<LevelDescriptor> {
        let index = self.store.current_level_index.get();
        self.store.levels.with(|queue| queue.get(index).cloned())
    }

    /// Mark the current level as passed and move on
    ///
    /// Once the session is over this just reports the existing outcome.
    pub fn complete_level(&mut self) -> Progress {
        if let Some(outcome) = self.outcome() {
            return Progress::Finished(outcome);
        }
        let next = self.store.current_level_index.get() + 1;
        let total = self.store.levels.with(|queue| queue.len());
        self.store.current_level_index.set(next);

        if next >= total {
            log::info!("All {} levels completed", total);
            self.show(Screen::Results);
            Progress::Finished(Outcome::Victory)
        } else {
            Progress::Continue(next)
        }
    }

    /// Mark the current level as failed; costs one heart
    ///
    /// Once the session is over this just reports the existing outcome.
    pub fn fail_level(&mut self) -> Progress {
        if let Some(outcome) = self.outcome() {
            return Progress::Finished(outcome);
        }
        let hearts = self.store.hearts.get().saturating_sub(1);
        self.store.hearts.set(hearts);

        if hearts == 0 {
            log::info!("Out of hearts at level {}", self.store.current_level_index.get());
            self.show(Screen::Results);
            Progress::Finished(Outcome::Defeat)
        } else {
            Progress::Continue(self.store.current_level_index.get())
        }
    }

    /// Result to show on the results screen, `None` while still playing
    pub fn outcome(&self) -> Option<Outcome> {
        if self.store.hearts.get() == 0 {
            return Some(Outcome::Defeat);
        }
        let index = self.store.current_level_index.get();
        let total = self.store.levels.with(|queue| queue.len());
        (index >= total).then_some(Outcome::Victory)
    }

    pub fn return_to_menu(&mut self) {
        self.show(Screen::Menu);
    }

    /// React to a device rotation
    ///
    /// Portrait covers whatever is showing with the rotate prompt; turning
    /// back restores it.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        match orientation {
            Orientation::Portrait => {
                let current = self.store.screen.get();
                if current != Screen::Orientation {
                    self.resume_screen = Some(current);
                    self.store.screen.set(Screen::Orientation);
                }
            }
            Orientation::Landscape => {
                if let Some(screen) = self.resume_screen.take() {
                    self.store.screen.set(screen);
                }
            }
        }
    }

    /// Switch screens, deferring to the rotate prompt if it's up
    fn show(&mut self, screen: Screen) {
        if self.resume_screen.is_some() {
            self.resume_screen = Some(screen);
        } else {
            self.store.screen.set(screen);
        }
    }
}

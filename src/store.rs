//! Observable game state
//!
//! The UI reads and writes a handful of named cells and re-renders when they
//! change. Everything here runs on the single UI thread, so cells are plain
//! `Rc<RefCell<_>>` handles: cloning a cell (or the whole [`GameStore`])
//! shares the underlying value.
//!
//! Cells carry no game logic and enforce nothing across each other; see
//! [`crate::session`] for the rules that tie them together.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::{DEFAULT_HEARTS, DEFAULT_OUTFIT};
use crate::queue::PlayQueue;

type Listener<T> = Rc<dyn Fn(&T)>;

struct CellInner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_listener_id: u64,
    /// Writes waiting to be delivered
    pending: VecDeque<T>,
    notifying: bool,
}

/// A single observable value
///
/// Subscribers are called with the current value when they subscribe and
/// again after every `set`/`update`, in subscription order. A write made
/// from inside a subscriber is delivered once the current round finishes.
pub struct StateCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateCell")
            .field("value", &inner.value)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value,
                listeners: Vec::new(),
                next_listener_id: 0,
                pending: VecDeque::new(),
                notifying: false,
            })),
        }
    }

    /// Current value (cloned)
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning
    ///
    /// Don't write to this cell from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            inner.pending.push_back(value);
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }
        self.flush();
    }

    /// Compute the new value from the current one
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.with(f);
        self.set(next);
    }

    /// Register a subscriber; it's called right away with the current value
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(listener);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.push((id, Rc::clone(&listener)));
            (id, inner.value.clone())
        };
        listener(&current);

        let weak: Weak<RefCell<CellInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn flush(&self) {
        let _guard = FlushGuard { inner: &self.inner };
        loop {
            let (value, listeners) = {
                let mut inner = self.inner.borrow_mut();
                match inner.pending.pop_front() {
                    Some(value) => {
                        let listeners: Vec<(u64, Listener<T>)> = inner
                            .listeners
                            .iter()
                            .map(|(id, l)| (*id, Rc::clone(l)))
                            .collect();
                        (value, listeners)
                    }
                    None => return,
                }
            };
            for (id, listener) in listeners {
                // An earlier listener in this round may have unsubscribed it
                if self.is_subscribed(id) {
                    listener(&value);
                }
            }
        }
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.inner.borrow().listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Ends a notification round, including one cut short by a panicking
/// listener, so later writes are delivered again.
struct FlushGuard<'a, T> {
    inner: &'a RefCell<CellInner<T>>,
}

impl<T> Drop for FlushGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.notifying = false;
            inner.pending.clear();
        }
    }
}

/// Handle returned by [`StateCell::subscribe`]
///
/// The subscriber stays registered until this is dropped or
/// [`Subscription::unsubscribe`] is called.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Which screen the UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// "Rotate your phone" prompt
    Orientation,
    /// Main menu
    #[default]
    Menu,
    /// A level is being played
    #[serde(rename = "game")]
    Playing,
    /// Victory/defeat screen
    Results,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Orientation => "orientation",
            Screen::Menu => "menu",
            Screen::Playing => "game",
            Screen::Results => "results",
        }
    }
}

/// All state cells shared by the UI
///
/// Construct one at the application root and hand clones to components.
#[derive(Debug, Clone)]
pub struct GameStore {
    pub screen: StateCell<Screen>,
    /// Index into `levels` of the level being played
    pub current_level_index: StateCell<usize>,
    /// Lives left
    pub hearts: StateCell<u32>,
    /// Play queue for the running session
    pub levels: StateCell<PlayQueue>,
    /// Selected character outfit id
    pub outfit: StateCell<String>,
    pub config: StateCell<GameConfig>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            screen: StateCell::new(Screen::Menu),
            current_level_index: StateCell::new(0),
            hearts: StateCell::new(DEFAULT_HEARTS),
            levels: StateCell::new(PlayQueue::default()),
            outfit: StateCell::new(DEFAULT_OUTFIT.to_string()),
            config: StateCell::new(GameConfig::default()),
        }
    }

    /// Copy of every cell's current value
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            screen: self.screen.get(),
            current_level_index: self.current_level_index.get(),
            hearts: self.hearts.get(),
            levels: self.levels.get(),
            outfit: self.outfit.get(),
            config: self.config.get(),
        }
    }
}

/// Plain-data view of a [`GameStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub current_level_index: usize,
    pub hearts: u32,
    pub levels: PlayQueue,
    pub outfit: String,
    pub config: GameConfig,
}

//! Held-key tracking for terminal environments.
//!
//! The engine wants a press edge and a release edge for every movement key. Terminals
//! with the keyboard enhancement protocol report releases directly; the rest only send
//! presses (plus OS auto-repeat presses while a key stays down). For those, a key that
//! has not been seen for `release_timeout_ms` is released synthetically.

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{binding_for, HeldKey, KeyBinding};
use crate::types::Command;

// Long enough to bridge the gap between OS auto-repeat presses.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Turns raw key events into engine edges.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    /// Milliseconds since each held key was last seen; `None` when up
    held: [Option<u32>; 3],
    /// Set once the terminal has sent a real release event
    releases_reported: bool,
    release_timeout_ms: u32,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            held: [None; 3],
            releases_reported: false,
            release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn release_timeout_ms(&self) -> u32 {
        self.release_timeout_ms
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.held[key.index()].is_some()
    }

    /// Press a held key. Only the first press emits an edge; repeats refresh the timeout.
    pub fn press(&mut self, key: HeldKey) -> Option<Command> {
        let slot = &mut self.held[key.index()];
        let fresh = slot.is_none();
        *slot = Some(0);
        fresh.then(|| key.press())
    }

    pub fn release(&mut self, key: HeldKey) -> Option<Command> {
        self.held[key.index()].take().map(|_| key.release())
    }

    /// Feed one terminal key event.
    ///
    /// Returns the engine commands it produces and, for keys that are not engine
    /// input, the binding for the caller to handle.
    pub fn handle_event(&mut self, key: KeyEvent) -> (Option<Command>, Option<KeyBinding>) {
        let Some(binding) = binding_for(key.code) else {
            return (None, None);
        };

        match (binding, key.kind) {
            (KeyBinding::Held(held), KeyEventKind::Release) => {
                self.releases_reported = true;
                (self.release(held), None)
            }
            (KeyBinding::Held(held), _) => (self.press(held), None),
            (KeyBinding::Tap(command), KeyEventKind::Press) => (Some(command), None),
            (KeyBinding::Tap(_), _) => (None, None),
            (other, KeyEventKind::Press) => (None, Some(other)),
            (_, _) => (None, None),
        }
    }

    /// Age the held keys by one tick and release any that timed out.
    ///
    /// Does nothing once the terminal has proven it reports releases.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<Command, 3> {
        let mut released = ArrayVec::<Command, 3>::new();
        if self.releases_reported {
            return released;
        }

        for key in HeldKey::ALL {
            let Some(age) = self.held[key.index()].as_mut() else {
                continue;
            };
            *age = age.saturating_add(elapsed_ms);
            if *age > self.release_timeout_ms {
                self.held[key.index()] = None;
                released.push(key.release());
            }
        }
        released
    }

    /// Release every held key, e.g. when the game is paused or restarted.
    pub fn reset(&mut self) -> ArrayVec<Command, 3> {
        HeldKey::ALL
            .into_iter()
            .filter_map(|key| self.release(key))
            .collect()
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

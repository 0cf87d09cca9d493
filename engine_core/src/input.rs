//! Keyboard state with one-frame edge latches
//!
//! The host feeds key transitions with [`Input::press`] and [`Input::release`];
//! behaviours poll during their hooks. The engine calls [`Input::end_frame`]
//! after every tick so `key_down`/`key_up` only report the frame they happened.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Input {
    inert: bool,
    held: HashSet<String>,
    pressed: HashSet<String>,
    released: HashSet<String>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input without a host window: every query reports "not pressed".
    pub fn inert() -> Self {
        Self {
            inert: true,
            ..Self::default()
        }
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn press(&mut self, key: &str) {
        if self.inert {
            return;
        }
        if self.held.insert(key.to_owned()) {
            self.pressed.insert(key.to_owned());
        }
    }

    pub fn release(&mut self, key: &str) {
        if self.inert {
            return;
        }
        if self.held.remove(key) {
            self.released.insert(key.to_owned());
        }
    }

    pub fn key_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// True only during the frame the key went down
    pub fn key_down(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    /// True only during the frame the key went up
    pub fn key_up(&self, key: &str) -> bool {
        self.released.contains(key)
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

//! Modifier key definitions and key-down events
//!
//! Windows report raw key-downs as a key name plus the modifier flags
//! held at that moment. Modifier tokens always appear in the fixed
//! order Ctrl, Alt, Shift, Super.

use serde::{Deserialize, Serialize};

/// A modifier key that may take part in a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    /// Order in which modifiers are written into a chord
    pub const ORDER: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Super];

    /// Token used in chords and accelerators
    pub fn token(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }

    /// Parse a chord token back into a modifier
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|m| m.token() == token)
    }

    /// Position within [`Modifier::ORDER`]
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Tracks which modifier keys are physically held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Meta / Command / Windows key
    pub super_key: bool,
}

impl ModifierState {
    /// Builder used by event sources: mark `modifier` as held
    pub fn with(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Shift => self.shift = true,
            Modifier::Super => self.super_key = true,
        }
        self
    }

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn is_held(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Shift => self.shift,
            Modifier::Super => self.super_key,
        }
    }

    /// Held modifiers in chord order, independent of press order
    pub fn held(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ORDER.into_iter().filter(|m| self.is_held(*m))
    }
}

/// A raw key-down delivered to a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDown {
    key: String,
    modifiers: ModifierState,
    default_prevented: bool,
}

impl KeyDown {
    pub fn new(key: impl Into<String>, modifiers: ModifierState) -> Self {
        Self {
            key: key.into(),
            modifiers,
            default_prevented: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Stop the window system from running the key's default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Normalize a raw key name into a terminal chord token
///
/// Returns `None` when the key is itself a modifier (or empty), since
/// those never form the terminal token.
pub fn normalize_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    if key == " " {
        return Some("SPACE".to_string());
    }

    let upper = key.to_uppercase();
    match upper.as_str() {
        "CONTROL" | "ALT" | "ALTGRAPH" | "SHIFT" | "META" | "SUPER" | "OS" => None,
        "SPACEBAR" => Some("SPACE".to_string()),
        _ => Some(upper),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = ModifierState::default();
        assert!(state.is_empty());
        assert_eq!(state.held().count(), 0);
    }

    #[test]
    fn test_held_uses_fixed_order() {
        // Pressed Super first, then Shift, then Ctrl
        let state = ModifierState::default()
            .with(Modifier::Super)
            .with(Modifier::Shift)
            .with(Modifier::Ctrl);

        let held: Vec<_> = state.held().collect();
        assert_eq!(held, vec![Modifier::Ctrl, Modifier::Shift, Modifier::Super]);
    }

    #[test]
    fn test_modifier_token_roundtrip() {
        for modifier in Modifier::ORDER {
            assert_eq!(Modifier::from_token(modifier.token()), Some(modifier));
        }
        assert_eq!(Modifier::from_token("V"), None);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("v").as_deref(), Some("V"));
        assert_eq!(normalize_key("F5").as_deref(), Some("F5"));
        assert_eq!(normalize_key(" ").as_deref(), Some("SPACE"));
        assert_eq!(normalize_key("Control"), None);
        assert_eq!(normalize_key("Meta"), None);
        assert_eq!(normalize_key("shift"), None);
        assert_eq!(normalize_key(""), None);
    }

    #[test]
    fn test_prevent_default() {
        let mut event = KeyDown::new("a", ModifierState::default());
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}

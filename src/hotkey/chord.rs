//! Hotkey combinations (chords)

use serde::{Deserialize, Serialize};

use super::keys::{normalize_key, KeyDown, Modifier};

/// An ordered sequence of key tokens: modifiers first, then the key
///
/// Serialized as a plain JSON array, e.g. `["Ctrl", "Alt", "K"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotkeyCombination(Vec<String>);

/// Reasons a chord cannot be committed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordError {
    #[error("hotkey is empty")]
    Empty,

    #[error("at least one modifier key required")]
    MissingModifier,

    #[error("hotkey has no terminal key")]
    MissingKey,

    #[error("modifier '{0}' is duplicated or out of order")]
    ModifierOrder(String),

    #[error("unexpected token '{0}' after terminal key")]
    TrailingToken(String),

    #[error("key token '{0}' is not uppercase")]
    NotNormalized(String),
}

impl HotkeyCombination {
    /// Binding used until the user saves one
    pub fn default_binding() -> Self {
        Self::from_tokens(["Alt", "V"])
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Build a candidate chord from a key-down
    ///
    /// Held modifiers are written in the fixed order, followed by the
    /// pressed key unless that key is itself a modifier.
    pub fn from_key_down(event: &KeyDown) -> Self {
        let mut tokens: Vec<String> = event
            .modifiers()
            .held()
            .map(|m| m.token().to_string())
            .collect();

        if let Some(key) = normalize_key(event.key()) {
            tokens.push(key);
        }

        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().filter_map(|t| Modifier::from_token(t))
    }

    pub fn has_modifier(&self) -> bool {
        self.modifiers().next().is_some()
    }

    /// The non-modifier token, if the chord ends with one
    pub fn terminal_key(&self) -> Option<&str> {
        self.0
            .last()
            .filter(|t| Modifier::from_token(t).is_none())
            .map(String::as_str)
    }

    /// Check the chord is complete enough to be registered as a hotkey
    pub fn validate(&self) -> Result<(), ChordError> {
        if self.0.is_empty() {
            return Err(ChordError::Empty);
        }

        let mut last_rank = None;
        let mut terminal_seen = false;
        for token in &self.0 {
            if terminal_seen {
                return Err(ChordError::TrailingToken(token.clone()));
            }
            match Modifier::from_token(token) {
                Some(modifier) => {
                    if last_rank.is_some_and(|rank| rank >= modifier.rank()) {
                        return Err(ChordError::ModifierOrder(token.clone()));
                    }
                    last_rank = Some(modifier.rank());
                }
                None => {
                    if *token != token.to_uppercase() {
                        return Err(ChordError::NotNormalized(token.clone()));
                    }
                    terminal_seen = true;
                }
            }
        }

        if last_rank.is_none() {
            return Err(ChordError::MissingModifier);
        }
        if !terminal_seen {
            return Err(ChordError::MissingKey);
        }
        Ok(())
    }

    /// Compact form used for OS registration, e.g. `Alt+V`
    pub fn accelerator(&self) -> String {
        self.0.join("+")
    }
}

/// Human form used in messages, e.g. `Alt + V`
impl std::fmt::Display for HotkeyCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" + "))
    }
}

//! Sliding-window detection of a fixed input sequence inside a token stream.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized identity of one discrete input event (a key press, for example).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputToken(String);

impl InputToken {
    /// Builds a token from a host key name.
    ///
    /// Single printable characters are lowercased so `B` and `b` match; named keys such as
    /// `ArrowUp` keep their spelling. Unknown names are still valid tokens.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self(ch.to_lowercase().collect()),
            _ => Self(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputToken {
    fn from(key: &str) -> Self {
        Self::from_key(key)
    }
}

/// Up, up, down, down, left, right, left, right, B, A.
pub fn konami_sequence() -> Vec<InputToken> {
    [
        "ArrowUp",
        "ArrowUp",
        "ArrowDown",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
        "ArrowLeft",
        "ArrowRight",
        "b",
        "a",
    ]
    .into_iter()
    .map(InputToken::from_key)
    .collect()
}

/// Keeps the last `target.len()` tokens and reports when they equal the target.
#[derive(Debug, Clone)]
pub struct SequenceMatcher<T> {
    target: Vec<T>,
    buffer: VecDeque<T>,
}

impl<T: PartialEq + Clone> SequenceMatcher<T> {
    pub fn new(target: Vec<T>) -> Self {
        let capacity = target.len();
        Self {
            target,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn target(&self) -> &[T] {
        &self.target
    }

    /// Tokens currently held, oldest first.
    pub fn buffered(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Feeds one token. Returns `true` when it completes the target sequence, in which case the
    /// buffer is cleared so overlapping suffixes cannot fire again.
    ///
    /// An empty target never matches.
    pub fn push(&mut self, token: T) -> bool {
        if self.target.is_empty() {
            return false;
        }
        self.buffer.push_back(token);
        while self.buffer.len() > self.target.len() {
            self.buffer.pop_front();
        }
        let matched = self.buffer.len() == self.target.len()
            && self.buffer.iter().zip(&self.target).all(|(a, b)| a == b);
        if matched {
            self.buffer.clear();
        }
        matched
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(matcher: &mut SequenceMatcher<InputToken>, keys: &[&str]) -> usize {
        keys.iter()
            .filter(|key| matcher.push(InputToken::from_key(key)))
            .count()
    }

    const KONAMI_KEYS: [&str; 10] = [
        "ArrowUp",
        "ArrowUp",
        "ArrowDown",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
        "ArrowLeft",
        "ArrowRight",
        "b",
        "a",
    ];

    #[test]
    fn exact_sequence_triggers_once() {
        let mut matcher = SequenceMatcher::new(konami_sequence());
        assert_eq!(feed(&mut matcher, &KONAMI_KEYS), 1);
        assert_eq!(matcher.buffered().count(), 0);
    }

    #[test]
    fn altered_sequence_never_triggers() {
        for position in 0..KONAMI_KEYS.len() {
            let mut keys = KONAMI_KEYS;
            keys[position] = "Enter";
            let mut matcher = SequenceMatcher::new(konami_sequence());
            assert_eq!(feed(&mut matcher, &keys), 0, "altered at {position}");
        }
    }

    #[test]
    fn back_to_back_sequences_trigger_twice() {
        let mut matcher = SequenceMatcher::new(konami_sequence());
        let mut keys = KONAMI_KEYS.to_vec();
        keys.extend_from_slice(&KONAMI_KEYS);
        assert_eq!(feed(&mut matcher, &keys), 2);
    }

    #[test]
    fn leading_noise_is_trimmed_from_the_window() {
        let mut matcher = SequenceMatcher::new(konami_sequence());
        let mut keys = vec!["x", "Shift", "ArrowUp", "ArrowDown", "🙂"];
        keys.extend_from_slice(&KONAMI_KEYS);
        assert_eq!(feed(&mut matcher, &keys), 1);
    }

    #[test]
    fn cleared_buffer_blocks_overlapping_suffix_matches() {
        let mut matcher = SequenceMatcher::new(vec!['a', 'a']);
        let hits: Vec<bool> = "aaaa".chars().map(|ch| matcher.push(ch)).collect();
        assert_eq!(hits, vec![false, true, false, true]);
    }

    #[test]
    fn empty_target_never_matches() {
        let mut matcher: SequenceMatcher<char> = SequenceMatcher::new(Vec::new());
        assert!(!matcher.push('a'));
        assert_eq!(matcher.buffered().count(), 0);
    }

    #[test]
    fn single_character_keys_are_case_insensitive() {
        assert_eq!(InputToken::from_key("B"), InputToken::from_key("b"));
        assert_eq!(InputToken::from_key("ArrowUp").as_str(), "ArrowUp");
        assert_ne!(InputToken::from_key("ArrowUp"), InputToken::from_key("arrowup"));
    }
}

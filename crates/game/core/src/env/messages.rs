//! Human-readable combat messages.
//!
//! The core pushes short event strings tagged with a [`Tone`]; rendering
//! them is left to the host. This stream is independent of `tracing`.

use std::collections::VecDeque;

use crate::config::CombatConfig;

/// Semantic colour tag attached to a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tone {
    Neutral,
    PlayerAttack,
    EnemyAttack,
    PlayerDeath,
    EnemyDeath,
    /// The attempted action is not possible right now.
    Impossible,
    Progress,
    Equipment,
}

/// Receiver for combat messages.
pub trait MessageSink {
    fn push(&mut self, text: String, tone: Tone);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn push(&mut self, _text: String, _tone: Tone) {}
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub text: String,
    pub tone: Tone,
    /// How many consecutive times this exact message was pushed.
    pub count: u32,
}

impl Message {
    /// Text with a `(xN)` suffix for repeats.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Bounded in-memory message history. Oldest messages fall off first.
#[derive(Clone, Debug)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(CombatConfig::MESSAGE_LOG_CAPACITY)
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|message| message.text.as_str())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts().any(|candidate| candidate == text)
    }
}

impl MessageSink for MessageLog {
    fn push(&mut self, text: String, tone: Tone) {
        if let Some(last) = self.messages.back_mut() {
            if last.text == text && last.tone == tone {
                last.count += 1;
                return;
            }
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message {
            text,
            tone,
            count: 1,
        });
    }
}

/// Rounds to three significant figures for display.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_owned();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    let scale = 10f64.powi(2 - magnitude);
    let rounded = (value * scale).round() / scale;
    let text = format!("{rounded:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    }
}

/// Upper-cases the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

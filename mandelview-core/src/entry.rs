//! Modal numeric entry for the view and iteration parameters.

use crate::view::View;

/// Longest accepted input, in characters.
pub const MAX_INPUT_LEN: usize = 98;

/// Which parameter a numeric entry edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTarget {
    MaxIteration,
    Zoom,
    OffsetX,
    OffsetY,
}

impl EntryTarget {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::MaxIteration => "Max iterations",
            Self::Zoom => "Zoom",
            Self::OffsetX => "Offset X",
            Self::OffsetY => "Offset Y",
        }
    }
}

/// A value accepted by [`NumericEntry::confirm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryValue {
    MaxIteration(u32),
    View(View),
}

/// Text buffer for one open numeric menu.
#[derive(Debug, Clone)]
pub struct NumericEntry {
    target: EntryTarget,
    buffer: String,
}

impl NumericEntry {
    pub fn new(target: EntryTarget) -> Self {
        Self {
            target,
            buffer: String::new(),
        }
    }

    pub fn target(&self) -> EntryTarget {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Append typed text, keeping only digits, a single `.` and a leading `-`.
    pub fn insert(&mut self, text: &str) {
        for ch in text.chars() {
            if self.buffer.len() >= MAX_INPUT_LEN {
                break;
            }
            let accept = match ch {
                '0'..='9' => true,
                '.' => !self.buffer.contains('.'),
                '-' => self.buffer.is_empty(),
                _ => false,
            };
            if accept {
                self.buffer.push(ch);
            }
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Parse the buffer and apply it to the current parameters.
    ///
    /// Returns `None` when the text does not parse or the value is out of
    /// range; the caller keeps the menu open in that case.
    pub fn confirm(&self, view: &View) -> Option<EntryValue> {
        let value: f64 = self.buffer.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        match self.target {
            EntryTarget::MaxIteration => {
                let truncated = value.trunc();
                let n = if truncated < 1.0 {
                    1
                } else if truncated >= u32::MAX as f64 {
                    u32::MAX
                } else {
                    truncated as u32
                };
                Some(EntryValue::MaxIteration(n))
            }
            EntryTarget::Zoom if value <= 0.0 => None,
            EntryTarget::Zoom => Some(EntryValue::View(View {
                zoom: value,
                ..*view
            })),
            EntryTarget::OffsetX => Some(EntryValue::View(View {
                offset_x: value,
                ..*view
            })),
            EntryTarget::OffsetY => Some(EntryValue::View(View {
                offset_y: value,
                ..*view
            })),
        }
    }
}

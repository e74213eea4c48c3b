//! # Navigation
//!
//! Which section is on screen and which language its text is shown in.
//!
//! The index is clamped to `[0, len)`: moving past either end is a no-op,
//! never a wrap. There is no way to set the index directly, so an
//! out-of-range section lookup cannot be produced from here.

use crate::core::content::{ContentStore, Language, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    len: usize,
    language: Language,
}

impl Navigator {
    /// A navigator over `len` sections, starting at the first one.
    /// `len` is treated as at least 1.
    pub fn new(len: usize, language: Language) -> Self {
        Self {
            index: 0,
            len: len.max(1),
            language,
        }
    }

    pub fn for_store(store: &ContentStore, language: Language) -> Self {
        Self::new(store.len(), language)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 1-based position and total, for display.
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.len)
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Step back one section. Returns false (and does nothing) at the first.
    pub fn go_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one section. Returns false (and does nothing) at the last.
    pub fn go_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Returns true if the language actually changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    /// The section this navigator points at.
    ///
    /// The store must be the one the navigator was built for.
    pub fn current<'a>(&self, store: &'a ContentStore) -> &'a Section {
        let last = store.len().saturating_sub(1);
        match store.get(self.index.min(last)) {
            Some(section) => section,
            None => unreachable!("content store is validated to be non-empty"),
        }
    }
}

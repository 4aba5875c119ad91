// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental keyboard search over item labels.
//!
//! Characters typed in quick succession build a prefix; a pause longer than
//! [`TypeAheadConfig::timeout_ms`] starts a new one. Time comes from an injected
//! [`Clock`] so sessions can be driven deterministically.
//!
//! ```
//! use treegrid_input::type_ahead::{ManualClock, TypeAheadSession};
//!
//! let labels = ["apple", "banana", "blueberry", "cherry"];
//! let clock = ManualClock::new();
//! let mut search = TypeAheadSession::new(&clock);
//!
//! assert_eq!(search.search('b', &labels[..], 0), Some(1));
//! assert_eq!(search.search('l', &labels[..], 1), Some(2));
//!
//! // After a pause the prefix starts over.
//! clock.advance(2_000);
//! assert_eq!(search.search('c', &labels[..], 2), Some(3));
//! ```

use alloc::borrow::Cow;
use alloc::string::String;
use core::cell::Cell;

/// Millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// A clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    /// Moves the clock forward.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Sets the current time.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Wall-clock time measured from the clock's creation.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "u64 milliseconds cover half a billion years"
    )]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Label text for type-ahead matching.
pub trait ItemText {
    /// The searchable text of `row`.
    fn item_text(&self, row: usize) -> Cow<'_, str>;

    /// Number of rows.
    fn row_count(&self) -> usize;
}

impl<S: AsRef<str>> ItemText for [S] {
    fn item_text(&self, row: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.get(row).map_or("", AsRef::as_ref))
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

/// Type-ahead settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeAheadConfig {
    /// Pause after which the next character starts a new prefix.
    pub timeout_ms: u64,
    /// Match case exactly.
    pub case_sensitive: bool,
}

impl Default for TypeAheadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1_000,
            case_sensitive: false,
        }
    }
}

/// An incremental search prefix with its timeout.
#[derive(Clone, Debug)]
pub struct TypeAheadSession<C> {
    clock: C,
    config: TypeAheadConfig,
    prefix: String,
    last_input: Option<u64>,
}

impl<C: Clock> TypeAheadSession<C> {
    /// A session with default settings.
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, TypeAheadConfig::default())
    }

    /// A session with custom settings.
    pub fn with_config(clock: C, config: TypeAheadConfig) -> Self {
        Self {
            clock,
            config,
            prefix: String::new(),
            last_input: None,
        }
    }

    /// The settings in use.
    #[must_use]
    pub const fn config(&self) -> &TypeAheadConfig {
        &self.config
    }

    /// The prefix typed so far, folded to lower case unless matching is case sensitive.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` while the next character would extend the prefix.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last_input.is_some_and(|last| {
            self.clock.now_ms().saturating_sub(last) <= self.config.timeout_ms
        })
    }

    /// Drops the prefix.
    pub fn reset(&mut self) {
        self.prefix.clear();
        self.last_input = None;
    }

    /// Appends `ch`, first starting over if the session timed out.
    pub fn push_char(&mut self, ch: char) -> &str {
        if !self.is_active() {
            self.prefix.clear();
        }
        if self.config.case_sensitive {
            self.prefix.push(ch);
        } else {
            self.prefix.extend(ch.to_lowercase());
        }
        self.last_input = Some(self.clock.now_ms());
        &self.prefix
    }

    /// Finds the row the current prefix selects, searching from `current`.
    ///
    /// The current row is kept while it still matches. A prefix of one repeated
    /// character (`"bbb"`) instead cycles through the rows starting with that
    /// character, beginning after `current`. The search wraps.
    #[must_use]
    pub fn find<T: ItemText + ?Sized>(&self, items: &T, current: usize) -> Option<usize> {
        let count = items.row_count();
        let mut chars = self.prefix.chars();
        let first = chars.next()?;
        if count == 0 {
            return None;
        }
        let current = current.min(count - 1);
        let repeated = chars.all(|c| c == first);
        let (needle, start) = if repeated {
            (&self.prefix[..first.len_utf8()], current + 1)
        } else {
            (self.prefix.as_str(), current)
        };
        (0..count)
            .map(|step| (start + step) % count)
            .find(|&row| self.matches(&items.item_text(row), needle))
    }

    /// Pushes `ch` and finds the row it selects.
    pub fn search<T: ItemText + ?Sized>(
        &mut self,
        ch: char,
        items: &T,
        current: usize,
    ) -> Option<usize> {
        self.push_char(ch);
        self.find(items, current)
    }

    fn matches(&self, text: &str, needle: &str) -> bool {
        if self.config.case_sensitive {
            return text.starts_with(needle);
        }
        let mut folded = text.chars().flat_map(char::to_lowercase);
        needle.chars().all(|n| folded.next() == Some(n))
    }
}

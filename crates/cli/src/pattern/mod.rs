// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The pattern dialect.
//!
//! Supported syntax:
//! - literal bytes
//! - `.` matches any byte
//! - `c*` matches zero or more `c` (`c` may be `.`)
//! - a leading `^` anchors at the start of the line
//! - a trailing `$` anchors at the end of the line
//!
//! Patterns are never tokenized up front. Both the baseline matcher and the
//! code generator walk the pattern with [`Step::next`], so a quirk in how a
//! malformed pattern is read shows up identically on both sides.

pub mod matcher;

pub use matcher::{is_match, match_here};

/// Anything that decides whether a line matches.
///
/// The line is passed without its terminator.
pub trait LineMatcher: Send + Sync {
    fn is_match(&self, line: &[u8]) -> bool;
}

/// A parsed pattern with its start anchor split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: Vec<u8>,
    anchored: bool,
}

impl Pattern {
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        let source = source.into();
        let anchored = source.first() == Some(&b'^');
        Self { source, anchored }
    }

    /// The pattern exactly as given.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// True if the pattern started with `^`.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// The pattern with a leading `^` removed.
    pub fn body(&self) -> &[u8] {
        if self.anchored {
            &self.source[1..]
        } else {
            &self.source
        }
    }
}

impl LineMatcher for Pattern {
    fn is_match(&self, line: &[u8]) -> bool {
        matcher::is_match(self, line)
    }
}

/// A single pattern position: either any byte or one exact byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    Any,
    Byte(u8),
}

impl Atom {
    fn from_byte(b: u8) -> Self {
        if b == b'.' { Atom::Any } else { Atom::Byte(b) }
    }

    /// Whether this atom accepts `b`. End of text is never passed here.
    pub fn matches(self, b: u8) -> bool {
        match self {
            Atom::Any => true,
            Atom::Byte(c) => c == b,
        }
    }
}

/// What the pattern asks for at its current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'p> {
    /// Nothing left; the match succeeds.
    Accept,
    /// `atom*` followed by `rest`.
    Star { atom: Atom, rest: &'p [u8] },
    /// The pattern is exactly `$`.
    EndAnchor,
    /// One `atom` followed by `rest`.
    One { atom: Atom, rest: &'p [u8] },
}

impl<'p> Step<'p> {
    /// Classify the head of `pattern`.
    ///
    /// Any byte followed by `*` is a quantified atom, including `*` itself,
    /// so `*` with nothing before it reads as a literal `*`. A `$` that is not
    /// the last byte is a literal `$`.
    pub fn next(pattern: &'p [u8]) -> Self {
        match pattern {
            [] => Step::Accept,
            [c, b'*', rest @ ..] => Step::Star {
                atom: Atom::from_byte(*c),
                rest,
            },
            [b'$'] => Step::EndAnchor,
            [c, rest @ ..] => Step::One {
                atom: Atom::from_byte(*c),
                rest,
            },
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

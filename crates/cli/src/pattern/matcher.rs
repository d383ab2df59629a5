//! Baseline matcher: a direct recursive evaluation of the pattern.
//!
//! Always available and always correct. It serves every line until a compiled
//! matcher is published, and it is the reference the compiled code is tested
//! against.

use super::{Atom, Pattern, Step};

/// Search for `pattern` anywhere in `text`.
///
/// Unanchored patterns are tried at every offset, including the end of
/// `text`, so a pattern such as `a*` matches an empty line.
pub fn is_match(pattern: &Pattern, text: &[u8]) -> bool {
    let body = pattern.body();
    if pattern.is_anchored() {
        return match_here(body, text);
    }
    (0..=text.len()).any(|start| match_here(body, &text[start..]))
}

/// Match `pattern` at the very beginning of `text`.
pub fn match_here(mut pattern: &[u8], mut text: &[u8]) -> bool {
    loop {
        match Step::next(pattern) {
            Step::Accept => return true,
            Step::Star { atom, rest } => return match_star(atom, rest, text),
            Step::EndAnchor => return text.is_empty(),
            Step::One { atom, rest } => match text.split_first() {
                Some((&b, tail)) if atom.matches(b) => {
                    pattern = rest;
                    text = tail;
                }
                _ => return false,
            },
        }
    }
}

/// Match `atom*` followed by `rest` at the beginning of `text`.
///
/// Shortest first: the remainder is tried before each extra repetition.
fn match_star(atom: Atom, rest: &[u8], mut text: &[u8]) -> bool {
    loop {
        if match_here(rest, text) {
            return true;
        }
        match text.split_first() {
            Some((&b, tail)) if atom.matches(b) => text = tail,
            _ => return false,
        }
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;

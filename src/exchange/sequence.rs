// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Monotonic request tags used to drop results that were overtaken.

use std::sync::atomic::{AtomicU64, Ordering};

/// Tag handed out for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTag(u64);

impl RequestTag {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues increasing tags; only the most recent tag is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones.
    pub fn next(&self) -> RequestTag {
        RequestTag(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether no newer request has been started since `tag`.
    pub fn is_current(&self, tag: RequestTag) -> bool {
        self.latest.load(Ordering::Acquire) == tag.0
    }

    /// Supersede everything in flight without starting a request.
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_tag_supersedes_older() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.next();
        assert!(sequencer.is_current(first));

        let second = sequencer.next();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn cancel_all_invalidates_current_tag() {
        let sequencer = RequestSequencer::new();
        let tag = sequencer.next();
        sequencer.cancel_all();
        assert!(!sequencer.is_current(tag));
    }
}

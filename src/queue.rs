// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::VecDeque;

/// A FIFO of items to be answered in the current round.
///
/// A round lasts until the queue is empty. Items answered wrongly can be put
/// back at the tail, so the round grows while it is being consumed, and an
/// item failed near the end is still retried before the round closes.
///
/// The queue also tracks a pass boundary: the first pass is the items the
/// round started with, each later pass is whatever was requeued during the
/// previous one.
pub struct RoundQueue<T> {
    items: VecDeque<T>,
    /// How many items are left before the current pass ends.
    pass_remaining: usize,
    round: usize,
    pass: usize,
    attempts: usize,
}

impl<T: Clone> RoundQueue<T> {
    /// Start the first round.
    pub fn new(items: Vec<T>) -> Self {
        let mut queue = Self {
            items: VecDeque::new(),
            pass_remaining: 0,
            round: 0,
            pass: 0,
            attempts: 0,
        };
        queue.start_round(items);
        queue
    }

    /// Replace the contents with a new round.
    pub fn start_round(&mut self, items: Vec<T>) {
        self.items = items.into();
        self.pass_remaining = self.items.len();
        self.round += 1;
        self.pass = 1;
    }

    /// The item awaiting an answer.
    pub fn current(&self) -> Option<&T> {
        self.items.front()
    }

    /// Resolve the current item and return it. With `requeue` set, a copy
    /// goes to the tail of this round.
    pub fn resolve(&mut self, requeue: bool) -> Option<T> {
        let item = self.items.pop_front()?;
        self.attempts += 1;
        self.pass_remaining = self.pass_remaining.saturating_sub(1);
        if requeue {
            self.items.push_back(item.clone());
        }
        if self.pass_remaining == 0 && !self.items.is_empty() {
            self.pass += 1;
            self.pass_remaining = self.items.len();
        }
        Some(item)
    }

    pub fn is_drained(&self) -> bool {
        self.items.is_empty()
    }

    /// The number of items still waiting in this round, including repeats.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// 1-based.
    pub fn round(&self) -> usize {
        self.round
    }

    /// 1-based, counted within the current round.
    pub fn pass(&self) -> usize {
        self.pass
    }

    /// Total answers resolved across all rounds.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_traversal() {
        let mut queue = RoundQueue::new(vec!['a', 'b', 'c']);
        let mut seen = Vec::new();
        while let Some(item) = queue.resolve(false) {
            seen.push(item);
        }
        assert_eq!(seen, vec!['a', 'b', 'c']);
        assert!(queue.is_drained());
        assert_eq!(queue.pass(), 1);
        assert_eq!(queue.attempts(), 3);
    }

    #[test]
    fn test_requeue_grows_the_round() {
        let mut queue = RoundQueue::new(vec!['a', 'b']);
        assert_eq!(queue.resolve(true), Some('a'));
        assert_eq!(queue.remaining(), 2);
        assert_eq!(queue.current(), Some(&'b'));
        assert_eq!(queue.resolve(false), Some('b'));
        // The boundary of the first pass has been crossed.
        assert_eq!(queue.pass(), 2);
        assert_eq!(queue.current(), Some(&'a'));
        assert_eq!(queue.resolve(false), Some('a'));
        assert!(queue.is_drained());
        assert_eq!(queue.round(), 1);
    }

    #[test]
    fn test_last_item_failed_is_retried() {
        let mut queue = RoundQueue::new(vec!['a']);
        queue.resolve(true);
        queue.resolve(true);
        assert_eq!(queue.current(), Some(&'a'));
        assert_eq!(queue.pass(), 3);
        queue.resolve(false);
        assert!(queue.is_drained());
    }

    #[test]
    fn test_start_round_resets_pass() {
        let mut queue = RoundQueue::new(vec![1]);
        queue.resolve(true);
        queue.resolve(false);
        queue.start_round(vec![1, 2]);
        assert_eq!(queue.round(), 2);
        assert_eq!(queue.pass(), 1);
        assert_eq!(queue.remaining(), 2);
        assert_eq!(queue.attempts(), 2);
    }

    #[test]
    fn test_empty() {
        let mut queue: RoundQueue<u8> = RoundQueue::new(Vec::new());
        assert!(queue.is_drained());
        assert_eq!(queue.current(), None);
        assert_eq!(queue.resolve(false), None);
        assert_eq!(queue.attempts(), 0);
    }
}

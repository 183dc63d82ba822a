//! LRU Order Module
//!
//! Recency tracking for rate-limit tokens.

use std::collections::VecDeque;

// == LRU Order ==
/// Tracks which client tokens were used least recently.
///
/// Front = most recently used, back = least recently used.
#[derive(Debug, Default)]
pub struct LruOrder {
    order: VecDeque<String>,
}

impl LruOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `token` as the most recently used.
    pub fn touch(&mut self, token: &str) {
        self.remove(token);
        self.order.push_front(token.to_string());
    }

    pub fn remove(&mut self, token: &str) {
        self.order.retain(|t| t != token);
    }

    /// Pops the least recently used token.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_orders_by_recency() {
        let mut lru = LruOrder::new();
        lru.touch("10.0.0.1");
        lru.touch("10.0.0.2");
        lru.touch("10.0.0.3");
        lru.touch("10.0.0.1");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.pop_oldest().as_deref(), Some("10.0.0.2"));
        assert_eq!(lru.pop_oldest().as_deref(), Some("10.0.0.3"));
        assert_eq!(lru.pop_oldest().as_deref(), Some("10.0.0.1"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_touch_same_token_keeps_one_slot() {
        let mut lru = LruOrder::new();
        lru.touch("a");
        lru.touch("a");

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.pop_oldest().as_deref(), Some("a"));
    }

    #[test]
    fn test_remove_unknown_token() {
        let mut lru = LruOrder::new();
        lru.touch("a");
        lru.remove("b");
        lru.remove("a");

        assert!(lru.is_empty());
        assert_eq!(lru.pop_oldest(), None);
    }
}

use serde::{Deserialize, Serialize};

/// A wrongly answered number waiting to be asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryItem {
    pub number: u32,
    /// First question index at which the cooldown path may return this item.
    pub eligible_at: usize,
}

/// Retries in insertion order. Removal preserves the order of the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryQueue {
    items: Vec<RetryItem>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: RetryItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RetryItem] {
        &self.items
    }

    /// First item past its cooldown that is not `avoid`.
    pub fn take_eligible(&mut self, current_index: usize, avoid: Option<u32>) -> Option<RetryItem> {
        let idx = self
            .items
            .iter()
            .position(|item| item.eligible_at <= current_index && Some(item.number) != avoid)?;
        Some(self.items.remove(idx))
    }

    /// Ignores cooldown: first item that is not `avoid`, else the first item.
    pub fn take_fallback(&mut self, avoid: Option<u32>) -> Option<RetryItem> {
        if self.items.is_empty() {
            return None;
        }
        let idx = self
            .items
            .iter()
            .position(|item| Some(item.number) != avoid)
            .unwrap_or(0);
        Some(self.items.remove(idx))
    }
}

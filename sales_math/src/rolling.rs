//! Bounded rolling window of recent sales values
//!
//! The window keeps the newest `capacity` values in arrival order and
//! answers means over its most recent entries. During a multi-day forecast
//! it holds observed sales first and predicted sales as they are produced.

use crate::{MathError, Result};
use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Fixed-capacity sliding window of `f64` values (oldest to newest)
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` values
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MathError::InvalidInput(
                "Window capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Create a window seeded with the tail of `values`.
    ///
    /// Only the last `capacity` values are kept, in their original order.
    pub fn from_tail(values: &[f64], capacity: usize) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        let start = values.len().saturating_sub(capacity);
        window.values.extend(values[start..].iter().copied());
        Ok(window)
    }

    /// Append a value, evicting the oldest one once the window is full
    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest value, if any
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Mean of the newest `n` values.
    ///
    /// Returns `None` when `n` is zero or the window holds fewer than `n`
    /// values; an average over an under-filled window is never reported.
    pub fn tail_mean(&self, n: usize) -> Option<f64> {
        if n == 0 || self.values.len() < n {
            return None;
        }
        let skip = self.values.len() - n;
        Some(self.values.iter().skip(skip).mean())
    }

    /// Copy the window contents into a vector (oldest first)
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

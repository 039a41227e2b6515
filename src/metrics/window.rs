use heapless::Deque;

/// FIFO bounded by a runtime `limit` no larger than `N`; pushing past the
/// limit evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct Window<T, const N: usize> {
    values: Deque<T, N>,
    limit: usize,
}

impl<T: Copy, const N: usize> Window<T, N> {
    pub fn new(limit: usize) -> Self {
        Self {
            values: Deque::new(),
            limit: limit.clamp(1, N),
        }
    }

    pub fn full_capacity() -> Self {
        Self::new(N)
    }

    pub fn push(&mut self, value: T) {
        while self.values.len() >= self.limit {
            self.values.pop_front();
        }
        let _ = self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }
}

impl<const N: usize> Window<f32, N> {
    /// Arithmetic mean, or `None` while empty.
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f32 = self.values.iter().sum();
        Some(sum / self.values.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_limit_evicts_oldest() {
        let mut window: Window<f32, 8> = Window::new(3);
        for value in [1.0, 2.0, 3.0, 4.0] {
            window.push(value);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.iter().next(), Some(&2.0));
        assert_eq!(window.mean(), Some(3.0));
    }

    #[test]
    fn limit_is_clamped_into_capacity() {
        let window: Window<u32, 4> = Window::new(0);
        assert_eq!(window.limit(), 1);
        let window: Window<u32, 4> = Window::new(99);
        assert_eq!(window.limit(), 4);
    }

    #[test]
    fn empty_window_has_no_mean() {
        let mut window: Window<f32, 4> = Window::full_capacity();
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
        window.push(7.0);
        assert_eq!(window.mean(), Some(7.0));
    }

    #[test]
    fn history_keeps_most_recent_in_arrival_order() {
        let mut window: Window<u32, 100> = Window::full_capacity();
        for value in 0..150 {
            window.push(value);
        }
        assert_eq!(window.len(), 100);
        assert!(window.iter().copied().eq(50..150));
    }
}

/// Tracks how many body bytes a scanner has admitted against `max_size`.
///
/// A `max_size` of `0` admits everything. Once the budget is spent, the rest of
/// every chunk is clipped before scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SizeLimit {
    max_size: usize,
    consumed: usize,
    truncated: bool,
}

impl SizeLimit {
    pub(crate) fn new(max_size: usize) -> Self {
        Self { max_size, consumed: 0, truncated: false }
    }

    /// Returns how many of the next `len` bytes may be scanned and counts them.
    pub(crate) fn admit(&mut self, len: usize) -> usize {
        let allowed = if self.max_size == 0 { len } else { len.min(self.max_size - self.consumed) };

        if allowed < len {
            self.truncated = true;
        }
        self.consumed = self.consumed.saturating_add(allowed);
        allowed
    }

    /// Whether any input was clipped
    pub(crate) fn is_truncated(&self) -> bool {
        self.truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded() {
        let mut limit = SizeLimit::new(0);
        assert_eq!(limit.admit(10), 10);
        assert_eq!(limit.admit(usize::MAX / 2), usize::MAX / 2);
        assert!(!limit.is_truncated());
    }

    #[test]
    fn test_clips_at_budget() {
        let mut limit = SizeLimit::new(8);
        assert_eq!(limit.admit(5), 5);
        assert_eq!(limit.admit(5), 3);
        assert!(limit.is_truncated());
        assert_eq!(limit.admit(5), 0);
    }

    #[test]
    fn test_exact_budget_is_not_truncation() {
        let mut limit = SizeLimit::new(4);
        assert_eq!(limit.admit(4), 4);
        assert_eq!(limit.admit(0), 0);
        assert!(!limit.is_truncated());
    }
}

/// Hands out the numeric suffixes for generated labels.
///
/// One allocator lives for a whole translation run and is shared by every
/// unit in it, so generated labels never collide across files.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_from_zero() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.next_id(), 0);
        assert_eq!(labels.next_id(), 1);
        assert_eq!(labels.next_id(), 2);
        assert_eq!(labels.issued(), 3);
    }

    #[test]
    fn allocators_are_independent() {
        let mut first = LabelAllocator::new();
        first.next_id();
        let mut second = LabelAllocator::new();
        assert_eq!(second.next_id(), 0);
    }
}

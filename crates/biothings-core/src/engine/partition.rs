//! Lazy fixed-size batching over any iterator

use std::iter::Fuse;
use std::num::NonZeroUsize;

/// One contiguous chunk of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    pub items: Vec<T>,
    /// Number of items yielded so far, this batch included
    pub cumulative: usize,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Zero-based offset of the first item of this batch
    pub fn start(&self) -> usize {
        self.cumulative - self.items.len()
    }
}

/// Iterator adaptor yielding [`Batch`]es of at most `size` items
///
/// Never buffers more than one batch. The source is pulled only when the next
/// batch is requested.
#[derive(Debug)]
pub struct Chunked<I: Iterator> {
    inner: Fuse<I>,
    size: NonZeroUsize,
    count: usize,
}

impl<I: Iterator> Iterator for Chunked<I> {
    type Item = Batch<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.size.get();
        let mut items = Vec::with_capacity(size.min(1024));
        for item in self.inner.by_ref().take(size) {
            items.push(item);
        }
        if items.is_empty() {
            return None;
        }
        self.count += items.len();
        Some(Batch {
            items,
            cumulative: self.count,
        })
    }
}

/// Split `iter` into consecutive batches of `size` items; the last may be shorter
pub fn chunked<I: IntoIterator>(iter: I, size: NonZeroUsize) -> Chunked<I::IntoIter> {
    Chunked {
        inner: iter.into_iter().fuse(),
        size,
        count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_exact_multiple() {
        let batches: Vec<_> = chunked(0..6, nz(3)).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].items, vec![0, 1, 2]);
        assert_eq!(batches[1].cumulative, 6);
        assert_eq!(batches[1].start(), 3);
    }

    #[test]
    fn test_short_tail() {
        let batches: Vec<_> = chunked(vec!["a", "b", "c", "d", "e"], nz(2)).collect();
        let sizes: Vec<_> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches[2].items, vec!["e"]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(chunked(Vec::<u8>::new(), nz(10)).count(), 0);
    }

    #[test]
    fn test_lazy_pull() {
        let mut pulled = 0;
        let source = (0..100).inspect(|_| pulled += 1);
        let mut batches = chunked(source, nz(10));
        let first = batches.next().unwrap();
        assert_eq!(first.len(), 10);
        drop(batches);
        assert_eq!(pulled, 10);
    }

    proptest! {
        #[test]
        fn prop_partition_reassembles(input in proptest::collection::vec(any::<u32>(), 0..500), n in 1usize..64) {
            let batches: Vec<_> = chunked(input.clone(), nz(n)).collect();
            prop_assert_eq!(batches.len(), (input.len() + n - 1) / n);
            for (i, batch) in batches.iter().enumerate() {
                prop_assert!(!batch.is_empty());
                prop_assert!(batch.len() <= n);
                if i + 1 < batches.len() {
                    prop_assert_eq!(batch.len(), n);
                }
            }
            let flat: Vec<u32> = batches.into_iter().flat_map(|b| b.items).collect();
            prop_assert_eq!(flat, input);
        }
    }
}

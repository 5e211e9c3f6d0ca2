use std::cell::UnsafeCell;
use std::ops::Index;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed-capacity, append-only sequence.
///
/// The storage lives inline; the container never allocates after
/// construction. Appends either come from a single writer ([`push_mut`])
/// or from many concurrent writers ([`push`]), which reserve a slot with
/// an atomic fetch-add on the length. An append that would exceed the
/// capacity is discarded and reported through the return value; the
/// container stays intact.
///
/// Reads (`len`, indexing, [`as_slice`]) must be sequenced after all
/// concurrent appends, e.g. by the barrier between two computation stages.
///
/// [`push`]: VecArray::push
/// [`push_mut`]: VecArray::push_mut
/// [`as_slice`]: VecArray::as_slice
pub struct VecArray<T, const N: usize> {
    len: AtomicUsize,
    data: UnsafeCell<[T; N]>,
}

unsafe impl<T: Send, const N: usize> Send for VecArray<T, N> {}
unsafe impl<T: Send + Sync, const N: usize> Sync for VecArray<T, N> {}

impl<T: Copy + Default, const N: usize> VecArray<T, N> {
    pub fn new() -> Self {
        Self {
            len: AtomicUsize::new(0),
            data: UnsafeCell::new([T::default(); N]),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        // The length can transiently overshoot the capacity while
        // concurrent overflowing appends undo their reservation.
        self.len.load(Ordering::Acquire).min(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `value`, reserving the slot with an atomic fetch-add.
    ///
    /// Returns the index the value was written to, or `None` if the
    /// container is full. A failed append leaves the container unchanged.
    pub fn push(&self, value: T) -> Option<usize> {
        let idx = self.len.fetch_add(1, Ordering::AcqRel);
        if idx < N {
            // SAFETY: the fetch-add handed out `idx` to this call only;
            // no other writer can observe the same slot.
            unsafe { (*self.data.get())[idx] = value };
            Some(idx)
        } else {
            self.len.fetch_sub(1, Ordering::AcqRel);
            None
        }
    }

    /// Single-writer append. Equivalent to [`push`](VecArray::push) but
    /// without the atomic round-trip.
    pub fn push_mut(&mut self, value: T) -> Option<usize> {
        let idx = *self.len.get_mut();
        if idx < N {
            self.data.get_mut()[idx] = value;
            *self.len.get_mut() = idx + 1;
            Some(idx)
        } else {
            None
        }
    }

    /// Zeroes the length. The contents are left as they are and become
    /// unobservable.
    pub fn reset(&mut self) {
        *self.len.get_mut() = 0;
    }

    pub fn as_slice(&self) -> &[T] {
        let len = self.len();
        // SAFETY: every slot below `len` was written by the append that
        // reserved it, and the caller sequences reads after appends.
        unsafe { &(&*self.data.get())[..len] }
    }
}

impl<T: Copy + Default, const N: usize> Default for VecArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> Index<usize> for VecArray<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use super::*;

    #[test]
    fn push_until_full() {
        let vec = VecArray::<u32, 4>::new();
        assert_eq!(vec.capacity(), 4);

        assert_eq!(vec.push(0), Some(0));
        assert_eq!(vec.push(1), Some(1));
        assert_eq!(vec.push(2), Some(2));
        assert_eq!(vec.push(3), Some(3));
        assert_eq!(vec.push(4), None);

        assert_eq!(vec.len(), 4);
        assert_eq!(vec.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(vec[2], 2);
    }

    #[test]
    fn overflow_leaves_contents_intact() {
        let vec = VecArray::<u32, 2>::new();
        vec.push(7);
        vec.push(8);

        for _ in 0..10 {
            assert_eq!(vec.push(9), None);
        }

        assert_eq!(vec.len(), 2);
        assert_eq!(vec.as_slice(), &[7, 8]);
    }

    #[test]
    fn reset_only_zeroes_the_length() {
        let mut vec = VecArray::<u32, 4>::new();
        vec.push(1);
        vec.push(2);

        vec.reset();

        assert!(vec.is_empty());
        assert_eq!(vec.push(3), Some(0));
        assert_eq!(vec.as_slice(), &[3]);
    }

    #[test]
    fn push_mut_matches_push() {
        let mut vec = VecArray::<u32, 2>::new();

        assert_eq!(vec.push_mut(5), Some(0));
        assert_eq!(vec.push_mut(6), Some(1));
        assert_eq!(vec.push_mut(7), None);
        assert_eq!(vec.as_slice(), &[5, 6]);
    }

    #[test]
    fn concurrent_pushes_fill_to_capacity() {
        const CAPACITY: usize = 64;
        const THREADS: usize = 4;
        const PER_THREAD: usize = 32;

        let barrier = Arc::new(Barrier::new(THREADS));
        let vec = Arc::new(VecArray::<u32, CAPACITY>::new());

        let handles = (0..THREADS)
            .map(|t| {
                let barrier = Arc::clone(&barrier);
                let vec = Arc::clone(&vec);
                std::thread::spawn(move || {
                    barrier.wait();
                    (0..PER_THREAD)
                        .filter(|i| vec.push((t * PER_THREAD + i) as u32).is_some())
                        .count()
                })
            })
            .collect::<Vec<_>>();

        let written = handles.into_iter().map(|h| h.join().unwrap()).sum::<usize>();

        // 128 attempts race for 64 slots; exactly the capacity survives
        // and every accepted value is one of the attempted ones.
        assert_eq!(written, CAPACITY);
        assert_eq!(vec.len(), CAPACITY);
        let mut seen = vec.as_slice().to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), CAPACITY);
    }
}

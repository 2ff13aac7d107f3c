//! Lock-free byte queue between the submitting thread and the device callback

use std::cell::UnsafeCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Storage shared by the two halves
///
/// `written` and `read` are running totals; their difference is the number of
/// queued bytes and each is only ever advanced by its own half.
struct Shared {
    storage: UnsafeCell<Box<[u8]>>,
    capacity: usize,
    written: AtomicUsize,
    read: AtomicUsize,
    paused: AtomicBool,
}

// Safety: storage access is partitioned by the two counters, and the only
// writers are the single `QueueProducer` and the single `QueueConsumer`, both
// of which need `&mut self` to touch it.
unsafe impl Send for Shared {}
unsafe impl Sync for Shared {}

impl Shared {
    fn pending(&self) -> usize {
        let written = self.written.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        written.wrapping_sub(read)
    }
}

/// Single-producer single-consumer byte queue for PCM data
///
/// Call [`split`](Self::split) to get the two halves: the
/// [`QueueProducer`] stays with the thread submitting frames and the
/// [`QueueConsumer`] goes to the device callback. Neither half is `Clone`, so
/// there is never more than one of each.
pub struct SampleQueue {
    shared: Shared,
}

impl SampleQueue {
    /// Create a queue holding up to `capacity` bytes
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Shared {
                storage: UnsafeCell::new(vec![0u8; capacity].into_boxed_slice()),
                capacity,
                written: AtomicUsize::new(0),
                read: AtomicUsize::new(0),
                paused: AtomicBool::new(false),
            },
        }
    }

    /// Queue capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Split into producer and consumer halves
    #[must_use]
    pub fn split(self) -> (QueueProducer, QueueConsumer) {
        let shared = Arc::new(self.shared);
        (
            QueueProducer {
                shared: Arc::clone(&shared),
            },
            QueueConsumer { shared },
        )
    }
}

/// Writing half of a [`SampleQueue`]
pub struct QueueProducer {
    shared: Arc<Shared>,
}

impl QueueProducer {
    /// Queue capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Bytes queued and not yet consumed
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    /// Bytes that can be written without overflowing
    #[must_use]
    pub fn free(&self) -> usize {
        self.shared.capacity - self.pending()
    }

    /// Whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Stop or resume draining; while paused the consumer reads nothing and
    /// queued bytes are kept
    pub fn set_paused(&self, paused: bool) {
        self.shared.paused.store(paused, Ordering::Release);
    }

    /// Append all of `data`, or nothing if it does not fit
    ///
    /// Returns `false` when the queue lacks room for the whole slice. Frames
    /// are never split across the queue boundary.
    pub fn write_all(&mut self, data: &[u8]) -> bool {
        if data.is_empty() {
            return true;
        }

        let shared = &*self.shared;
        let capacity = shared.capacity;
        let written = shared.written.load(Ordering::Relaxed);
        let read = shared.read.load(Ordering::Acquire);
        if capacity - written.wrapping_sub(read) < data.len() {
            return false;
        }

        let start = written % capacity;
        let first = (capacity - start).min(data.len());

        // Safety: the consumer never touches bytes in [written, read + capacity),
        // which is exactly the region being filled here.
        unsafe {
            let base = (*shared.storage.get()).as_mut_ptr();
            std::ptr::copy_nonoverlapping(data.as_ptr(), base.add(start), first);
            if first < data.len() {
                std::ptr::copy_nonoverlapping(data.as_ptr().add(first), base, data.len() - first);
            }
        }

        shared
            .written
            .store(written.wrapping_add(data.len()), Ordering::Release);
        true
    }
}

/// Draining half of a [`SampleQueue`]
pub struct QueueConsumer {
    shared: Arc<Shared>,
}

impl QueueConsumer {
    /// Bytes queued and not yet consumed
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    /// Whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Whether the producer has paused draining
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Move up to `out.len()` queued bytes into `out`
    ///
    /// Returns the number of bytes read, zero while paused.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        if self.is_paused() {
            return 0;
        }

        let shared = &*self.shared;
        let read = shared.read.load(Ordering::Relaxed);
        let written = shared.written.load(Ordering::Acquire);
        let count = written.wrapping_sub(read).min(out.len());
        if count == 0 {
            return 0;
        }

        let start = read % shared.capacity;
        let first = (shared.capacity - start).min(count);

        // Safety: bytes in [read, written) were published by the producer's
        // Release store and are not written again until `read` advances.
        let storage = unsafe { &*shared.storage.get() };
        out[..first].copy_from_slice(&storage[start..start + first]);
        if first < count {
            out[first..count].copy_from_slice(&storage[..count - first]);
        }

        shared.read.store(read.wrapping_add(count), Ordering::Release);
        count
    }

    /// Throw away up to `count` queued bytes, none while paused
    pub fn discard(&mut self, count: usize) -> usize {
        if self.is_paused() {
            return 0;
        }

        let shared = &*self.shared;
        let read = shared.read.load(Ordering::Relaxed);
        let written = shared.written.load(Ordering::Acquire);
        let count = written.wrapping_sub(read).min(count);
        shared.read.store(read.wrapping_add(count), Ordering::Release);
        count
    }

    /// Throw away everything queued, paused or not
    pub fn clear(&mut self) {
        let written = self.shared.written.load(Ordering::Acquire);
        self.shared.read.store(written, Ordering::Release);
    }
}

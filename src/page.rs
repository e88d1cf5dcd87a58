//! Page data model: an immutable page payload paired with a stable identity.
//!
//! A [`Page`] carries a decoded [`image::DynamicImage`] (the payload handed to
//! the OCR backends) and a [`PageId`] that gives it a stable identity used as
//! the fetch-cache key. Identities are minted by an explicit
//! [`PageIdAllocator`] — a sequential counter object — rather than hidden
//! global state, so each acquisition run owns its own id space.

use std::sync::atomic::{AtomicU64, Ordering};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Stable identity for a [`Page`], unique within the allocator that minted it.
///
/// Cheap to copy and usable as a hash-map key (the fetch cache keys on it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(u64);

impl PageId {
    /// The raw numeric value of this identity.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints sequential [`PageId`]s for one acquisition run.
///
/// Backed by an atomic counter so ids can be allocated from multiple threads
/// without external synchronization.
#[derive(Debug, Default)]
pub struct PageIdAllocator {
    next: AtomicU64,
}

impl PageIdAllocator {
    /// Create a fresh allocator whose first [`PageId`] is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next identity in sequence.
    pub fn allocate(&self) -> PageId {
        PageId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// An immutable scanned page: a decoded image payload plus its stable identity.
#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    image: DynamicImage,
}

impl Page {
    /// Pair an identity with its decoded image payload.
    pub fn new(id: PageId, image: DynamicImage) -> Self {
        Self { id, image }
    }

    /// This page's stable identity.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// The decoded image payload handed to OCR backends.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

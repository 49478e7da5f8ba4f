//! Identifiers for layers and surface listeners.
//!
//! Layer identifiers use Arc<str> so they can be handed to the surface and
//! captured by handlers without reallocating.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYER: AtomicU64 = AtomicU64::new(0);

/// Source and layer id on the map surface, formatted `gpx-<n>`.
#[derive(Clone, Debug)]
pub struct LayerId(Arc<str>);

impl LayerId {
    /// Allocate the next id. Ids are never reused while the process runs.
    pub fn next() -> Self {
        let n = NEXT_LAYER.fetch_add(1, Ordering::Relaxed);
        Self(format!("gpx-{n}").into())
    }

    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for LayerId {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for LayerId {}

impl Hash for LayerId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Token returned when a handler is attached to a surface; pass it back to detach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

//! # trailmap-track
//!
//! GPS track data for the trailmap overlay layers.
//!
//! ## Features
//!
//! - **Track model**: named paths of coordinates with optional per-path style
//! - **GPX loading**: tracks and routes from GPX 1.0/1.1 files
//! - **GeoJSON output**: one feature per path, ready for a map source
//! - **Observable store**: single-threaded value with change subscriptions
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use geo::LineString;
//! use trailmap_track::prelude::*;
//!
//! let track = Track::new("Morning ride")
//!     .with_path(TrackPath::new(vec![LineString::from(vec![(6.0, 45.0), (6.1, 45.1)])]));
//! let store = Observable::new(track);
//!
//! let changes = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&changes);
//! let _subscription = store.subscribe(move |_track: &Track| seen.set(seen.get() + 1));
//!
//! store.update(|track| track.name = "Evening ride".into());
//! assert_eq!(changes.get(), 1);
//! assert_eq!(store.get().to_feature_collection().features.len(), 1);
//! ```

pub mod error;
pub mod features;
pub mod reader;
pub mod model;
pub mod observable;

pub mod prelude {
    pub use crate::error::{Result, TrackError};
    pub use crate::model::{Track, TrackPath, TrackStyle};
    pub use crate::observable::{Observable, ObservableId, Subscription};
}

pub use prelude::*;

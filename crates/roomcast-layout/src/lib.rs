//! Roomcast Layout - Everything read from disk before assembly
//!
//! - `ResultsBundle` - predicted layouts plus the test dataset they were sampled for
//! - `RoomType` - detected from the dataset directory name
//! - `SceneRecord` - ground-truth scene: furniture, extras, floor plan, centroid
//! - `FurnitureCatalog` - 3D-FUTURE models queried by category and size
//! - `resolve_index` - user index text to a concrete layout slot

mod bundle;
mod catalog;
mod dataset;
mod index;
mod predicted;
mod room_type;

pub use bundle::{DatasetSource, ResultsBundle, Selection, RESULTS_BUNDLE_TYPE};
pub use catalog::{CatalogEntry, FurnitureCatalog};
pub use dataset::{Extra, FloorPlan, FurnitureInstance, SceneRecord, TestDataset};
pub use index::{resolve_index, ResolvedIndex};
pub use predicted::{PredictedLayout, PredictedObject};
pub use room_type::RoomType;

//! # OCR Region Order
//!
//! Consolidates the fragmented text boxes a detection model emits into
//! coherent blocks, then orders those blocks the way a person reads a page.
//!
//! Detector polygons are collapsed to axis-aligned regions, regions too small
//! to hold text are dropped, overlapping or adjacent regions are merged to a
//! fixed point, and the survivors are grouped into rows (top-to-bottom) and
//! ordered left-to-right within each row.
//!
//! ```
//! use ocr_region_order::{merge_all, sort_reading_order, Region};
//!
//! let fragments = [
//!     Region::new(0.0, 30.0, 50.0, 50.0),
//!     Region::new(60.0, 0.0, 110.0, 20.0),
//!     Region::new(0.0, 0.0, 50.0, 20.0),
//! ];
//! let blocks = merge_all(&fragments, 5.0, 10.0);
//! let ordered = sort_reading_order(&blocks, 10.0);
//! assert_eq!(ordered[0], Region::new(0.0, 0.0, 50.0, 20.0));
//! ```

pub mod cache_key;
pub mod core;
pub mod crop;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod merge;
pub mod reading_order;
pub mod traits;

pub use crate::core::{PageLayout, PageMetadata, PageResult, PipelineConfig, RegionPipeline};
pub use cache_key::{cache_key, cache_key_for_file, CacheKeyInput};
pub use crop::CropRect;
pub use error::{RegionError, Result, ServiceError};
pub use filter::filter_small;
pub use geometry::{center, iou, polygon_to_region, Point, Polygon, Region};
pub use merge::{merge, merge_all, merge_all_with_stats, pass_cap, should_merge, MergeOutcome};
pub use reading_order::{group_rows, sort_reading_order, Row};
pub use traits::{BoundingBox, FieldExtractor, PageImage, RegionRecognizer, TextDetector};

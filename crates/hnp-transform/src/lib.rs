//! Reshape-and-merge core for the hnp-tidy pipeline.
//!
//! Three stages, each a pure function from an immutable input table to a
//! new output frame plus the row counters the driver reports:
//!
//! - **health**: wide indicator table -> one row per (country, year) with
//!   one column per catalog indicator (melt, then first-wins pivot)
//! - **life**: source-named life-expectancy table -> canonical columns,
//!   year-range filter, order-preserving dedup
//! - **merge**: inner join of the two cleaned tables on
//!   (country_code, year), deduplicated and key-sorted

pub mod data_utils;
pub mod health;
pub mod life;
pub mod merge;

pub use health::{HealthReshape, LongRecord, reshape_health};
pub use life::{LifeNormalize, LifeSourceColumns, normalize_life};
pub use merge::{Merge, merge_frames};

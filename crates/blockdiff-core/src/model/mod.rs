//! Data model: datasets, attribute values and run configuration.

pub mod config;
pub mod dataset;
pub mod value;

pub use config::{DiffConfig, ReportMode, DEFAULT_TOLERANCE};
pub use dataset::{
    BlockCoordinates, BlockMatcher, BlockTopology, Dataset, LogicalKey, RESERVED_NAMES,
    VOLATILE_INFO_KEYS,
};
pub use value::AttrValue;

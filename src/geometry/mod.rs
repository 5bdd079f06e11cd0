//! Geometry helpers consumed by the classifier.

pub mod segment;

pub use segment::{IgnoredSegment, Segment};

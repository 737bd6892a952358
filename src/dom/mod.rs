//! Rendered slide access
//!
//! Everything the exporter learns about a slide comes through page scripts:
//! - SnapshotNode: one element with its rect and raw computed style
//! - PageScript: the shipped JavaScript operations and how they are composed
//! - SlidePage: typed wrappers over those operations for one [`RenderHost`](crate::browser::RenderHost)

pub mod node;
pub mod page;
pub mod script;

pub use node::{BoundingBox, ComputedStyle, SnapshotNode};
pub use page::{Candidate, OpacityGuard, SlideAddress, SlideFrame, SlideListing, SlidePage, SlidesReady, SvgSource};
pub use script::{PageScript, ScriptHeader};

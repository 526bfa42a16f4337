//! Data models for upstream payloads and aggregation output markers.

pub mod de;

mod bootstrap;
mod entry;
mod ids;
mod live;
mod marker;
mod standings;

pub use bootstrap::*;
pub use entry::*;
pub use ids::*;
pub use live::*;
pub use marker::*;
pub use standings::*;

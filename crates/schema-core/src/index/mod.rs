//! In-memory metadata index and search engine.
//!
//! This module provides:
//! - The immutable table/column store
//! - Search key building from raw search strings
//! - Result set computation over sorted name lists
//! - Selection continuity when a result set changes
//! - Interrupting a long search pass

mod interrupt;
mod query;
mod result_set;
mod selection;
mod store;

pub use interrupt::{SearchInterrupt, SearchPass};
pub use query::QueryKey;
pub use result_set::{filter, filter_interruptible, matching_positions, ResultSet};
pub use selection::track_selection;
pub use store::{MetadataStore, ViewKind};

//! Presentation helpers
//!
//! Pure data shaping for the views: route links between Flux objects, table
//! rows for inventories, object lists and events, and human-readable ages.

pub mod duration;
pub mod events;
pub mod links;
pub mod table;

pub use duration::{parse_duration, time_ago};
pub use events::{EventRow, event_rows};
pub use links::{Link, Route, SourceRef, resource_link, route_for, source_ref, source_type};
pub use table::{Table, events_table, flux_objects_table, inventory_table};

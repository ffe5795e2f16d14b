//! Flux model layer
//!
//! Typed names for the Flux kinds this crate knows about, and the kind
//! classifier shared by CRD lookups and route construction.

pub mod flux_resource_kind;
pub mod plural;

pub use flux_resource_kind::FluxResourceKind;
pub use plural::plural_of;

//! Core value types shared across linger crates.
//!
//! Async operations are identified by [`AsyncId`], classified by a free-form
//! [`TypeTag`], and captured as [`OperationRecord`]s. The Facet-derived
//! [`RecordSnapshot`] and [`ReportSnapshot`] are the serializable forms used
//! for machine-readable dumps.

mod ids;
mod record;
mod tag;

pub use ids::*;
pub use record::*;
pub use tag::*;

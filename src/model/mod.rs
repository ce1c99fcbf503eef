//! Data model shared by the index, the matching engine and the file formats.
//!
//! A [`Dataset`] owns its features; the engine works on [`GeometryRecord`]s,
//! which share each feature's geometry and carry the derived envelope and
//! center used for spatial lookup. Every record ends a run with a
//! [`ChangeStatus`].

mod dataset;
mod envelope;
mod record;
mod status;

pub use dataset::*;
pub use envelope::*;
pub use record::*;
pub use status::*;

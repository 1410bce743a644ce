//! Crop orchestration: context, frame discovery, the two-pass pipeline,
//! and run reporting.

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;

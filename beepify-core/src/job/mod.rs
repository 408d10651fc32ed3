//! Background render jobs with progress reporting

pub mod events;
pub mod runner;

pub use events::{JobEvent, Stage};
pub use runner::RenderJob;

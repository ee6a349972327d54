//! Format implementations
//!
//! This module contains the two project formats that convert between their on-disk text
//! representation and the shared [`crate::tree`] model.

pub mod plottr;
pub mod scrivener;

pub use plottr::PlottrFormat;
pub use scrivener::ScrivenerFormat;

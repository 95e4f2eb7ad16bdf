//! Presentation layer: display rows and HTML tables.

mod html;
mod rows;

pub use html::*;
pub use rows::*;

//! Domain models for the medicine catalog.

mod category;
mod medicine;
mod price;

pub use category::*;
pub use medicine::*;
pub use price::*;

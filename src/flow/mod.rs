pub mod definition;
pub mod document;
pub mod option;

pub use definition::*;
pub use option::*;

pub mod entities;
pub mod errors;
pub mod versioned;

pub use entities::*;
pub use errors::*;
pub use versioned::*;

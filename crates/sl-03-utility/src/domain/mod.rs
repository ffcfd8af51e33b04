pub mod errors;
pub mod genesis;
pub mod messages;
pub mod params;
pub mod results;
pub mod transaction;

pub use errors::*;
pub use genesis::*;
pub use messages::*;
pub use results::*;
pub use transaction::*;

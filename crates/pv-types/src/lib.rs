pub mod academic;
pub mod notes;
pub mod role;
pub mod errors;

pub use academic::*;
pub use notes::*;
pub use role::*;
pub use errors::*;

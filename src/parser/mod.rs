pub mod decoder;
pub mod main;
pub mod stream;

pub use decoder::*;
pub use main::*;
pub use stream::*;

pub mod block;
pub mod reading;

pub use block::*;
pub use reading::*;

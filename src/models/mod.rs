pub mod generation;
pub mod progress;

pub use generation::*;
pub use progress::*;

//! All structured models built from bird output

mod names;
pub use names::*;

mod protocol;
pub use protocol::*;

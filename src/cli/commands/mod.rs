//! Command implementations
//!
//! Every command returns the process exit code; hard errors propagate as
//! `Err` and are reported by `main`.

mod init;
mod merge;
mod reset;
mod status;
mod steps;
mod verify;

pub use init::init;
pub use merge::merge;
pub use reset::reset;
pub use status::status;
pub use steps::steps;
pub use verify::verify;

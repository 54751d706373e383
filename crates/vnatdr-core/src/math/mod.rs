//! Mathematical functions module
//!
//! Phase/magnitude conversions and window functions used by the
//! time-domain transform.

pub mod conversions;
pub mod window;

pub use conversions::*;
pub use window::*;

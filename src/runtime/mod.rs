//! Runtime state of the virtual machine
//!
//! - [`value`]: tagged runtime values and shared container handles
//! - [`frame`]: call frames with block scoping

pub mod frame;
pub mod value;

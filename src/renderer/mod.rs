//! Rendering hand-off
//!
//! The simulation never draws. Hosts pull [`NodeInstance`] records from the
//! scene graph and upload them to whatever renderer they run.

pub mod instance;

pub use instance::{NodeInstance, colors};

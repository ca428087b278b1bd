//! # Visual Effects
//!
//! - `FireflyCloud` - the instanced firefly sprites built from the particle
//!   field

mod fireflies;

pub use fireflies::{FireflyCloud, FireflyInstance};

//! Core traits shared by the ferrite emulator crates.

mod bus;

pub use bus::{Bus, SimpleBus};

//! Boundary traits between a console emulation core and its presentation
//! layer.
//!
//! A core produces one console-native frame per [`EmulationCore::run`], one
//! raw sample per audio tick, and asks for button state as the game reads
//! its controller ports. Everything it emits goes through [`Interface`].

mod device;
mod interface;
mod machine;

pub use device::{Device, MemoryKind};
pub use interface::{FRAME_HEIGHT, FRAME_WIDTH, Interface};
pub use machine::EmulationCore;

//! Trait implemented by a complete emulation core.

use crate::{Device, Interface, MemoryKind};

/// A console emulation core as seen by its presentation layer.
///
/// The core owns all timing, cartridge mapping and save-state layout. The
/// caller only drives it and receives output through an [`Interface`].
pub trait EmulationCore {
    /// One-time setup before any other call.
    fn initialize(&mut self);

    /// Plug `device` into controller `port`.
    fn connect(&mut self, port: u32, device: Device);

    /// Cold boot.
    fn power(&mut self);

    /// Soft reset.
    fn reset(&mut self);

    /// Emulate one frame, calling back into `io` as output is produced.
    fn run(&mut self, io: &mut dyn Interface);

    /// Size in bytes of a serialized state.
    fn serialize_size(&self) -> usize;

    /// Serialize the complete machine state.
    fn serialize(&self) -> Vec<u8>;

    /// Restore a state produced by [`EmulationCore::serialize`].
    ///
    /// Returns `false` if the data is rejected.
    fn unserialize(&mut self, data: &[u8]) -> bool;

    /// Load a cartridge image with optional board markup.
    fn load_cartridge(&mut self, markup: &str, data: &[u8]);

    /// Remove the current cartridge.
    fn unload_cartridge(&mut self);

    /// Whether the last load produced a runnable cartridge.
    fn cartridge_loaded(&self) -> bool;

    /// Direct access to a memory region, if the cartridge has one.
    fn memory_data(&mut self, kind: MemoryKind) -> Option<&mut [u8]>;
}

//! One emulation session: a core, the bridge, and the host behind it.
//!
//! Replaces the process-wide plugin instance: whoever registers the host
//! callbacks constructs a `Session` at start-up and drops it at shutdown.

use emu_core::{Device, EmulationCore, MemoryKind};

use crate::bridge::Bridge;
use crate::config::{AdapterConfig, ConfigError, Region};
use crate::host::{AvInfo, Host, SystemInfo};

/// Controller ports connected at start-up.
pub const CONTROLLER_PORTS: u32 = 2;

/// A core wired to a host through the presentation bridge.
pub struct Session<C, H> {
    core: C,
    bridge: Bridge<H>,
    config: AdapterConfig,
}

impl<C: EmulationCore, H: Host> Session<C, H> {
    /// Validate `config`, build the bridge, and initialize the core with
    /// joypads in both ports.
    pub fn new(mut core: C, host: H, config: AdapterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut bridge = Bridge::new(&config, host);
        bridge.reset_audio();

        core.initialize();
        for port in 0..CONTROLLER_PORTS {
            core.connect(port, Device::Joypad);
        }

        tracing::debug!(
            abi = ?config.abi,
            region = ?config.region,
            target_rate = config.target_rate,
            "session created"
        );
        Ok(Self {
            core,
            bridge,
            config,
        })
    }

    /// Load a cartridge image and announce the controls.
    ///
    /// Returns whether the core accepted the image.
    pub fn load_game(&mut self, markup: Option<&str>, data: &[u8]) -> bool {
        self.core.load_cartridge(markup.unwrap_or_default(), data);

        let descriptors = self.config.abi.input_descriptors();
        if !descriptors.is_empty() {
            self.bridge.host_mut().set_input_descriptors(&descriptors);
        }
        self.bridge.reset_audio();

        let loaded = self.core.cartridge_loaded();
        tracing::info!(bytes = data.len(), loaded, "cartridge load");
        loaded
    }

    pub fn unload_game(&mut self) {
        self.core.unload_cartridge();
        tracing::info!("cartridge unloaded");
    }

    /// Cold boot.
    pub fn power(&mut self) {
        self.core.power();
        self.bridge.reset_audio();
    }

    /// Soft reset.
    pub fn reset(&mut self) {
        self.core.reset();
        self.bridge.reset_audio();
    }

    /// Emulate one frame.
    pub fn run(&mut self) {
        self.core.run(&mut self.bridge);
    }

    #[must_use]
    pub fn serialize_size(&self) -> usize {
        self.core.serialize_size()
    }

    /// Write the machine state into `buf`.
    ///
    /// Returns `false`, leaving `buf` untouched, if the state does not fit.
    pub fn serialize_into(&self, buf: &mut [u8]) -> bool {
        let state = self.core.serialize();
        let Some(dst) = buf.get_mut(..state.len()) else {
            tracing::warn!(
                needed = state.len(),
                available = buf.len(),
                "save state does not fit"
            );
            return false;
        };
        dst.copy_from_slice(&state);
        true
    }

    /// Restore a state written by [`Session::serialize_into`].
    pub fn unserialize(&mut self, data: &[u8]) -> bool {
        self.core.unserialize(data)
    }

    /// Cartridge save RAM; no other region is exposed.
    pub fn memory_data(&mut self, kind: MemoryKind) -> Option<&mut [u8]> {
        match kind {
            MemoryKind::SaveRam => self.core.memory_data(kind),
            _ => None,
        }
    }

    pub fn memory_size(&mut self, kind: MemoryKind) -> usize {
        self.memory_data(kind).map_or(0, |data| data.len())
    }

    /// Hosts may request a different device per port; the NES ports stay
    /// joypads.
    pub fn set_controller_port_device(&mut self, port: u32, device: u32) {
        tracing::debug!(port, device, "port device request ignored");
    }

    #[must_use]
    pub fn system_info(&self) -> SystemInfo {
        self.config.abi.system_info()
    }

    #[must_use]
    pub fn av_info(&self) -> AvInfo {
        AvInfo::new(self.config.region, self.config.target_rate)
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.config.region
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    #[must_use]
    pub fn bridge(&self) -> &Bridge<H> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut Bridge<H> {
        &mut self.bridge
    }

    #[must_use]
    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Tear down, returning the core and host.
    pub fn into_parts(self) -> (C, H) {
        (self.core, self.bridge.into_host())
    }
}

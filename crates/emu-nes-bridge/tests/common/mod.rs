//! Scripted core and recording host shared by the integration tests.

#![allow(dead_code)]

use emu_core::{Device, EmulationCore, FRAME_HEIGHT, FRAME_WIDTH, Interface, MemoryKind};
use emu_nes_bridge::{Host, InputDescriptor, VideoFrame};

/// CPU cycles (= raw audio samples) in one NTSC frame.
pub const SAMPLES_PER_FRAME: usize = 29_781;

/// A stand-in core: draws a solid frame, emits a deterministic waveform and
/// reads controller 1 once per frame.
pub struct ScriptedCore {
    pub fill: u16,
    pub initialized: bool,
    pub ports: Vec<(u32, Device)>,
    pub powered: u32,
    pub resets: u32,
    pub frames: u32,
    pub loaded: bool,
    pub cartridge: Vec<u8>,
    pub save_ram: Vec<u8>,
    pub pad: [i16; 8],
    pub state_len: usize,
    pub restored: Option<Vec<u8>>,
    phase: u32,
}

impl ScriptedCore {
    pub fn new(fill: u16) -> Self {
        Self {
            fill,
            initialized: false,
            ports: Vec::new(),
            powered: 0,
            resets: 0,
            frames: 0,
            loaded: false,
            cartridge: Vec::new(),
            save_ram: vec![0; 8192],
            pad: [0; 8],
            state_len: 64,
            restored: None,
            phase: 0,
        }
    }

    fn next_sample(&mut self) -> i16 {
        // 440 Hz-ish square at the CPU clock
        self.phase = (self.phase + 1) % 4_068;
        if self.phase < 2_034 { 4_000 } else { -4_000 }
    }
}

impl EmulationCore for ScriptedCore {
    fn initialize(&mut self) {
        self.initialized = true;
    }

    fn connect(&mut self, port: u32, device: Device) {
        self.ports.push((port, device));
    }

    fn power(&mut self) {
        self.powered += 1;
        self.phase = 0;
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.phase = 0;
    }

    fn run(&mut self, io: &mut dyn Interface) {
        for _ in 0..SAMPLES_PER_FRAME {
            let sample = self.next_sample();
            io.audio_sample(sample);
        }
        let frame = vec![self.fill; FRAME_WIDTH * FRAME_HEIGHT];
        io.video_refresh(&frame);
        for (id, slot) in self.pad.iter_mut().enumerate() {
            *slot = io.input_poll(0, Device::Joypad, id as u32);
        }
        self.frames += 1;
    }

    fn serialize_size(&self) -> usize {
        self.state_len
    }

    fn serialize(&self) -> Vec<u8> {
        (0..self.state_len).map(|i| i as u8).collect()
    }

    fn unserialize(&mut self, data: &[u8]) -> bool {
        if data.len() != self.state_len {
            return false;
        }
        self.restored = Some(data.to_vec());
        true
    }

    fn load_cartridge(&mut self, _markup: &str, data: &[u8]) {
        self.loaded = data.starts_with(b"NES\x1a");
        self.cartridge = data.to_vec();
    }

    fn unload_cartridge(&mut self) {
        self.loaded = false;
        self.cartridge.clear();
    }

    fn cartridge_loaded(&self) -> bool {
        self.loaded
    }

    fn memory_data(&mut self, kind: MemoryKind) -> Option<&mut [u8]> {
        match kind {
            MemoryKind::SaveRam | MemoryKind::SystemRam => Some(&mut self.save_ram),
            _ => None,
        }
    }
}

/// Host that keeps everything it is given.
#[derive(Default)]
pub struct RecordingHost {
    pub frames: Vec<Vec<u16>>,
    pub strides: Vec<usize>,
    pub polls: usize,
    pub audio: Vec<(i16, i16)>,
    pub pressed: Vec<u32>,
    pub descriptors: Vec<InputDescriptor>,
}

impl Host for RecordingHost {
    fn video_refresh(&mut self, frame: VideoFrame<'_>) {
        let mut pixels = Vec::new();
        for y in 0..frame.height as usize {
            pixels.extend_from_slice(frame.row(y));
        }
        self.frames.push(pixels);
        self.strides.push(frame.stride);
    }

    fn audio_sample(&mut self, left: i16, right: i16) {
        self.audio.push((left, right));
    }

    fn input_poll(&mut self) {
        self.polls += 1;
    }

    fn input_state(&mut self, port: u32, _device: u32, _index: u32, id: u32) -> i16 {
        i16::from(port == 0 && self.pressed.contains(&id))
    }

    fn set_input_descriptors(&mut self, descriptors: &[InputDescriptor]) {
        self.descriptors = descriptors.to_vec();
    }
}

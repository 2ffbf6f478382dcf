//! Top-level NES machine.
//!
//! Owns the CPU and the bus and clocks them from a shared tick: every
//! bus tick advances the PPU one dot, and every third tick advances the
//! CPU one cycle, the hardware's 3:1 dot-to-cycle ratio.

use std::sync::atomic::{AtomicBool, Ordering};

use ferrite_6502::{Cpu, CpuError};
use ferrite_core::Bus;

use crate::bus::NesBus;
use crate::mapper::{Mapper, MapperError, MapperRegistry};
use crate::ppu::OAMDATA;
use crate::rom::{Rom, RomError};

/// Errors surfaced while building or running a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NesError {
    Rom(RomError),
    Mapper(MapperError),
    Cpu(CpuError),
}

impl std::fmt::Display for NesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rom(err) => err.fmt(f),
            Self::Mapper(err) => err.fmt(f),
            Self::Cpu(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for NesError {}

impl From<RomError> for NesError {
    fn from(err: RomError) -> Self {
        Self::Rom(err)
    }
}

impl From<MapperError> for NesError {
    fn from(err: MapperError) -> Self {
        Self::Mapper(err)
    }
}

impl From<CpuError> for NesError {
    fn from(err: CpuError) -> Self {
        Self::Cpu(err)
    }
}

/// The NES system: CPU, bus, and tick distribution.
pub struct Nes {
    cpu: Cpu,
    bus: NesBus,
    /// Bus tick counter; the CPU runs on every third tick.
    ticks: u64,
}

impl Nes {
    /// Build a machine from an iNES file image, using the built-in
    /// mapper registry.
    ///
    /// # Errors
    ///
    /// ROM parse errors and mapper lookup/init errors.
    pub fn new(rom_data: &[u8]) -> Result<Self, NesError> {
        Self::with_registry(rom_data, &MapperRegistry::default())
    }

    /// Build a machine with a caller-supplied mapper registry.
    ///
    /// # Errors
    ///
    /// ROM parse errors and mapper lookup/init errors.
    pub fn with_registry(rom_data: &[u8], registry: &MapperRegistry) -> Result<Self, NesError> {
        let rom = Rom::parse(rom_data)?;
        let mapper = registry.get(rom)?;
        Ok(Self::from_mapper(mapper))
    }

    /// Build a machine from an already-initialized mapper. The CPU powers
    /// on with its PC from the cartridge's reset vector.
    #[must_use]
    pub fn from_mapper(mapper: Box<dyn Mapper>) -> Self {
        let mut bus = NesBus::new(mapper);
        let cpu = Cpu::new(&mut bus);
        Self { cpu, bus, ticks: 0 }
    }

    /// One bus tick: one PPU dot, plus a CPU cycle on every third tick.
    ///
    /// # Errors
    ///
    /// `CpuError` when the CPU fetches an invalid instruction.
    pub fn tick(&mut self) -> Result<(), CpuError> {
        self.bus.ppu.tick(self.bus.mapper.as_mut());
        if self.bus.ppu.take_nmi() {
            self.cpu.trigger_nmi();
        }

        if self.ticks % 3 == 0 {
            if let Some(page) = self.bus.oam_dma_page.take() {
                self.run_oam_dma(page);
            }
            self.cpu.tick(&mut self.bus)?;
        }
        self.ticks += 1;
        Ok(())
    }

    /// Run until `cancel` is set.
    ///
    /// # Errors
    ///
    /// Stops and returns the first CPU error.
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<(), CpuError> {
        while !cancel.load(Ordering::Relaxed) {
            self.tick()?;
        }
        Ok(())
    }

    /// Run exactly one frame of emulation. Returns the bus ticks spent,
    /// which is the dot count of the frame.
    ///
    /// # Errors
    ///
    /// Stops and returns the first CPU error.
    pub fn run_frame(&mut self) -> Result<u64, CpuError> {
        let frame = self.bus.ppu.frame();
        let start_ticks = self.ticks;
        while self.bus.ppu.frame() == frame {
            self.tick()?;
        }
        Ok(self.ticks - start_ticks)
    }

    /// Reset the CPU and PPU, as the console's reset button does.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu.reset();
    }

    /// Copy one page of CPU memory into OAM through the OAMDATA port,
    /// stalling the CPU for the duration of the transfer.
    fn run_oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        for offset in 0..=0xFFu16 {
            let value = self.bus.read(base + offset);
            self.bus.write(OAMDATA, value);
        }
        self.cpu.add_dma_cycles();
    }

    // =======================================================================
    // Host access
    // =======================================================================

    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// The current frame as RGBA bytes.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.get_pixels()
    }

    /// Framebuffer width and height in pixels.
    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        self.bus.ppu.get_resolution()
    }

    /// Bus ticks elapsed since power-on.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

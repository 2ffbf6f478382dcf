//! NES emulator core.
//!
//! The bus ties together 2 KB of work RAM, the PPU, and a cartridge
//! mapper; the machine clocks the PPU three dots for every CPU cycle.
//! One frame is 341 dots x 262 scanlines (one dot shorter on odd frames
//! while rendering).
//!
//! The CPU itself lives in the `ferrite-6502` crate; this crate supplies
//! everything NES-specific: the iNES/NES 2.0 ROM loader, the mapper
//! registry, the PPU, and the bus.

mod bus;
pub mod capture;
mod loopy;
mod mapper;
mod nes;
mod palette;
pub mod ppu;
pub mod rom;

pub use bus::{NesBus, OAM_DMA};
pub use loopy::Loopy;
pub use mapper::{Mapper, MapperError, MapperInit, MapperRegistry, Nrom};
pub use nes::{Nes, NesError};
pub use ppu::Ppu;
pub use rom::{Header, Mirroring, Rom, RomError};

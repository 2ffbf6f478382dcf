//! Cartridge mappers.
//!
//! A mapper is the cartridge hardware between the console buses and the
//! ROM/RAM chips: it translates CPU and PPU addresses into chip offsets
//! and reports the nametable wiring. Mappers are looked up in a registry
//! keyed by the iNES mapper number.

use std::collections::HashMap;

use crate::rom::{Mirroring, Rom};

/// PRG-RAM window at $6000-$7FFF.
const PRG_RAM_START: u16 = 0x6000;
const PRG_RAM_END: u16 = 0x7FFF;
const PRG_RAM_SIZE: usize = 8 * 1024;

/// PRG-ROM window at $8000-$FFFF.
const PRG_ROM_START: u16 = 0x8000;

const CHR_RAM_SIZE: usize = 8 * 1024;

/// Mapper construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperError {
    /// No mapper registered for the ROM's mapper number.
    UnknownMapper(u16),
    /// The ROM asks for four-screen mirroring but the board supplies no
    /// cartridge VRAM.
    UnsupportedMirroring,
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMapper(id) => write!(f, "unknown mapper id {id}"),
            Self::UnsupportedMirroring => {
                write!(f, "unsupported mirroring: four-screen needs cartridge VRAM")
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Cartridge address translation.
///
/// `prg_read`/`prg_write` see the whole CPU cartridge window
/// ($4020-$FFFF); `chr_read`/`chr_write` see the PPU pattern table space
/// ($0000-$1FFF).
pub trait Mapper {
    /// The iNES mapper number this implements.
    fn id(&self) -> u16;

    /// Board name, e.g. "NROM".
    fn name(&self) -> &'static str;

    fn prg_read(&self, addr: u16) -> u8;

    fn prg_write(&mut self, addr: u16, value: u8);

    fn chr_read(&self, addr: u16) -> u8;

    fn chr_write(&mut self, addr: u16, value: u8);

    /// Current nametable mirroring.
    fn mirroring(&self) -> Mirroring;

    /// Whether the board exposes battery-backed RAM at $6000-$7FFF.
    fn has_save_ram(&self) -> bool;
}

/// Constructor registered for a mapper number: consumes the parsed ROM
/// and returns the initialized mapper.
pub type MapperInit = fn(Rom) -> Result<Box<dyn Mapper>, MapperError>;

/// Registry of mapper constructors keyed by mapper number.
///
/// The registry is an explicit value handed to the machine at
/// construction; `MapperRegistry::default()` carries the built-in boards.
pub struct MapperRegistry {
    inits: HashMap<u16, MapperInit>,
}

impl MapperRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inits: HashMap::new(),
        }
    }

    /// Register a constructor for a mapper number.
    ///
    /// # Panics
    ///
    /// Re-registering an id is a programmer error and panics.
    pub fn register(&mut self, id: u16, init: MapperInit) {
        assert!(
            self.inits.insert(id, init).is_none(),
            "mapper id {id} registered twice"
        );
    }

    /// Look up the ROM's mapper number and initialize its mapper.
    ///
    /// # Errors
    ///
    /// `MapperError::UnknownMapper` when no constructor is registered,
    /// or whatever the constructor itself rejects.
    pub fn get(&self, rom: Rom) -> Result<Box<dyn Mapper>, MapperError> {
        let id = rom.mapper_num();
        let init = self
            .inits
            .get(&id)
            .ok_or(MapperError::UnknownMapper(id))?;
        init(rom)
    }
}

impl Default for MapperRegistry {
    /// Registry with all built-in mappers.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(0, |rom| Ok(Box::new(Nrom::from_rom(rom)?)));
        registry
    }
}

/// NROM (mapper 0): no banking at all.
///
/// - PRG: 16 KB mirrored across $8000-$FFFF, or 32 KB flat.
/// - CHR: 8 KB ROM, or 8 KB RAM when the header carries no CHR banks.
/// - Optional 8 KB PRG-RAM at $6000-$7FFF.
pub struct Nrom {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Option<Vec<u8>>,
    mirroring: Mirroring,
}

impl Nrom {
    /// Build an NROM board from a parsed ROM.
    ///
    /// # Errors
    ///
    /// `MapperError::UnsupportedMirroring` for four-screen ROMs: NROM
    /// boards carry no nametable RAM.
    pub fn from_rom(rom: Rom) -> Result<Self, MapperError> {
        let mirroring = rom.mirroring();
        if mirroring == Mirroring::FourScreen {
            return Err(MapperError::UnsupportedMirroring);
        }

        let prg_ram = rom.has_save_ram().then(|| vec![0u8; PRG_RAM_SIZE]);
        let (prg_rom, chr_rom) = rom.into_banks();
        let chr_is_ram = chr_rom.is_empty();
        let chr = if chr_is_ram {
            vec![0u8; CHR_RAM_SIZE]
        } else {
            chr_rom
        };

        Ok(Self {
            prg_rom,
            chr,
            chr_is_ram,
            prg_ram,
            mirroring,
        })
    }
}

impl Mapper for Nrom {
    fn id(&self) -> u16 {
        0
    }

    fn name(&self) -> &'static str {
        "NROM"
    }

    fn prg_read(&self, addr: u16) -> u8 {
        match addr {
            PRG_RAM_START..=PRG_RAM_END => match &self.prg_ram {
                Some(ram) => ram[usize::from(addr - PRG_RAM_START)],
                None => 0,
            },
            PRG_ROM_START..=0xFFFF => {
                let offset = usize::from(addr - PRG_ROM_START);
                self.prg_rom[offset % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn prg_write(&mut self, addr: u16, value: u8) {
        // ROM ignores writes; only the RAM window is writable.
        if let (PRG_RAM_START..=PRG_RAM_END, Some(ram)) = (addr, &mut self.prg_ram) {
            ram[usize::from(addr - PRG_RAM_START)] = value;
        }
    }

    fn chr_read(&self, addr: u16) -> u8 {
        self.chr[usize::from(addr) & 0x1FFF]
    }

    fn chr_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            self.chr[usize::from(addr) & 0x1FFF] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn has_save_ram(&self) -> bool {
        self.prg_ram.is_some()
    }
}

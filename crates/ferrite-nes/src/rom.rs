//! iNES / NES 2.0 ROM image parser.
//!
//! The file layout is a 16-byte header, an optional 512-byte trainer,
//! PRG-ROM in 16 KB banks, CHR-ROM in 8 KB banks, and — on PlayChoice-10
//! boards — an 8 KB INST-ROM plus a 32-byte PROM.
//!
//! https://www.nesdev.org/wiki/INES, https://www.nesdev.org/wiki/NES_2.0

/// Header magic: "NES" followed by the MS-DOS end-of-file byte.
const MAGIC: &[u8; 4] = b"NES\x1a";

const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;
/// PRG-ROM bank granularity (header byte 4 counts these).
pub const PRG_BANK_SIZE: usize = 16 * 1024;
/// CHR-ROM bank granularity (header byte 5 counts these).
pub const CHR_BANK_SIZE: usize = 8 * 1024;
const PC_INST_SIZE: usize = 8 * 1024;
const PC_PROM_HALF: usize = 16;

// Flags 6.
const FLAG6_MIRRORING: u8 = 0x01;
const FLAG6_BATTERY: u8 = 0x02;
const FLAG6_TRAINER: u8 = 0x04;
const FLAG6_FOUR_SCREEN: u8 = 0x08;

// Flags 7.
const FLAG7_VS_UNISYSTEM: u8 = 0x01;
const FLAG7_PLAYCHOICE: u8 = 0x02;

/// Nametable mirroring arrangement, as wired by the cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    /// Four independent nametables, backed by RAM on the cartridge.
    FourScreen,
}

/// TV system the ROM targets (header byte 9, rarely set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

/// ROM parsing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomError {
    /// The first four bytes are not "NES\x1A".
    InvalidMagic,
    /// A section announced by the header extends past the end of the file.
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for RomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid ROM header: bad magic"),
            Self::Truncated {
                section,
                expected,
                actual,
            } => write!(
                f,
                "invalid ROM header: {section} truncated (wanted {expected} bytes, have {actual})"
            ),
        }
    }
}

impl std::error::Error for RomError {}

/// The 16-byte iNES header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// PRG-ROM size in 16 KB units.
    prg_banks: u8,
    /// CHR-ROM size in 8 KB units; 0 means the board carries CHR-RAM.
    chr_banks: u8,
    /// Mapper low nibble, mirroring, battery, trainer, four-screen.
    flags6: u8,
    /// Mapper high nibble, VS/PlayChoice, NES 2.0 discriminator.
    flags7: u8,
    /// PRG-RAM size (iNES) or mapper bits 8-11 (NES 2.0).
    flags8: u8,
    /// TV system.
    flags9: u8,
    flags10: u8,
    /// Bytes 11-15. Old ROM tools scribbled tags here ("DiskDude!"),
    /// which corrupts the flags7 mapper nibble.
    unused: [u8; 5],
}

impl Header {
    /// Parse the 16 header bytes.
    ///
    /// # Errors
    ///
    /// `RomError::InvalidMagic` when the magic does not match,
    /// `RomError::Truncated` when fewer than 16 bytes are available.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::Truncated {
                section: "header",
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        if &data[0..4] != MAGIC {
            return Err(RomError::InvalidMagic);
        }

        let mut unused = [0u8; 5];
        unused.copy_from_slice(&data[11..16]);

        Ok(Self {
            prg_banks: data[4],
            chr_banks: data[5],
            flags6: data[6],
            flags7: data[7],
            flags8: data[8],
            flags9: data[9],
            flags10: data[10],
            unused,
        })
    }

    /// PRG-ROM size in 16 KB units.
    #[must_use]
    pub fn prg_banks(&self) -> u8 {
        self.prg_banks
    }

    /// CHR-ROM size in 8 KB units. 0 means CHR-RAM.
    #[must_use]
    pub fn chr_banks(&self) -> u8 {
        self.chr_banks
    }

    /// NES 2.0 files set bits 2-3 of flags 7 to 0b10.
    #[must_use]
    pub fn is_nes2(&self) -> bool {
        self.flags7 & 0x0C == 0x08
    }

    /// Whether the flags7 mapper nibble should be ignored: pre-NES-2.0
    /// files with junk in bytes 12-15 were written by tools that also
    /// overwrote flags 7 ("DiskDude!" adds 64 to the mapper number).
    fn ignore_high_mapper_nibble(&self) -> bool {
        let tail_dirty = self.unused[1..].iter().any(|&b| b != 0);
        tail_dirty && !self.is_nes2()
    }

    /// The mapper number: flags6 high nibble (low), flags7 high nibble
    /// (high), and for NES 2.0 four more bits from byte 8.
    #[must_use]
    pub fn mapper_num(&self) -> u16 {
        let low = u16::from(self.flags6 >> 4);
        if self.ignore_high_mapper_nibble() {
            return low;
        }
        let mut mapper = u16::from(self.flags7 & 0xF0) | low;
        if self.is_nes2() {
            mapper |= u16::from(self.flags8 & 0x0F) << 8;
        }
        mapper
    }

    /// Nametable mirroring wired by the board.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        if self.flags6 & FLAG6_FOUR_SCREEN != 0 {
            Mirroring::FourScreen
        } else if self.flags6 & FLAG6_MIRRORING != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    /// Battery-backed PRG-RAM at $6000-$7FFF.
    #[must_use]
    pub fn has_save_ram(&self) -> bool {
        self.flags6 & FLAG6_BATTERY != 0
    }

    /// 512-byte trainer before the PRG data.
    #[must_use]
    pub fn has_trainer(&self) -> bool {
        self.flags6 & FLAG6_TRAINER != 0
    }

    #[must_use]
    pub fn is_vs_unisystem(&self) -> bool {
        self.flags7 & FLAG7_VS_UNISYSTEM != 0
    }

    /// PlayChoice-10 hint data stored after CHR.
    #[must_use]
    pub fn has_playchoice(&self) -> bool {
        self.flags7 & FLAG7_PLAYCHOICE != 0
    }

    /// PRG-RAM size in 8 KB units; a zero byte means one unit.
    #[must_use]
    pub fn prg_ram_size(&self) -> u8 {
        if self.flags8 == 0 {
            1
        } else {
            self.flags8
        }
    }

    #[must_use]
    pub fn tv_system(&self) -> TvSystem {
        if self.flags9 & 0x01 != 0 {
            TvSystem::Pal
        } else {
            TvSystem::Ntsc
        }
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "prg({}), chr({}), mapper({}), flags({:02x}, {:02x}, {:02x}, {:02x}, {:02x})",
            self.prg_banks,
            self.chr_banks,
            self.mapper_num(),
            self.flags6,
            self.flags7,
            self.flags8,
            self.flags9,
            self.flags10
        )
    }
}

/// PlayChoice-10 PROM: 16 Data bytes and 16 CounterOut bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayChoiceProm {
    pub data: [u8; PC_PROM_HALF],
    pub counter_out: [u8; PC_PROM_HALF],
}

/// A parsed ROM image. Lives for the whole session; the mapper takes
/// ownership at init.
#[derive(Debug, Clone, PartialEq)]
pub struct Rom {
    header: Header,
    trainer: Option<Vec<u8>>,
    prg: Vec<u8>,
    chr: Vec<u8>,
    pc_inst: Option<Vec<u8>>,
    pc_prom: Option<PlayChoiceProm>,
}

/// Byte cursor over the file, yielding per-section truncation errors.
struct Sections<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Sections<'a> {
    fn take(&mut self, section: &'static str, len: usize) -> Result<&'a [u8], RomError> {
        let available = self.data.len() - self.offset;
        if available < len {
            return Err(RomError::Truncated {
                section,
                expected: len,
                actual: available,
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}

impl Rom {
    /// Parse a complete ROM file image.
    ///
    /// # Errors
    ///
    /// Any header or section error from [`RomError`].
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        let header = Header::parse(data)?;
        let mut sections = Sections {
            data,
            offset: HEADER_SIZE,
        };

        let trainer = if header.has_trainer() {
            Some(sections.take("trainer", TRAINER_SIZE)?.to_vec())
        } else {
            None
        };

        let prg = sections
            .take("PRG-ROM", PRG_BANK_SIZE * usize::from(header.prg_banks()))?
            .to_vec();
        let chr = sections
            .take("CHR-ROM", CHR_BANK_SIZE * usize::from(header.chr_banks()))?
            .to_vec();

        let (pc_inst, pc_prom) = if header.has_playchoice() {
            let inst = sections.take("PlayChoice INST-ROM", PC_INST_SIZE)?.to_vec();
            let prom = sections.take("PlayChoice PROM", PC_PROM_HALF * 2)?;
            let mut data_half = [0u8; PC_PROM_HALF];
            let mut counter_half = [0u8; PC_PROM_HALF];
            data_half.copy_from_slice(&prom[..PC_PROM_HALF]);
            counter_half.copy_from_slice(&prom[PC_PROM_HALF..]);
            (
                Some(inst),
                Some(PlayChoiceProm {
                    data: data_half,
                    counter_out: counter_half,
                }),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            header,
            trainer,
            prg,
            chr,
            pc_inst,
            pc_prom,
        })
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn prg(&self) -> &[u8] {
        &self.prg
    }

    #[must_use]
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    #[must_use]
    pub fn trainer(&self) -> Option<&[u8]> {
        self.trainer.as_deref()
    }

    #[must_use]
    pub fn playchoice_inst(&self) -> Option<&[u8]> {
        self.pc_inst.as_deref()
    }

    #[must_use]
    pub fn playchoice_prom(&self) -> Option<&PlayChoiceProm> {
        self.pc_prom.as_ref()
    }

    #[must_use]
    pub fn mapper_num(&self) -> u16 {
        self.header.mapper_num()
    }

    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring()
    }

    #[must_use]
    pub fn has_save_ram(&self) -> bool {
        self.header.has_save_ram()
    }

    /// Split into PRG and CHR buffers, for a mapper taking ownership.
    #[must_use]
    pub fn into_banks(self) -> (Vec<u8>, Vec<u8>) {
        (self.prg, self.chr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a well-formed iNES image with patterned PRG/CHR contents.
    fn make_ines(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let prg_size = usize::from(prg_banks) * PRG_BANK_SIZE;
        let chr_size = usize::from(chr_banks) * CHR_BANK_SIZE;
        let mut data = vec![0u8; HEADER_SIZE + prg_size + chr_size];
        data[0..4].copy_from_slice(MAGIC);
        data[4] = prg_banks;
        data[5] = chr_banks;
        data[6] = flags6;
        data[7] = flags7;
        for i in 0..prg_size {
            data[HEADER_SIZE + i] = (i & 0xFF) as u8;
        }
        for i in 0..chr_size {
            data[HEADER_SIZE + prg_size + i] = ((i + 0x80) & 0xFF) as u8;
        }
        data
    }

    #[test]
    fn parse_basic_header() {
        // 2 PRG banks, 1 CHR bank, vertical mirroring, mapper 0.
        let bytes = [
            0x4E, 0x45, 0x53, 0x1A, 0x02, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.prg_banks(), 2);
        assert_eq!(header.chr_banks(), 1);
        assert_eq!(header.mapper_num(), 0);
        assert_eq!(header.mirroring(), Mirroring::Vertical);
        assert!(!header.has_trainer());
        assert!(!header.is_nes2());
    }

    #[test]
    fn bad_magic() {
        let mut bytes = [0u8; 16];
        bytes[0] = b'N';
        assert_eq!(Header::parse(&bytes), Err(RomError::InvalidMagic));
    }

    #[test]
    fn short_header() {
        assert_eq!(
            Header::parse(&[0x4E, 0x45]),
            Err(RomError::Truncated {
                section: "header",
                expected: 16,
                actual: 2
            })
        );
    }

    #[test]
    fn mapper_from_both_nibbles() {
        let mut data = make_ines(1, 1, 0x40, 0x20); // 4 | 2<<4 = 36
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.mapper_num(), 36);

        // NES 2.0 extends the mapper with byte 8's low nibble.
        data[7] = 0x28; // high nibble 2, NES 2.0 discriminator
        data[8] = 0x01;
        let header = Header::parse(&data).unwrap();
        assert!(header.is_nes2());
        assert_eq!(header.mapper_num(), 0x100 | 36);
    }

    #[test]
    fn diskdude_tag_discards_high_nibble() {
        let mut data = make_ines(1, 1, 0x10, 0xF0); // would be mapper 241
        data[12..16].copy_from_slice(b"ude!");
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.mapper_num(), 1);
    }

    #[test]
    fn four_screen_beats_mirroring_bit() {
        let data = make_ines(1, 1, 0x09, 0x00);
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.mirroring(), Mirroring::FourScreen);
    }

    #[test]
    fn prg_ram_size_defaults_to_one_unit() {
        let data = make_ines(1, 1, 0x02, 0x00);
        let header = Header::parse(&data).unwrap();
        assert!(header.has_save_ram());
        assert_eq!(header.prg_ram_size(), 1);
    }

    #[test]
    fn rom_sections_split() {
        let data = make_ines(2, 1, 0x00, 0x00);
        let rom = Rom::parse(&data).unwrap();
        assert_eq!(rom.prg().len(), 2 * PRG_BANK_SIZE);
        assert_eq!(rom.chr().len(), CHR_BANK_SIZE);
        assert_eq!(rom.prg()[0], 0x00);
        assert_eq!(rom.prg()[1], 0x01);
        assert_eq!(rom.chr()[0], 0x80);
        assert!(rom.trainer().is_none());
    }

    #[test]
    fn trainer_shifts_prg() {
        let plain = make_ines(1, 1, 0x00, 0x00);
        let mut data = plain[..HEADER_SIZE].to_vec();
        data[6] = FLAG6_TRAINER;
        data.extend(std::iter::repeat_n(0xAAu8, 512));
        data.extend_from_slice(&plain[HEADER_SIZE..]);

        let rom = Rom::parse(&data).unwrap();
        assert_eq!(rom.trainer().unwrap().len(), 512);
        assert_eq!(rom.trainer().unwrap()[0], 0xAA);
        assert_eq!(rom.prg()[0], 0x00);
        assert_eq!(rom.prg()[1], 0x01);
    }

    #[test]
    fn truncated_chr_is_an_error() {
        let mut data = make_ines(1, 1, 0x00, 0x00);
        data.truncate(data.len() - 100);
        assert_eq!(
            Rom::parse(&data),
            Err(RomError::Truncated {
                section: "CHR-ROM",
                expected: CHR_BANK_SIZE,
                actual: CHR_BANK_SIZE - 100
            })
        );
    }

    #[test]
    fn playchoice_sections() {
        let mut data = make_ines(1, 1, 0x00, FLAG7_PLAYCHOICE);
        data.extend(std::iter::repeat_n(0x11u8, PC_INST_SIZE));
        data.extend(std::iter::repeat_n(0x22u8, PC_PROM_HALF));
        data.extend(std::iter::repeat_n(0x33u8, PC_PROM_HALF));

        let rom = Rom::parse(&data).unwrap();
        let prom = rom.playchoice_prom().unwrap();
        assert_eq!(rom.playchoice_inst().unwrap().len(), PC_INST_SIZE);
        assert_eq!(prom.data, [0x22; PC_PROM_HALF]);
        assert_eq!(prom.counter_out, [0x33; PC_PROM_HALF]);
    }

    #[test]
    fn playchoice_prom_missing_is_an_error() {
        let mut data = make_ines(1, 1, 0x00, FLAG7_PLAYCHOICE);
        data.extend(std::iter::repeat_n(0x11u8, PC_INST_SIZE));
        assert!(matches!(
            Rom::parse(&data),
            Err(RomError::Truncated {
                section: "PlayChoice PROM",
                ..
            })
        ));
    }

    #[test]
    fn chr_ram_board_has_empty_chr() {
        let data = make_ines(1, 0, 0x00, 0x00);
        let rom = Rom::parse(&data).unwrap();
        assert!(rom.chr().is_empty());
    }
}

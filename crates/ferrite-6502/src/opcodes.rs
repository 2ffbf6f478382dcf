//! 6502 opcode table.
//!
//! Maps each opcode byte to its instruction, addressing mode, encoded
//! length, and base cycle count. Covers the 151 documented opcodes plus
//! the undocumented opcodes exercised by shipping games and test ROMs
//! (NOP variants, LAX, SAX, DCM, ISB, SBC $EB). Opcodes absent from the
//! table decode as invalid instructions.
//!
//! References:
//! - https://www.nesdev.org/obelisk-6502-guide/reference.html
//! - https://www.nesdev.org/6502_cpu.txt (undocumented opcodes)

/// 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No operand (CLC, RTS, ...).
    Implied,
    /// Operates on the accumulator (ASL A, ...).
    Accumulator,
    /// Operand is the next byte.
    Immediate,
    /// 8-bit address in page zero.
    ZeroPage,
    /// Zero-page address + X, wrapping within page zero.
    ZeroPageX,
    /// Zero-page address + Y, wrapping within page zero.
    ZeroPageY,
    /// Signed 8-bit branch offset from the following instruction.
    Relative,
    /// Full 16-bit address.
    Absolute,
    /// 16-bit address + X.
    AbsoluteX,
    /// 16-bit address + Y.
    AbsoluteY,
    /// 16-bit pointer to a 16-bit target (JMP only).
    Indirect,
    /// Pre-indexed: zero-page pointer at operand + X.
    IndirectX,
    /// Post-indexed: zero-page pointer, then + Y.
    IndirectY,
}

/// Instruction identifiers, including the undocumented set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented: load A and X from memory.
    Lax,
    /// Undocumented: store A & X.
    Sax,
    /// Undocumented: decrement memory, then compare with A.
    Dcm,
    /// Undocumented: increment memory, then subtract from A.
    Isb,
}

impl Inst {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
            Self::Lax => "LAX",
            Self::Sax => "SAX",
            Self::Dcm => "DCM",
            Self::Isb => "ISB",
        }
    }
}

/// One opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// The instruction to execute.
    pub inst: Inst,
    /// How to resolve the operand.
    pub mode: AddrMode,
    /// Encoded length including the opcode byte (1-3).
    pub bytes: u8,
    /// Base cycle count. Branch and page-cross charges come on top.
    pub cycles: u8,
    /// Whether a page crossing during operand resolution costs one extra
    /// cycle (read-type indexed instructions only).
    pub page_cycle: bool,
}

/// Fixed-cycle entry.
const fn op(inst: Inst, mode: AddrMode, bytes: u8, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        inst,
        mode,
        bytes,
        cycles,
        page_cycle: false,
    })
}

/// Entry that pays +1 cycle when operand resolution crosses a page.
const fn op_px(inst: Inst, mode: AddrMode, bytes: u8, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        inst,
        mode,
        bytes,
        cycles,
        page_cycle: true,
    })
}

/// The opcode table, indexed by opcode byte. `None` entries are invalid
/// instructions.
pub const OPCODES: [Option<Opcode>; 256] = build_table();

#[allow(clippy::too_many_lines)]
const fn build_table() -> [Option<Opcode>; 256] {
    use AddrMode::{
        Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, Indirect, IndirectX,
        IndirectY, Relative, ZeroPage, ZeroPageX, ZeroPageY,
    };

    let mut t: [Option<Opcode>; 256] = [None; 256];

    t[0x69] = op(Inst::Adc, Immediate, 2, 2);
    t[0x65] = op(Inst::Adc, ZeroPage, 2, 3);
    t[0x75] = op(Inst::Adc, ZeroPageX, 2, 4);
    t[0x6D] = op(Inst::Adc, Absolute, 3, 4);
    t[0x7D] = op_px(Inst::Adc, AbsoluteX, 3, 4);
    t[0x79] = op_px(Inst::Adc, AbsoluteY, 3, 4);
    t[0x61] = op(Inst::Adc, IndirectX, 2, 6);
    t[0x71] = op_px(Inst::Adc, IndirectY, 2, 5);

    t[0x29] = op(Inst::And, Immediate, 2, 2);
    t[0x25] = op(Inst::And, ZeroPage, 2, 3);
    t[0x35] = op(Inst::And, ZeroPageX, 2, 4);
    t[0x2D] = op(Inst::And, Absolute, 3, 4);
    t[0x3D] = op_px(Inst::And, AbsoluteX, 3, 4);
    t[0x39] = op_px(Inst::And, AbsoluteY, 3, 4);
    t[0x21] = op(Inst::And, IndirectX, 2, 6);
    t[0x31] = op_px(Inst::And, IndirectY, 2, 5);

    t[0x0A] = op(Inst::Asl, Accumulator, 1, 2);
    t[0x06] = op(Inst::Asl, ZeroPage, 2, 5);
    t[0x16] = op(Inst::Asl, ZeroPageX, 2, 6);
    t[0x0E] = op(Inst::Asl, Absolute, 3, 6);
    t[0x1E] = op(Inst::Asl, AbsoluteX, 3, 7);

    // Branches: +1 when taken, +1 more when the target is on a new page.
    t[0x90] = op(Inst::Bcc, Relative, 2, 2);
    t[0xB0] = op(Inst::Bcs, Relative, 2, 2);
    t[0xF0] = op(Inst::Beq, Relative, 2, 2);
    t[0x30] = op(Inst::Bmi, Relative, 2, 2);
    t[0xD0] = op(Inst::Bne, Relative, 2, 2);
    t[0x10] = op(Inst::Bpl, Relative, 2, 2);
    t[0x50] = op(Inst::Bvc, Relative, 2, 2);
    t[0x70] = op(Inst::Bvs, Relative, 2, 2);

    t[0x24] = op(Inst::Bit, ZeroPage, 2, 3);
    t[0x2C] = op(Inst::Bit, Absolute, 3, 4);

    // BRK carries a padding byte after the opcode.
    t[0x00] = op(Inst::Brk, Implied, 2, 7);

    t[0x18] = op(Inst::Clc, Implied, 1, 2);
    t[0xD8] = op(Inst::Cld, Implied, 1, 2);
    t[0x58] = op(Inst::Cli, Implied, 1, 2);
    t[0xB8] = op(Inst::Clv, Implied, 1, 2);

    t[0xC9] = op(Inst::Cmp, Immediate, 2, 2);
    t[0xC5] = op(Inst::Cmp, ZeroPage, 2, 3);
    t[0xD5] = op(Inst::Cmp, ZeroPageX, 2, 4);
    t[0xCD] = op(Inst::Cmp, Absolute, 3, 4);
    t[0xDD] = op_px(Inst::Cmp, AbsoluteX, 3, 4);
    t[0xD9] = op_px(Inst::Cmp, AbsoluteY, 3, 4);
    t[0xC1] = op(Inst::Cmp, IndirectX, 2, 6);
    t[0xD1] = op_px(Inst::Cmp, IndirectY, 2, 5);

    t[0xE0] = op(Inst::Cpx, Immediate, 2, 2);
    t[0xE4] = op(Inst::Cpx, ZeroPage, 2, 3);
    t[0xEC] = op(Inst::Cpx, Absolute, 3, 4);

    t[0xC0] = op(Inst::Cpy, Immediate, 2, 2);
    t[0xC4] = op(Inst::Cpy, ZeroPage, 2, 3);
    t[0xCC] = op(Inst::Cpy, Absolute, 3, 4);

    t[0xC6] = op(Inst::Dec, ZeroPage, 2, 5);
    t[0xD6] = op(Inst::Dec, ZeroPageX, 2, 6);
    t[0xCE] = op(Inst::Dec, Absolute, 3, 6);
    t[0xDE] = op(Inst::Dec, AbsoluteX, 3, 7);

    t[0xCA] = op(Inst::Dex, Implied, 1, 2);
    t[0x88] = op(Inst::Dey, Implied, 1, 2);

    t[0x49] = op(Inst::Eor, Immediate, 2, 2);
    t[0x45] = op(Inst::Eor, ZeroPage, 2, 3);
    t[0x55] = op(Inst::Eor, ZeroPageX, 2, 4);
    t[0x4D] = op(Inst::Eor, Absolute, 3, 4);
    t[0x5D] = op_px(Inst::Eor, AbsoluteX, 3, 4);
    t[0x59] = op_px(Inst::Eor, AbsoluteY, 3, 4);
    t[0x41] = op(Inst::Eor, IndirectX, 2, 6);
    t[0x51] = op_px(Inst::Eor, IndirectY, 2, 5);

    t[0xE6] = op(Inst::Inc, ZeroPage, 2, 5);
    t[0xF6] = op(Inst::Inc, ZeroPageX, 2, 6);
    t[0xEE] = op(Inst::Inc, Absolute, 3, 6);
    t[0xFE] = op(Inst::Inc, AbsoluteX, 3, 7);

    t[0xE8] = op(Inst::Inx, Implied, 1, 2);
    t[0xC8] = op(Inst::Iny, Implied, 1, 2);

    t[0x4C] = op(Inst::Jmp, Absolute, 3, 3);
    t[0x6C] = op(Inst::Jmp, Indirect, 3, 5);
    t[0x20] = op(Inst::Jsr, Absolute, 3, 6);

    t[0xA9] = op(Inst::Lda, Immediate, 2, 2);
    t[0xA5] = op(Inst::Lda, ZeroPage, 2, 3);
    t[0xB5] = op(Inst::Lda, ZeroPageX, 2, 4);
    t[0xAD] = op(Inst::Lda, Absolute, 3, 4);
    t[0xBD] = op_px(Inst::Lda, AbsoluteX, 3, 4);
    t[0xB9] = op_px(Inst::Lda, AbsoluteY, 3, 4);
    t[0xA1] = op(Inst::Lda, IndirectX, 2, 6);
    t[0xB1] = op_px(Inst::Lda, IndirectY, 2, 5);

    t[0xA2] = op(Inst::Ldx, Immediate, 2, 2);
    t[0xA6] = op(Inst::Ldx, ZeroPage, 2, 3);
    t[0xB6] = op(Inst::Ldx, ZeroPageY, 2, 4);
    t[0xAE] = op(Inst::Ldx, Absolute, 3, 4);
    t[0xBE] = op_px(Inst::Ldx, AbsoluteY, 3, 4);

    t[0xA0] = op(Inst::Ldy, Immediate, 2, 2);
    t[0xA4] = op(Inst::Ldy, ZeroPage, 2, 3);
    t[0xB4] = op(Inst::Ldy, ZeroPageX, 2, 4);
    t[0xAC] = op(Inst::Ldy, Absolute, 3, 4);
    t[0xBC] = op_px(Inst::Ldy, AbsoluteX, 3, 4);

    t[0x4A] = op(Inst::Lsr, Accumulator, 1, 2);
    t[0x46] = op(Inst::Lsr, ZeroPage, 2, 5);
    t[0x56] = op(Inst::Lsr, ZeroPageX, 2, 6);
    t[0x4E] = op(Inst::Lsr, Absolute, 3, 6);
    t[0x5E] = op(Inst::Lsr, AbsoluteX, 3, 7);

    t[0xEA] = op(Inst::Nop, Implied, 1, 2);

    t[0x09] = op(Inst::Ora, Immediate, 2, 2);
    t[0x05] = op(Inst::Ora, ZeroPage, 2, 3);
    t[0x15] = op(Inst::Ora, ZeroPageX, 2, 4);
    t[0x0D] = op(Inst::Ora, Absolute, 3, 4);
    t[0x1D] = op_px(Inst::Ora, AbsoluteX, 3, 4);
    t[0x19] = op_px(Inst::Ora, AbsoluteY, 3, 4);
    t[0x01] = op(Inst::Ora, IndirectX, 2, 6);
    t[0x11] = op_px(Inst::Ora, IndirectY, 2, 5);

    t[0x48] = op(Inst::Pha, Implied, 1, 3);
    t[0x08] = op(Inst::Php, Implied, 1, 3);
    t[0x68] = op(Inst::Pla, Implied, 1, 4);
    t[0x28] = op(Inst::Plp, Implied, 1, 4);

    t[0x2A] = op(Inst::Rol, Accumulator, 1, 2);
    t[0x26] = op(Inst::Rol, ZeroPage, 2, 5);
    t[0x36] = op(Inst::Rol, ZeroPageX, 2, 6);
    t[0x2E] = op(Inst::Rol, Absolute, 3, 6);
    t[0x3E] = op(Inst::Rol, AbsoluteX, 3, 7);

    t[0x6A] = op(Inst::Ror, Accumulator, 1, 2);
    t[0x66] = op(Inst::Ror, ZeroPage, 2, 5);
    t[0x76] = op(Inst::Ror, ZeroPageX, 2, 6);
    t[0x6E] = op(Inst::Ror, Absolute, 3, 6);
    t[0x7E] = op(Inst::Ror, AbsoluteX, 3, 7);

    t[0x40] = op(Inst::Rti, Implied, 1, 6);
    t[0x60] = op(Inst::Rts, Implied, 1, 6);

    t[0xE9] = op(Inst::Sbc, Immediate, 2, 2);
    t[0xE5] = op(Inst::Sbc, ZeroPage, 2, 3);
    t[0xF5] = op(Inst::Sbc, ZeroPageX, 2, 4);
    t[0xED] = op(Inst::Sbc, Absolute, 3, 4);
    t[0xFD] = op_px(Inst::Sbc, AbsoluteX, 3, 4);
    t[0xF9] = op_px(Inst::Sbc, AbsoluteY, 3, 4);
    t[0xE1] = op(Inst::Sbc, IndirectX, 2, 6);
    t[0xF1] = op_px(Inst::Sbc, IndirectY, 2, 5);

    t[0x38] = op(Inst::Sec, Implied, 1, 2);
    t[0xF8] = op(Inst::Sed, Implied, 1, 2);
    t[0x78] = op(Inst::Sei, Implied, 1, 2);

    // Stores never take the page-cross cycle; the indexed forms pay it
    // unconditionally in their base count.
    t[0x85] = op(Inst::Sta, ZeroPage, 2, 3);
    t[0x95] = op(Inst::Sta, ZeroPageX, 2, 4);
    t[0x8D] = op(Inst::Sta, Absolute, 3, 4);
    t[0x9D] = op(Inst::Sta, AbsoluteX, 3, 5);
    t[0x99] = op(Inst::Sta, AbsoluteY, 3, 5);
    t[0x81] = op(Inst::Sta, IndirectX, 2, 6);
    t[0x91] = op(Inst::Sta, IndirectY, 2, 6);

    t[0x86] = op(Inst::Stx, ZeroPage, 2, 3);
    t[0x96] = op(Inst::Stx, ZeroPageY, 2, 4);
    t[0x8E] = op(Inst::Stx, Absolute, 3, 4);

    t[0x84] = op(Inst::Sty, ZeroPage, 2, 3);
    t[0x94] = op(Inst::Sty, ZeroPageX, 2, 4);
    t[0x8C] = op(Inst::Sty, Absolute, 3, 4);

    t[0xAA] = op(Inst::Tax, Implied, 1, 2);
    t[0xA8] = op(Inst::Tay, Implied, 1, 2);
    t[0xBA] = op(Inst::Tsx, Implied, 1, 2);
    t[0x8A] = op(Inst::Txa, Implied, 1, 2);
    t[0x9A] = op(Inst::Txs, Implied, 1, 2);
    t[0x98] = op(Inst::Tya, Implied, 1, 2);

    // Undocumented NOPs with operands.
    t[0x80] = op(Inst::Nop, Immediate, 2, 2);
    t[0x04] = op(Inst::Nop, ZeroPage, 2, 3);
    t[0x44] = op(Inst::Nop, ZeroPage, 2, 3);
    t[0x64] = op(Inst::Nop, ZeroPage, 2, 3);
    t[0x0C] = op(Inst::Nop, Absolute, 3, 4);
    t[0x14] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0x34] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0x54] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0x74] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0xD4] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0xF4] = op(Inst::Nop, ZeroPageX, 2, 4);
    t[0x1A] = op(Inst::Nop, Implied, 1, 2);
    t[0x3A] = op(Inst::Nop, Implied, 1, 2);
    t[0x5A] = op(Inst::Nop, Implied, 1, 2);
    t[0x7A] = op(Inst::Nop, Implied, 1, 2);
    t[0xDA] = op(Inst::Nop, Implied, 1, 2);
    t[0xFA] = op(Inst::Nop, Implied, 1, 2);
    t[0x1C] = op_px(Inst::Nop, AbsoluteX, 3, 4);
    t[0x3C] = op_px(Inst::Nop, AbsoluteX, 3, 4);
    t[0x5C] = op_px(Inst::Nop, AbsoluteX, 3, 4);
    t[0x7C] = op_px(Inst::Nop, AbsoluteX, 3, 4);
    t[0xDC] = op_px(Inst::Nop, AbsoluteX, 3, 4);
    t[0xFC] = op_px(Inst::Nop, AbsoluteX, 3, 4);

    // Undocumented SBC alias.
    t[0xEB] = op(Inst::Sbc, Immediate, 2, 2);

    t[0xA3] = op(Inst::Lax, IndirectX, 2, 6);
    t[0xA7] = op(Inst::Lax, ZeroPage, 2, 3);
    t[0xAF] = op(Inst::Lax, Absolute, 3, 4);
    t[0xB3] = op_px(Inst::Lax, IndirectY, 2, 5);
    t[0xB7] = op(Inst::Lax, ZeroPageY, 2, 4);
    t[0xBF] = op_px(Inst::Lax, AbsoluteY, 3, 4);

    t[0x83] = op(Inst::Sax, IndirectX, 2, 6);
    t[0x87] = op(Inst::Sax, ZeroPage, 2, 3);
    t[0x8F] = op(Inst::Sax, Absolute, 3, 4);
    t[0x97] = op(Inst::Sax, ZeroPageY, 2, 4);

    t[0xC3] = op(Inst::Dcm, IndirectX, 2, 8);
    t[0xC7] = op(Inst::Dcm, ZeroPage, 2, 5);
    t[0xCF] = op(Inst::Dcm, Absolute, 3, 6);
    t[0xD3] = op(Inst::Dcm, IndirectY, 2, 8);
    t[0xD7] = op(Inst::Dcm, ZeroPageX, 2, 6);
    t[0xDB] = op(Inst::Dcm, AbsoluteY, 3, 7);
    t[0xDF] = op(Inst::Dcm, AbsoluteX, 3, 7);

    t[0xE3] = op(Inst::Isb, IndirectX, 2, 8);
    t[0xE7] = op(Inst::Isb, ZeroPage, 2, 5);
    t[0xEF] = op(Inst::Isb, Absolute, 3, 6);
    t[0xF3] = op(Inst::Isb, IndirectY, 2, 8);
    t[0xF7] = op(Inst::Isb, ZeroPageX, 2, 6);
    t[0xFB] = op(Inst::Isb, AbsoluteY, 3, 7);
    t[0xFF] = op(Inst::Isb, AbsoluteX, 3, 7);

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_coverage() {
        // All 151 documented opcodes plus the undocumented set: 23 NOP
        // encodings, SBC $EB, 6 LAX, 4 SAX, 7 DCM, 7 ISB.
        let count = OPCODES.iter().filter(|entry| entry.is_some()).count();
        assert_eq!(count, 199);
    }

    #[test]
    fn known_entries() {
        let adc = OPCODES[0x69].unwrap();
        assert_eq!(adc.inst, Inst::Adc);
        assert_eq!(adc.mode, AddrMode::Immediate);
        assert_eq!(adc.bytes, 2);
        assert_eq!(adc.cycles, 2);
        assert!(!adc.page_cycle);

        let lda_abx = OPCODES[0xBD].unwrap();
        assert_eq!(lda_abx.inst, Inst::Lda);
        assert!(lda_abx.page_cycle);

        let sta_abx = OPCODES[0x9D].unwrap();
        assert_eq!(sta_abx.cycles, 5);
        assert!(!sta_abx.page_cycle);
    }

    #[test]
    fn holes_are_invalid() {
        // JAM opcodes and other unassigned encodings stay out of the table.
        for invalid in [0x02u8, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2]
        {
            assert!(OPCODES[invalid as usize].is_none(), "0x{invalid:02X}");
        }
    }

    #[test]
    fn lengths_match_modes() {
        for entry in OPCODES.iter().flatten() {
            let want = match entry.mode {
                AddrMode::Implied | AddrMode::Accumulator => 1,
                AddrMode::Absolute
                | AddrMode::AbsoluteX
                | AddrMode::AbsoluteY
                | AddrMode::Indirect => 3,
                _ => 2,
            };
            // BRK is the one implied-mode instruction with a padding byte.
            if entry.inst == Inst::Brk {
                assert_eq!(entry.bytes, 2);
            } else {
                assert_eq!(entry.bytes, want, "{:?} {:?}", entry.inst, entry.mode);
            }
        }
    }
}

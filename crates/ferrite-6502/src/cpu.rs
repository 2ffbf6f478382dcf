//! MOS 6502 interpreter.
//!
//! Instruction-granular execution: `step()` runs one whole instruction and
//! charges its full cycle count as pending debt, `tick()` pays the debt
//! back one cycle at a time. A machine that clocks the CPU against other
//! components calls `tick()` once per CPU cycle and gets a new instruction
//! executed exactly when the previous one's cycles have elapsed.

use ferrite_core::Bus;

use crate::flags::{Status, C, D, I, N, U, V, Z};
use crate::opcodes::{AddrMode, Inst, Opcode, OPCODES};

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// The stack lives in page 1.
const STACK_PAGE: u16 = 0x0100;

/// Cycles the CPU stalls while the bus performs OAM DMA.
const DMA_STALL_CYCLES: u32 = 513;

/// A pending hardware interrupt, serviced at the next instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
}

/// CPU execution errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The byte at `pc` does not decode to any instruction in the table.
    InvalidInstruction { pc: u16, opcode: u8 },
}

impl std::fmt::Display for CpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInstruction { pc, opcode } => {
                write!(f, "invalid instruction 0x{opcode:02X} at ${pc:04X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}

/// The MOS 6502 CPU.
pub struct Cpu {
    /// Accumulator.
    a: u8,
    /// X index register.
    x: u8,
    /// Y index register.
    y: u8,
    /// Stack pointer; the stack occupies $0100-$01FF and wraps within it.
    s: u8,
    /// Program counter.
    pc: u16,
    /// Processor status.
    p: Status,
    /// Pending cycle debt, decremented once per `tick`.
    cycles: u32,
    /// Interrupt waiting to be serviced at the next `step`.
    pending: Option<Interrupt>,
}

impl Cpu {
    /// Power on the CPU: registers in their documented power-on state and
    /// PC loaded from the reset vector.
    pub fn new(bus: &mut impl Bus) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status::power_on(),
            cycles: 0,
            pending: None,
        };
        cpu.pc = cpu.read_word(bus, RESET_VECTOR);
        cpu
    }

    /// Reset: set I and U, reload PC from the reset vector, drop any
    /// cycle debt. Registers and the stack pointer are left alone, as on
    /// the real chip.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.p.set(I | U);
        self.pc = self.read_word(bus, RESET_VECTOR);
        self.cycles = 0;
        self.pending = None;
    }

    /// Advance one CPU cycle: pay down pending debt, or execute the next
    /// instruction when none remains.
    ///
    /// # Errors
    ///
    /// Propagates `CpuError::InvalidInstruction` from `step`.
    pub fn tick(&mut self, bus: &mut impl Bus) -> Result<(), CpuError> {
        if self.cycles > 0 {
            self.cycles -= 1;
            return Ok(());
        }
        self.step(bus)?;
        Ok(())
    }

    /// Service a pending interrupt or execute one instruction. The full
    /// cycle count is added to the pending debt and returned.
    ///
    /// # Errors
    ///
    /// Returns `CpuError::InvalidInstruction` when the opcode at PC is not
    /// in the table. PC is left pointing at the offending byte.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<u32, CpuError> {
        if let Some(interrupt) = self.pending.take() {
            return Ok(self.service_interrupt(bus, interrupt));
        }

        let byte = bus.read(self.pc);
        let Some(op) = OPCODES[byte as usize] else {
            return Err(CpuError::InvalidInstruction {
                pc: self.pc,
                opcode: byte,
            });
        };

        self.pc = self.pc.wrapping_add(1);
        let operand_pc = self.pc;

        let extra = self.execute(bus, &op);

        // Instructions that didn't redirect control flow consume their
        // remaining operand bytes here; the opcode byte is already paid.
        if self.pc == operand_pc {
            self.pc = self.pc.wrapping_add(u16::from(op.bytes) - 1);
        }

        let total = u32::from(op.cycles) + extra;
        self.cycles += total;
        Ok(total)
    }

    /// Raise the non-maskable interrupt line.
    pub fn trigger_nmi(&mut self) {
        self.pending = Some(Interrupt::Nmi);
    }

    /// Raise the IRQ line. Ignored while the I flag is set; never displaces
    /// a pending NMI.
    pub fn trigger_irq(&mut self) {
        if !self.p.is_set(I) && self.pending != Some(Interrupt::Nmi) {
            self.pending = Some(Interrupt::Irq);
        }
    }

    /// Stall the CPU for an OAM DMA transfer.
    pub fn add_dma_cycles(&mut self) {
        self.cycles += DMA_STALL_CYCLES;
    }

    // =======================================================================
    // Register access
    // =======================================================================

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr;
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_s(&mut self, value: u8) {
        self.s = value;
    }

    /// Replace the status byte; the unused bit stays set.
    pub fn set_status(&mut self, value: u8) {
        self.p = Status(value | U);
    }

    #[must_use]
    pub fn a(&self) -> u8 {
        self.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.y
    }

    #[must_use]
    pub fn s(&self) -> u8 {
        self.s
    }

    /// Raw status byte.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.p.0
    }

    /// Pending cycle debt.
    #[must_use]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    // =======================================================================
    // Interrupt servicing
    // =======================================================================

    fn service_interrupt(&mut self, bus: &mut impl Bus, interrupt: Interrupt) -> u32 {
        self.push_word(bus, self.pc);
        self.push(bus, self.p.to_pushed_irq());
        self.p.set(I);

        let (vector, cycles) = match interrupt {
            Interrupt::Nmi => (NMI_VECTOR, 7),
            Interrupt::Irq => (IRQ_VECTOR, 8),
        };
        self.pc = self.read_word(bus, vector);
        self.cycles += cycles;
        cycles
    }

    // =======================================================================
    // Memory helpers
    // =======================================================================

    fn read_word(&self, bus: &mut impl Bus, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Read a pointer from the zero page; the high byte wraps within the
    /// page ($FF -> $00).
    fn read_word_zp(&self, bus: &mut impl Bus, ptr: u8) -> u16 {
        let lo = bus.read(u16::from(ptr));
        let hi = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_PAGE + u16::from(self.s), value);
        self.s = self.s.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(STACK_PAGE + u16::from(self.s))
    }

    fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    fn pull_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    // =======================================================================
    // Addressing
    // =======================================================================

    /// Resolve an operand address. PC points at the first operand byte and
    /// is not advanced; `step` consumes the operand bytes afterwards.
    /// Returns the effective address and whether indexing crossed a page.
    fn resolve(&self, bus: &mut impl Bus, mode: AddrMode) -> (u16, bool) {
        match mode {
            AddrMode::Immediate => (self.pc, false),
            AddrMode::ZeroPage => (u16::from(bus.read(self.pc)), false),
            AddrMode::ZeroPageX => {
                (u16::from(bus.read(self.pc).wrapping_add(self.x)), false)
            }
            AddrMode::ZeroPageY => {
                (u16::from(bus.read(self.pc).wrapping_add(self.y)), false)
            }
            AddrMode::Absolute => (self.read_word(bus, self.pc), false),
            AddrMode::AbsoluteX => {
                let base = self.read_word(bus, self.pc);
                let addr = base.wrapping_add(u16::from(self.x));
                (addr, page_crossed(base, addr))
            }
            AddrMode::AbsoluteY => {
                let base = self.read_word(bus, self.pc);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, page_crossed(base, addr))
            }
            AddrMode::Indirect => {
                let ptr = self.read_word(bus, self.pc);
                (self.read_word(bus, ptr), false)
            }
            AddrMode::IndirectX => {
                let ptr = bus.read(self.pc).wrapping_add(self.x);
                (self.read_word_zp(bus, ptr), false)
            }
            AddrMode::IndirectY => {
                let ptr = bus.read(self.pc);
                let base = self.read_word_zp(bus, ptr);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, page_crossed(base, addr))
            }
            AddrMode::Relative | AddrMode::Implied | AddrMode::Accumulator => {
                unreachable!("mode {mode:?} has no operand address")
            }
        }
    }

    /// Read the operand value for a read-type instruction. Returns the
    /// value and the page-cross flag.
    fn load(&self, bus: &mut impl Bus, mode: AddrMode) -> (u8, bool) {
        let (addr, crossed) = self.resolve(bus, mode);
        (bus.read(addr), crossed)
    }

    // =======================================================================
    // Execution
    // =======================================================================

    /// Execute one decoded instruction. Returns extra cycles beyond the
    /// base count (page crossings, branch charges).
    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, bus: &mut impl Bus, op: &Opcode) -> u32 {
        match op.inst {
            Inst::Adc => {
                let (value, crossed) = self.load(bus, op.mode);
                self.adc(value);
                page_extra(op, crossed)
            }
            Inst::Sbc => {
                let (value, crossed) = self.load(bus, op.mode);
                self.sbc(value);
                page_extra(op, crossed)
            }
            Inst::And => {
                let (value, crossed) = self.load(bus, op.mode);
                self.a &= value;
                self.p.update_nz(self.a);
                page_extra(op, crossed)
            }
            Inst::Ora => {
                let (value, crossed) = self.load(bus, op.mode);
                self.a |= value;
                self.p.update_nz(self.a);
                page_extra(op, crossed)
            }
            Inst::Eor => {
                let (value, crossed) = self.load(bus, op.mode);
                self.a ^= value;
                self.p.update_nz(self.a);
                page_extra(op, crossed)
            }
            Inst::Cmp => {
                let (value, crossed) = self.load(bus, op.mode);
                self.compare(self.a, value);
                page_extra(op, crossed)
            }
            Inst::Cpx => {
                let (value, _) = self.load(bus, op.mode);
                self.compare(self.x, value);
                0
            }
            Inst::Cpy => {
                let (value, _) = self.load(bus, op.mode);
                self.compare(self.y, value);
                0
            }
            Inst::Bit => {
                let (value, _) = self.load(bus, op.mode);
                self.p.set_if(Z, self.a & value == 0);
                self.p.set_if(N, value & 0x80 != 0);
                self.p.set_if(V, value & 0x40 != 0);
                0
            }
            Inst::Lda => {
                let (value, crossed) = self.load(bus, op.mode);
                self.a = value;
                self.p.update_nz(value);
                page_extra(op, crossed)
            }
            Inst::Ldx => {
                let (value, crossed) = self.load(bus, op.mode);
                self.x = value;
                self.p.update_nz(value);
                page_extra(op, crossed)
            }
            Inst::Ldy => {
                let (value, crossed) = self.load(bus, op.mode);
                self.y = value;
                self.p.update_nz(value);
                page_extra(op, crossed)
            }
            Inst::Sta => {
                let (addr, _) = self.resolve(bus, op.mode);
                bus.write(addr, self.a);
                0
            }
            Inst::Stx => {
                let (addr, _) = self.resolve(bus, op.mode);
                bus.write(addr, self.x);
                0
            }
            Inst::Sty => {
                let (addr, _) = self.resolve(bus, op.mode);
                bus.write(addr, self.y);
                0
            }
            Inst::Asl => self.rmw(bus, op, Self::asl),
            Inst::Lsr => self.rmw(bus, op, Self::lsr),
            Inst::Rol => self.rmw(bus, op, Self::rol),
            Inst::Ror => self.rmw(bus, op, Self::ror),
            Inst::Inc => self.rmw(bus, op, Self::inc),
            Inst::Dec => self.rmw(bus, op, Self::dec),
            Inst::Inx => {
                self.x = self.x.wrapping_add(1);
                self.p.update_nz(self.x);
                0
            }
            Inst::Iny => {
                self.y = self.y.wrapping_add(1);
                self.p.update_nz(self.y);
                0
            }
            Inst::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.p.update_nz(self.x);
                0
            }
            Inst::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.p.update_nz(self.y);
                0
            }
            Inst::Bcc => self.branch(bus, !self.p.is_set(C)),
            Inst::Bcs => self.branch(bus, self.p.is_set(C)),
            Inst::Bne => self.branch(bus, !self.p.is_set(Z)),
            Inst::Beq => self.branch(bus, self.p.is_set(Z)),
            Inst::Bpl => self.branch(bus, !self.p.is_set(N)),
            Inst::Bmi => self.branch(bus, self.p.is_set(N)),
            Inst::Bvc => self.branch(bus, !self.p.is_set(V)),
            Inst::Bvs => self.branch(bus, self.p.is_set(V)),
            Inst::Jmp => {
                let (addr, _) = self.resolve(bus, op.mode);
                self.pc = addr;
                0
            }
            Inst::Jsr => {
                let (addr, _) = self.resolve(bus, op.mode);
                // Return address minus one: the second operand byte.
                self.push_word(bus, self.pc.wrapping_add(1));
                self.pc = addr;
                0
            }
            Inst::Rts => {
                self.pc = self.pull_word(bus).wrapping_add(1);
                0
            }
            Inst::Rti => {
                let status = self.pull(bus);
                self.p = Status::from_pulled(status);
                self.pc = self.pull_word(bus);
                0
            }
            Inst::Brk => {
                self.push_word(bus, self.pc.wrapping_add(1));
                self.push(bus, self.p.to_pushed_brk());
                self.pc = self.read_word(bus, IRQ_VECTOR);
                self.p.set(I);
                0
            }
            Inst::Pha => {
                self.push(bus, self.a);
                0
            }
            Inst::Php => {
                self.push(bus, self.p.to_pushed_brk());
                0
            }
            Inst::Pla => {
                self.a = self.pull(bus);
                self.p.update_nz(self.a);
                0
            }
            Inst::Plp => {
                let status = self.pull(bus);
                self.p = Status::from_pulled(status);
                0
            }
            Inst::Clc => {
                self.p.clear(C);
                0
            }
            Inst::Sec => {
                self.p.set(C);
                0
            }
            Inst::Cli => {
                self.p.clear(I);
                0
            }
            Inst::Sei => {
                self.p.set(I);
                0
            }
            Inst::Cld => {
                self.p.clear(D);
                0
            }
            Inst::Sed => {
                self.p.set(D);
                0
            }
            Inst::Clv => {
                self.p.clear(V);
                0
            }
            Inst::Tax => {
                self.x = self.a;
                self.p.update_nz(self.x);
                0
            }
            Inst::Tay => {
                self.y = self.a;
                self.p.update_nz(self.y);
                0
            }
            Inst::Tsx => {
                self.x = self.s;
                self.p.update_nz(self.x);
                0
            }
            Inst::Txa => {
                self.a = self.x;
                self.p.update_nz(self.a);
                0
            }
            Inst::Txs => {
                self.s = self.x;
                0
            }
            Inst::Tya => {
                self.a = self.y;
                self.p.update_nz(self.a);
                0
            }
            Inst::Nop => {
                // Operand-carrying NOP encodings still resolve (and pay
                // for) their operand.
                match op.mode {
                    AddrMode::Implied => 0,
                    _ => {
                        let (_, crossed) = self.resolve(bus, op.mode);
                        page_extra(op, crossed)
                    }
                }
            }
            Inst::Lax => {
                let (value, crossed) = self.load(bus, op.mode);
                self.a = value;
                self.x = value;
                self.p.update_nz(value);
                page_extra(op, crossed)
            }
            Inst::Sax => {
                let (addr, _) = self.resolve(bus, op.mode);
                bus.write(addr, self.a & self.x);
                0
            }
            Inst::Dcm => {
                let (addr, _) = self.resolve(bus, op.mode);
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.compare(self.a, value);
                0
            }
            Inst::Isb => {
                let (addr, _) = self.resolve(bus, op.mode);
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.sbc(value);
                0
            }
        }
    }

    /// Conditional branch. Charges +1 when taken and +1 more when the
    /// target lands on a different page than the branch instruction
    /// itself. PC points at the offset byte here, so the instruction
    /// started one byte back.
    fn branch(&mut self, bus: &mut impl Bus, taken: bool) -> u32 {
        if !taken {
            return 0;
        }
        let offset = bus.read(self.pc) as i8;
        let target = self.pc.wrapping_add(1).wrapping_add(offset as u16);
        let extra = 1 + u32::from(page_crossed(target, self.pc.wrapping_sub(1)));
        self.pc = target;
        extra
    }

    /// Read-modify-write dispatch: accumulator or memory operand.
    fn rmw(&mut self, bus: &mut impl Bus, op: &Opcode, f: fn(&mut Self, u8) -> u8) -> u32 {
        if op.mode == AddrMode::Accumulator {
            self.a = f(self, self.a);
        } else {
            let (addr, _) = self.resolve(bus, op.mode);
            let value = bus.read(addr);
            let result = f(self, value);
            bus.write(addr, result);
        }
        0
    }

    // =======================================================================
    // ALU
    // =======================================================================

    fn adc(&mut self, value: u8) {
        if self.p.is_set(D) {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let carry = u16::from(self.p.is_set(C));
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;

        self.p.set_if(C, sum > 0xFF);
        self.p
            .set_if(V, (self.a ^ result) & (value ^ result) & 0x80 != 0);
        self.a = result;
        self.p.update_nz(result);
    }

    /// Decimal-mode add: both operands are decoded from BCD, summed in
    /// decimal, and re-encoded. Carry is a decimal carry (sum > 99); N and
    /// Z come from the re-encoded result.
    fn adc_decimal(&mut self, value: u8) {
        let carry = u16::from(self.p.is_set(C));
        let sum = u16::from(decode_bcd(self.a)) + u16::from(decode_bcd(value)) + carry;
        self.p.set_if(C, sum > 99);
        self.a = encode_bcd((sum % 100) as u8);
        self.p.update_nz(self.a);
    }

    fn sbc(&mut self, value: u8) {
        if self.p.is_set(D) {
            self.sbc_decimal(value);
        } else {
            // Binary SBC is ADC of the one's complement.
            self.adc_binary(!value);
        }
    }

    /// Decimal-mode subtract with the 6502's inverted borrow: carry clear
    /// means borrow. Carry is set when no borrow out occurred.
    fn sbc_decimal(&mut self, value: u8) {
        let borrow = i16::from(!self.p.is_set(C));
        let diff = i16::from(decode_bcd(self.a)) - i16::from(decode_bcd(value)) - borrow;
        self.p.set_if(C, diff >= 0);
        self.a = encode_bcd(diff.rem_euclid(100) as u8);
        self.p.update_nz(self.a);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.p.set_if(C, register >= value);
        self.p.update_nz(result);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.p.is_set(C));
        self.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.p.is_set(C) { 0x80 } else { 0 };
        self.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.p.update_nz(result);
        result
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.p.update_nz(result);
        result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.p.update_nz(result);
        result
    }

    // =======================================================================
    // Disassembly
    // =======================================================================

    /// Disassemble the instruction at PC, e.g. `$C000: LDA #$05`.
    pub fn inst(&self, bus: &mut impl Bus) -> String {
        let byte = bus.read(self.pc);
        let Some(op) = OPCODES[byte as usize] else {
            return format!("${:04X}: ??? (0x{byte:02X})", self.pc);
        };

        let lo = bus.read(self.pc.wrapping_add(1));
        let hi = bus.read(self.pc.wrapping_add(2));
        let word = u16::from_le_bytes([lo, hi]);

        let operand = match op.mode {
            AddrMode::Implied => String::new(),
            AddrMode::Accumulator => " A".to_string(),
            AddrMode::Immediate => format!(" #${lo:02X}"),
            AddrMode::ZeroPage => format!(" ${lo:02X}"),
            AddrMode::ZeroPageX => format!(" ${lo:02X},X"),
            AddrMode::ZeroPageY => format!(" ${lo:02X},Y"),
            AddrMode::Relative => {
                let target = self.pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
                format!(" ${target:04X}")
            }
            AddrMode::Absolute => format!(" ${word:04X}"),
            AddrMode::AbsoluteX => format!(" ${word:04X},X"),
            AddrMode::AbsoluteY => format!(" ${word:04X},Y"),
            AddrMode::Indirect => format!(" (${word:04X})"),
            AddrMode::IndirectX => format!(" (${lo:02X},X)"),
            AddrMode::IndirectY => format!(" (${lo:02X}),Y"),
        };

        format!("${:04X}: {}{operand}", self.pc, op.inst.mnemonic())
    }
}

impl std::fmt::Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A,X,Y: {:3}, {:3}, {:3}; PC: ${:04X}, S: ${:02X}, P: {}",
            self.a, self.x, self.y, self.pc, self.s, self.p
        )
    }
}

const fn page_crossed(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

/// Extra cycle for a page crossing, for opcodes whose table entry pays it.
fn page_extra(op: &Opcode, crossed: bool) -> u32 {
    u32::from(op.page_cycle && crossed)
}

/// 0x42 -> 42.
const fn decode_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// 42 -> 0x42.
const fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

//! Klaus Dormann's 6502 functional test harness.
//!
//! The functional test exercises every documented opcode and traps
//! (branches to itself) on failure. The binary image starts at offset
//! $000A, the entry point is $0400, and the success trap sits at $3469.
//!
//! Test data is not checked in; drop the assembled binary at
//! `tests/data/6502_functional_test.bin` to run this.

use std::path::Path;

use ferrite_6502::Cpu;
use ferrite_core::SimpleBus;

const LOAD_ADDR: u16 = 0x000A;
const ENTRY: u16 = 0x0400;
const SUCCESS_TRAP: u16 = 0x3469;

fn run_functional(binary: &[u8]) -> u16 {
    let mut bus = SimpleBus::new();
    bus.load(LOAD_ADDR, binary);

    let mut cpu = Cpu::new(&mut bus);
    cpu.set_pc(ENTRY);

    let mut instructions: u64 = 0;
    let mut prev_pc = 0xFFFF;
    let mut same_pc_count = 0;

    loop {
        let pc = cpu.pc();

        // A trap is a branch to itself: PC stops moving.
        if pc == prev_pc {
            same_pc_count += 1;
            if same_pc_count > 2 {
                eprintln!("trapped at ${pc:04X} after {instructions} instructions");
                return pc;
            }
        } else {
            same_pc_count = 0;
            prev_pc = pc;
        }

        if let Err(err) = cpu.step(&mut bus) {
            eprintln!("{err} ({})", cpu.inst(&mut bus));
            return cpu.pc();
        }
        instructions += 1;

        if instructions % 1_000_000 == 0 {
            eprintln!("[{instructions} instructions, PC=${:04X}]", cpu.pc());
        }

        assert!(
            instructions < 100_000_000,
            "test exceeded 100M instructions"
        );
    }
}

#[test]
fn dormann_functional() {
    let path = Path::new("tests/data/6502_functional_test.bin");
    if !path.exists() {
        eprintln!("skipping: {} not present", path.display());
        return;
    }
    let binary = std::fs::read(path).expect("read test binary");
    let trapped_at = run_functional(&binary);
    assert_eq!(
        trapped_at, SUCCESS_TRAP,
        "functional test trapped at ${trapped_at:04X}"
    );
}

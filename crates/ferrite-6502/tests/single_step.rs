//! Tom Harte's `SingleStepTests` for the 6502.
//!
//! Each opcode has a JSON file of 10,000 cases giving an initial CPU/RAM
//! state and the expected final state. This CPU is instruction-granular,
//! so only registers and memory are compared, not per-cycle bus traffic.
//!
//! Cases are skipped when:
//! - the opcode is not in the table (JAM and the unimplemented illegals),
//! - the initial state has the D flag set (this core implements plain
//!   BCD arithmetic, not the NMOS nibble quirks the vectors encode),
//! - the opcode is $6C (indirect JMP here reads a plain 16-bit pointer,
//!   without the NMOS page-wrap quirk the vectors encode).
//!
//! Test data lives in `tests/data/65x02/6502/v1/XX.json` and is not
//! checked in.

use std::fs;
use std::path::Path;

use ferrite_6502::{Cpu, OPCODES};
use ferrite_core::{Bus, SimpleBus};
use serde::Deserialize;

#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
}

#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(bus: &mut SimpleBus, state: &CpuState) -> Cpu {
    for &(addr, value) in &state.ram {
        bus.write(addr, value);
    }
    let mut cpu = Cpu::new(bus);
    cpu.set_pc(state.pc);
    cpu.set_s(state.s);
    cpu.set_a(state.a);
    cpu.set_x(state.x);
    cpu.set_y(state.y);
    cpu.set_status(state.p);
    cpu
}

fn compare(cpu: &Cpu, bus: &SimpleBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    if cpu.pc() != expected.pc {
        errors.push(format!("PC: got ${:04X}, want ${:04X}", cpu.pc(), expected.pc));
    }
    if cpu.s() != expected.s {
        errors.push(format!("S: got ${:02X}, want ${:02X}", cpu.s(), expected.s));
    }
    if cpu.a() != expected.a {
        errors.push(format!("A: got ${:02X}, want ${:02X}", cpu.a(), expected.a));
    }
    if cpu.x() != expected.x {
        errors.push(format!("X: got ${:02X}, want ${:02X}", cpu.x(), expected.x));
    }
    if cpu.y() != expected.y {
        errors.push(format!("Y: got ${:02X}, want ${:02X}", cpu.y(), expected.y));
    }
    // Bits 4-5 only exist in stack images of P; compare the real flags.
    if cpu.status() | 0x30 != expected.p | 0x30 {
        errors.push(format!(
            "P: got ${:02X}, want ${:02X}",
            cpu.status(),
            expected.p
        ));
    }
    for &(addr, value) in &expected.ram {
        if bus.peek(addr) != value {
            errors.push(format!(
                "[{addr:04X}]: got ${:02X}, want ${value:02X}",
                bus.peek(addr)
            ));
        }
    }
    errors
}

#[test]
fn single_step_vectors() {
    let test_dir = Path::new("tests/data/65x02/6502/v1");
    if !test_dir.exists() {
        eprintln!("skipping: {} not present", test_dir.display());
        return;
    }

    let mut total = 0u64;
    let mut failures = 0u64;

    for opcode in 0..=0xFFu8 {
        if OPCODES[usize::from(opcode)].is_none() || opcode == 0x6C {
            continue;
        }
        let path = test_dir.join(format!("{opcode:02x}.json"));
        if !path.exists() {
            continue;
        }

        let contents = fs::read_to_string(&path).expect("read test file");
        let cases: Vec<TestCase> = serde_json::from_str(&contents).expect("parse test file");

        for case in &cases {
            if case.initial.p & 0x08 != 0 {
                continue; // Decimal mode
            }
            total += 1;

            let mut bus = SimpleBus::new();
            let mut cpu = setup(&mut bus, &case.initial);
            if cpu.step(&mut bus).is_err() {
                failures += 1;
                eprintln!("{}: invalid instruction", case.name);
                continue;
            }

            let errors = compare(&cpu, &bus, &case.final_state);
            if !errors.is_empty() {
                failures += 1;
                if failures <= 10 {
                    eprintln!("{}: {}", case.name, errors.join("; "));
                }
            }
        }
    }

    eprintln!("{total} cases, {failures} failures");
    assert_eq!(failures, 0);
}

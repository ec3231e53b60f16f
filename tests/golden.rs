//! End-to-end golden tests covering spec §8's properties (P1-P6) and
//! numbered scenarios (1-6) against the full tokenizer -> binder ->
//! parser -> encoder -> driver pipeline.

use std::fs;
use std::io::Read;

use tempfile::tempdir;

use toyasm::assembler::driver::{assemble_file, Options};
use toyasm::diagnostics::NotificationBus;
use toyasm::simulator::Simulator;

fn assemble(dir: &std::path::Path, name: &str, source: &str) -> (std::path::PathBuf, toyasm::assembler::driver::AssembleOutcome) {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    let mut bus = NotificationBus::new(false);
    let outcome = assemble_file(&path, &Options::default(), &mut bus).unwrap();
    (path, outcome)
}

fn read_obj(path: &std::path::Path) -> Vec<u8> {
    let mut bytes = Vec::new();
    fs::File::open(path.with_extension("obj")).unwrap().read_to_end(&mut bytes).unwrap();
    bytes
}

#[test]
fn scenario_1_empty_program() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(dir.path(), "empty.asm", "  .BEGIN\n  .END\n");
    assert!(!outcome.failed());

    let obj = read_obj(&path);
    assert_eq!(obj, vec![0x00, 0x00]);

    let hex = fs::read_to_string(path.with_extension("hex")).unwrap();
    assert_eq!(hex, "0000\n");

    let sym = fs::read_to_string(path.with_extension("sym")).unwrap();
    assert!(!sym.lines().any(|l| !l.starts_with("//")));
}

#[test]
fn scenario_2_single_data_word() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(dir.path(), "data.asm", "  .BEGIN\nX .DATA 42\n  .END\n");
    assert!(!outcome.failed());

    let obj = read_obj(&path);
    assert_eq!(obj, vec![0x00, 0x00, 0x00, 0x2A]);

    let sym = fs::read_to_string(path.with_extension("sym")).unwrap();
    assert!(sym.contains("X"));
    assert!(sym.contains("0001"));
}

#[test]
fn scenario_3_load_and_halt_round_trips_through_the_simulator() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(
        dir.path(),
        "loadhalt.asm",
        "  .BEGIN\n  LOAD A\n  HALT\nA .DATA 7\n  .END\n",
    );
    assert!(!outcome.failed());

    let obj = read_obj(&path);
    assert_eq!(obj, vec![0x00, 0x00, 0x00, 0x03, 0xF0, 0x00, 0x00, 0x07]);

    let mut sim = Simulator::new();
    sim.load(&obj);
    sim.run().unwrap();
    assert_eq!(sim.r, 7);
    assert!(sim.is_halted);
}

#[test]
fn scenario_4_duplicate_label_reports_previous_definition() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.asm");
    fs::write(&path, "  .BEGIN\nA .DATA 1\nA .DATA 2\n  .END\n").unwrap();

    let mut bus = NotificationBus::new(false);
    let outcome = assemble_file(&path, &Options::default(), &mut bus).unwrap();
    assert!(outcome.failed());
    assert_eq!(outcome.error_count, 2);
    assert!(!path.with_extension("obj").exists());
}

#[test]
fn scenario_5_instruction_before_begin_is_diagnosed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("early.asm");
    fs::write(&path, "HALT\n  .BEGIN\n  .END\n").unwrap();

    let mut bus = NotificationBus::new(false);
    let outcome = assemble_file(&path, &Options::default(), &mut bus).unwrap();
    assert!(outcome.failed());
    assert_eq!(outcome.error_count, 1);
}

#[test]
fn scenario_6_decimal_overflow_blocks_obj_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overflow.asm");
    fs::write(&path, "  .BEGIN\n  .DATA 40000\n  .END\n").unwrap();

    let mut bus = NotificationBus::new(false);
    let outcome = assemble_file(&path, &Options::default(), &mut bus).unwrap();
    assert!(outcome.failed());
    assert!(!path.with_extension("obj").exists());
}

#[test]
fn property_p1_obj_length_is_twice_emitted_word_count() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(
        dir.path(),
        "p1.asm",
        "  .BEGIN\n  LOAD A\n  STORE A\n  HALT\nA .DATA 3\n  .END\n",
    );
    assert!(!outcome.failed());
    let obj = read_obj(&path);
    // origin + LOAD + STORE + HALT + DATA = 5 words.
    assert_eq!(obj.len(), 10);
}

#[test]
fn property_p2_listing_header_is_bit_exact() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(dir.path(), "p2.asm", "  .BEGIN\nX .DATA 42\n  .END\n");
    assert!(!outcome.failed());
    let lst = fs::read_to_string(path.with_extension("lst")).unwrap();
    let lines: Vec<&str> = lst.lines().collect();
    assert_eq!(lines[0], format!("(0000) 0000 0000000000000000 ({:>4}) {:<30} .BEGIN 0x0000", 1, ""));
    assert!(lines[1].starts_with("(0001) 002A 0000000000101010 (   2) "));
}

#[test]
fn property_p3_hex_matches_obj_bytes() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(dir.path(), "p3.asm", "  .BEGIN\nX .DATA 4660\n  .END\n");
    assert!(!outcome.failed());
    let obj = read_obj(&path);
    let hex = fs::read_to_string(path.with_extension("hex")).unwrap();
    let hex_lines: Vec<&str> = hex.lines().collect();
    for (n, line) in hex_lines.iter().enumerate() {
        let word = u16::from_be_bytes([obj[2 * n], obj[2 * n + 1]]);
        assert_eq!(*line, format!("{:04X}", word));
    }
}

#[test]
fn property_p4_bin_matches_word_bits() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(dir.path(), "p4.asm", "  .BEGIN\nX .DATA 5\n  .END\n");
    assert!(!outcome.failed());
    let obj = read_obj(&path);
    let bin = fs::read_to_string(path.with_extension("bin")).unwrap();
    let bin_lines: Vec<&str> = bin.lines().collect();
    let word = u16::from_be_bytes([obj[2], obj[3]]);
    assert_eq!(bin_lines[1], format!("{:016b}", word));
}

#[test]
fn property_p5_sym_address_matches_label_token_address() {
    let dir = tempdir().unwrap();
    let (path, outcome) = assemble(
        dir.path(),
        "p5.asm",
        "  .BEGIN\n  LOAD A\nA .DATA 9\n  .END\n",
    );
    assert!(!outcome.failed());
    let sym = fs::read_to_string(path.with_extension("sym")).unwrap();
    let row = sym.lines().find(|l| l.contains("A")).unwrap();
    assert!(row.contains("0002"));
}

#[test]
fn property_p6_assembler_and_simulator_round_trip_is_deterministic() {
    let dir = tempdir().unwrap();
    let (path, _) = assemble(
        dir.path(),
        "p6.asm",
        "  .BEGIN\n  LOAD A\n  OUT A\n  HALT\nA .DATA 99\n  .END\n",
    );
    let obj = read_obj(&path);

    let mut first = Simulator::new();
    first.load(&obj);
    let mut out1 = Vec::new();
    first.run_with_io(&mut std::io::empty(), &mut out1).unwrap();

    let mut second = Simulator::new();
    second.load(&obj);
    let mut out2 = Vec::new();
    second.run_with_io(&mut std::io::empty(), &mut out2).unwrap();

    assert_eq!(out1, out2);
}

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pulseq-as"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn default_output_and_listing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fid.txt"), "NOP\nHALT\n").unwrap();

    let output = run(dir.path(), &["fid.txt"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("wrote 2 words (16 bytes) to fid.bin"));

    let image = fs::read(dir.path().join("fid.bin")).unwrap();
    assert_eq!(image.len(), 16);
    assert_eq!(&image[12..16], &0x6400_0000_u32.to_le_bytes());
    assert!(dir.path().join("fid_hex.txt").exists());
}

#[test]
fn input_named_like_its_output_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.bin");
    fs::write(&input, "NOP\nHALT\n").unwrap();

    let output = run(dir.path(), &["prog.bin"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("OutputWriteError"));
    assert_eq!(fs::read_to_string(&input).unwrap(), "NOP\nHALT\n");
}

#[test]
fn explicit_output_equal_to_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("se.txt"), "HALT\n").unwrap();

    let output = run(dir.path(), &["se.txt", "-o", "./se.txt"]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("se.txt")).unwrap(), "HALT\n");
}

#[test]
fn output_flag_needs_a_single_input() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "NOP\n").unwrap();
    fs::write(dir.path().join("b.txt"), "NOP\n").unwrap();

    let output = run(dir.path(), &["a.txt", "b.txt", "-o", "out.bin"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("CLIArgParseError"));
    assert!(!dir.path().join("out.bin").exists());
}

#[test]
fn several_inputs_each_get_an_image() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "NOP\n").unwrap();
    fs::write(dir.path().join("b.txt"), "NOP\nHALT\n").unwrap();

    let output = run(dir.path(), &["a.txt", "b.txt"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert_eq!(fs::read(dir.path().join("a.bin")).unwrap().len(), 8);
    assert_eq!(fs::read(dir.path().join("b.bin")).unwrap().len(), 16);
}

#[test]
fn framed_image_starts_with_upload_header() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("se.txt"), "HALT\n").unwrap();

    let output = run(dir.path(), &["se.txt", "--framed", "-o", "se.img"]);
    assert!(output.status.success(), "{}", stdout(&output));
    let image = fs::read(dir.path().join("se.img")).unwrap();
    assert_eq!(image.len(), 48);
    assert_eq!(&image[0..4], &4u32.to_le_bytes());
    assert!(image[4..40].iter().all(|b| *b == 0));
    assert_eq!(&image[44..48], &0x6400_0000_u32.to_le_bytes());
}

#[test]
fn no_listing_skips_hex_dump() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("se.txt"), "HALT\n").unwrap();

    let output = run(dir.path(), &["se.txt", "--no-listing"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(dir.path().join("se.bin").exists());
    assert!(!dir.path().join("se_hex.txt").exists());
}

#[test]
fn strict_symbols_reaches_the_assembler() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("loop.txt"), "JNZ 1 10\nHALT\n").unwrap();

    assert!(run(dir.path(), &["loop.txt"]).status.success());
    let output = run(dir.path(), &["loop.txt", "--strict-symbols", "-o", "strict.bin"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("UnresolvedSymbol"));
    assert!(!dir.path().join("strict.bin").exists());
}

#[test]
fn combine_literals_reaches_the_assembler() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("g.txt"), "G = TX_GATE | 100\n").unwrap();

    assert!(run(dir.path(), &["g.txt", "-o", "legacy.bin"]).status.success());
    assert!(run(dir.path(), &["g.txt", "-o", "combined.bin", "--combine-literals"])
        .status
        .success());
    let legacy = fs::read(dir.path().join("legacy.bin")).unwrap();
    let combined = fs::read(dir.path().join("combined.bin")).unwrap();
    assert_eq!(&legacy[0..4], &0x100_u32.to_le_bytes());
    assert_eq!(&combined[0..4], &0x110_u32.to_le_bytes());
}

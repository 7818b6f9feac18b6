use assert_cmd::Command;
use std::fs;

fn write_fasta(dir: &tempfile::TempDir, name: &str, records: &[(&str, &str)]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut text = String::new();
    for (id, seq) in records {
        text.push_str(&format!(">{id}\n{seq}\n"));
    }
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn convert_writes_msf() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fasta(&dir, "aligned.fasta", &[("seq1", "MK-VAL"), ("seq2", "MKT-AL")]);
    let output = dir.path().join("aligned.msf");

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.arg("convert").arg(&input).arg(&output);
    cmd.assert().success();

    let msf = fs::read_to_string(&output).unwrap();
    assert!(msf.starts_with("PileUp"));
    assert!(msf.contains(" MSF: 6 "));
    assert!(msf.contains("Name: seq1"));
    assert!(msf.contains("MK.VAL"));
}

#[test]
fn convert_rejects_ragged_alignment() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fasta(&dir, "ragged.fasta", &[("a", "MKVAL"), ("b", "MK")]);
    let output = dir.path().join("out.msf");

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.arg("convert").arg(&input).arg(&output);
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unequal lengths"));
}

#[test]
fn align_stops_on_insufficient_sequences() {
    // The count check runs before any model loading, so no checkpoints are
    // needed to exercise it.
    let dir = tempfile::tempdir().unwrap();
    let input = write_fasta(&dir, "short.fasta", &[("a", "MKVAL"), ("b", "MKVAL")]);

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.arg("align").arg(&input).arg("--num-seqs").arg("5");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("only 2 sequences"));
    assert!(stderr.contains("exactly 5"));
}

#[test]
fn align_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.phy");
    fs::write(&path, ">a\nMK\n").unwrap();

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.arg("align").arg(&path);
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("'phy' is not supported"));
}

#[test]
fn align_truncates_excess_and_writes_audit_copy_before_model_load() {
    // Seven records against --num-seqs 5: truncation and the audit copy
    // happen first, then the run fails on the missing model directory.
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<(String, &str)> = (0..7).map(|i| (format!("seq{i}"), "MKVAL")).collect();
    let records_ref: Vec<(&str, &str)> = records.iter().map(|(a, b)| (a.as_str(), *b)).collect();
    let input = write_fasta(&dir, "many.fasta", &records_ref);

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.current_dir(dir.path())
        .arg("align")
        .arg(&input)
        .arg("--num-seqs")
        .arg("5")
        .arg("--cpu");
    cmd.assert().failure();

    let audit = dir.path().join("many.fasta.5seq.temp.fasta");
    let text = fs::read_to_string(&audit).unwrap();
    assert_eq!(text.matches('>').count(), 5);
    assert!(text.contains(">seq0"));
    assert!(text.contains(">seq4"));
    assert!(!text.contains(">seq5"));
}

#[test]
fn refine_reports_missing_executable() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fasta(&dir, "in.fasta", &[("a", "MKVAL")]);
    let output = dir.path().join("out.fasta");

    let mut cmd = Command::cargo_bin("tralign").unwrap();
    cmd.arg("refine")
        .arg(&input)
        .arg(&output)
        .arg("--aligner")
        .arg("definitely-not-an-aligner");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("was not found"));
}

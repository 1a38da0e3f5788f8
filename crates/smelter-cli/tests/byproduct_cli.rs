use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let pid = std::process::id();
    let p = std::env::temp_dir().join(format!("smelter_{name}_{pid}_{nanos}"));
    fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn run_ok(cmd: &mut Command) {
    let out = cmd.output().expect("spawn command");
    assert!(
        out.status.success(),
        "command failed: status={:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
}

fn run_fail(cmd: &mut Command) -> std::process::Output {
    let out = cmd.output().expect("spawn command");
    assert!(
        !out.status.success(),
        "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

const STEAM: &str = r#"{"name": "Steam", "input": [{"item": "Water", "amount": 60}], "output": [{"item": "Steam"}]}"#;

#[test]
fn patch_stamps_and_preserves_other_fields() {
    let dir = tmp_dir("patch_basic");
    fs::write(dir.join("steam.json"), STEAM).expect("write fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut cmd);

    let text = fs::read_to_string(dir.join("steam.json")).expect("read back");
    assert_eq!(
        text,
        r#"{"name":"Steam","input":[{"item":"Water","amount":60,"byproduct":false}],"output":[{"item":"Steam","byproduct":false}]}"#
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn patch_twice_is_stable() {
    let dir = tmp_dir("patch_twice");
    fs::write(dir.join("steam.json"), STEAM).expect("write fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut cmd);
    let once = fs::read(dir.join("steam.json")).expect("read back");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut cmd);
    let twice = fs::read(dir.join("steam.json")).expect("read back");

    assert_eq!(once, twice);

    let _ = fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn patch_keeps_the_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tmp_dir("patch_mode");
    let path = dir.join("steam.json");
    fs::write(&path, STEAM).expect("write fixture");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut cmd);

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.contains(r#""byproduct":false"#));
    let mode = fs::metadata(&path).expect("stat").permissions().mode() & 0o777;
    assert_eq!(mode, 0o644, "in-place rewrite must keep the original mode");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tmp_dir("patch_dry");
    fs::write(dir.join("steam.json"), STEAM).expect("write fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dry-run", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut cmd);

    let text = fs::read_to_string(dir.join("steam.json")).expect("read back");
    assert_eq!(text, STEAM, "dry run must leave the file byte-identical");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_file_aborts_the_batch_in_name_order() {
    let dir = tmp_dir("patch_abort");
    fs::write(dir.join("a.json"), STEAM).expect("write a");
    fs::write(dir.join("b.json"), "{ not json").expect("write b");
    fs::write(dir.join("c.json"), STEAM).expect("write c");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_fail(&mut cmd);

    // Files before the malformed one are rewritten, files after it untouched.
    let a = fs::read_to_string(dir.join("a.json")).expect("read a");
    assert!(a.contains("byproduct"));
    let c = fs::read_to_string(dir.join("c.json")).expect("read c");
    assert!(!c.contains("byproduct"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_ingredient_list_aborts_with_the_key_name() {
    let dir = tmp_dir("patch_missing");
    fs::write(dir.join("bad.json"), r#"{"output": []}"#).expect("write fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    cmd.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    let out = run_fail(&mut cmd);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing `input` list"), "stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn byprod_binary_uses_the_default_dir() {
    let root = tmp_dir("byprod_default");
    let rdir = root.join("data/Satisfactory/recipes");
    fs::create_dir_all(&rdir).expect("create recipe dir");
    fs::write(rdir.join("steam.json"), STEAM).expect("write fixture");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_byprod"));
    cmd.current_dir(&root);
    run_ok(&mut cmd);

    let text = fs::read_to_string(rdir.join("steam.json")).expect("read back");
    assert!(text.contains(r#""byproduct":false"#));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn check_fails_until_patched() {
    let dir = tmp_dir("check_cycle");
    fs::write(dir.join("steam.json"), STEAM).expect("write fixture");

    let mut check = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    check.args(["recipes", "check", "--dir", dir.to_str().unwrap()]);
    run_fail(&mut check);

    let mut patch = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    patch.args(["recipes", "patch", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut patch);

    let mut check = Command::new(env!("CARGO_BIN_EXE_smelter-cli"));
    check.args(["recipes", "check", "--dir", dir.to_str().unwrap()]);
    run_ok(&mut check);

    let _ = fs::remove_dir_all(&dir);
}

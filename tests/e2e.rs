use std::{ffi::OsStr, fs, process::Command};

fn run_translator<I, S>(args: I) -> (String, String, bool)
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(env!("CARGO_BIN_EXE_vmil-translator"))
        .args(args)
        .output()
        .expect("failed to execute vmil-translator");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_translates_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("SimpleAdd.vm");
    fs::write(&input, "// adds\npush constant 7\npush constant 8\nadd\n").unwrap();

    let (stdout, stderr, success) = run_translator([&input]);
    assert!(success, "translation should succeed, stderr:\n{}", stderr);
    assert!(stdout.contains("SimpleAdd.asm"));

    let asm = fs::read_to_string(dir.path().join("SimpleAdd.asm")).unwrap();
    let lines: Vec<&str> = asm.lines().collect();
    assert_eq!(lines[0], "// push constant 7");
    assert_eq!(lines[1], "@7");
    assert!(lines.contains(&"// add"));
    assert!(lines.contains(&"M=D+M"));
    assert!(asm.ends_with('\n'));
}

#[test]
fn test_translates_directory_with_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("Statics");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("Sys.vm"), "function Sys.init 0\npush static 0\nreturn\n").unwrap();
    fs::write(project.join("Class1.vm"), "function Class1.get 0\npush static 0\nreturn\n").unwrap();
    fs::write(project.join("notes.txt"), "not vm code").unwrap();

    let (_, stderr, success) = run_translator([project.as_os_str(), OsStr::new("--bootstrap")]);
    assert!(success, "translation should succeed, stderr:\n{}", stderr);

    let asm = fs::read_to_string(project.join("Statics.asm")).unwrap();
    let lines: Vec<&str> = asm.lines().collect();
    assert_eq!(&lines[..5], &["// bootstrap", "@256", "D=A", "@SP", "M=D"]);
    assert!(lines.contains(&"@Sys.0"));
    assert!(lines.contains(&"@Class1.0"));

    let class1 = lines.iter().position(|l| *l == "(Class1.get)").unwrap();
    let sys = lines.iter().position(|l| *l == "(Sys.init)").unwrap();
    assert!(class1 < sys);
}

#[test]
fn test_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Prog.vm");
    let output = dir.path().join("custom.asm");
    fs::write(&input, "push constant 1\n").unwrap();

    let (_, stderr, success) = run_translator([input.as_os_str(), OsStr::new("-o"), output.as_os_str()]);
    assert!(success, "translation should succeed, stderr:\n{}", stderr);
    assert!(output.exists());
    assert!(!dir.path().join("Prog.asm").exists());
}

#[test]
fn test_reports_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Bad.vm");
    fs::write(&input, "push constant 1\n\npush heap 2\n").unwrap();

    let (_, stderr, success) = run_translator([&input]);
    assert!(!success, "translation should fail");
    assert!(stderr.contains("Bad:3"), "stderr was: {}", stderr);
    assert!(stderr.contains("unsupported segment 'heap'"), "stderr was: {}", stderr);
    assert!(stderr.contains("push heap 2"), "stderr was: {}", stderr);
    assert!(!dir.path().join("Bad.asm").exists());
}

#[test]
fn test_reports_missing_operand() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Short.vm");
    fs::write(&input, "call Foo\n").unwrap();

    let (_, stderr, success) = run_translator([&input]);
    assert!(!success, "translation should fail");
    assert!(
        stderr.contains("`call` is missing its argument count operand"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, success) = run_translator([dir.path()]);
    assert!(!success, "translation should fail");
    assert!(stderr.contains("no .vm files found"), "stderr was: {}", stderr);
}

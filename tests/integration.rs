// Integration testing can be done either by calling library functions directly or by invoking your CLI as a subprocess.
use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::Path};

const MANIFEST: &str = r#"
engine_root = "Engine"
output_dir = "Intermediate/ProjectFiles"
host_platform = "Linux"
project_file = "MyGame/MyGame.uproject"
configurations = ["Debug", "Development"]

[[target]]
name = "MyGameEditor"
type = "editor"
files = [
    "MyGame/Source/MyGameEditor/Foo.h",
    "MyGame/Source/MyGameEditor/Sub/Bar.cpp",
    "MyGame/Source/MyGameEditor/Foo.h",
]

[[target]]
name = "MyGame"
type = "game"
files = ["MyGame/Source/MyGame/MyGame.h", "MyGame/Source/MyGame/README.md"]
"#;

fn workspace(manifest: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("codelite.toml"), manifest).unwrap();
    dir
}

fn codelite_gen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codelite-gen").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1");
    cmd
}

fn read_project(dir: &Path, name: &str) -> String {
    fs::read_to_string(
        dir.join("Intermediate/ProjectFiles")
            .join(format!("{name}.project")),
    )
    .unwrap()
}

fn child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    tag: &str,
    name: &str,
) -> roxmltree::Node<'a, 'input> {
    node.children()
        .find(|n| n.has_tag_name(tag) && n.attribute("Name") == Some(name))
        .unwrap_or_else(|| panic!("missing <{tag} Name=\"{name}\">"))
}

fn file_names(node: roxmltree::Node) -> Vec<String> {
    node.children()
        .filter(|n| n.has_tag_name("File"))
        .filter_map(|n| n.attribute("Name"))
        .map(str::to_string)
        .collect()
}

#[test]
fn generate_editor_target_tree() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .arg("generate")
        .arg("codelite.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"));

    let xml = read_project(dir.path(), "MyGameEditor");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let project = doc.root_element();
    assert_eq!(project.attribute("Name"), Some("MyGameEditor"));

    let editor = child(child(project, "VirtualDirectory", "Source"), "VirtualDirectory", "MyGameEditor");
    let sub = child(editor, "VirtualDirectory", "Sub");

    let foo = dir.path().join("MyGame/Source/MyGameEditor/Foo.h");
    let bar = dir.path().join("MyGame/Source/MyGameEditor/Sub/Bar.cpp");
    assert_eq!(file_names(editor), vec![foo.display().to_string()]);
    assert_eq!(file_names(sub), vec![bar.display().to_string()]);

    let configurations: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("Configuration"))
        .filter_map(|n| n.attribute("Name"))
        .collect();
    assert_eq!(configurations, vec!["Debug", "Development"]);
}

#[test]
fn generate_game_target_commands() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .args(["generate", "codelite.toml", "--configuration", "Debug"])
        .assert()
        .success();

    let xml = read_project(dir.path(), "MyGame");
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let configuration = doc
        .descendants()
        .find(|n| n.has_tag_name("Configuration"))
        .unwrap();
    assert_eq!(configuration.attribute("Name"), Some("Debug"));
    assert_eq!(
        doc.descendants()
            .filter(|n| n.has_tag_name("Configuration"))
            .count(),
        1
    );

    let general = configuration
        .children()
        .find(|n| n.has_tag_name("General"))
        .unwrap();
    assert_eq!(general.attribute("Command"), Some("./MyGame-Linux-Debug"));
    assert_eq!(general.attribute("CommandArguments"), Some("-debug"));
    assert_eq!(
        general.attribute("WorkingDirectory"),
        Some(
            dir.path()
                .join("MyGame/Binaries/Linux")
                .display()
                .to_string()
                .as_str()
        )
    );

    let custom_build = configuration
        .children()
        .find(|n| n.has_tag_name("CustomBuild"))
        .unwrap();
    let text_of = |tag: &str| {
        custom_build
            .children()
            .find(|n| n.has_tag_name(tag))
            .and_then(|n| n.text())
            .unwrap()
            .to_string()
    };

    let build = text_of("BuildCommand");
    let clean = text_of("CleanCommand");
    assert!(build.starts_with("mono UnrealBuildTool.exe MyGame Linux Debug -project="));
    assert_eq!(clean, format!("{build} -clean"));
    assert_eq!(text_of("RebuildCommand"), format!("{clean}\n{build}"));

    let cook_targets: Vec<&str> = custom_build
        .children()
        .filter(|n| n.has_tag_name("Target"))
        .filter_map(|n| n.attribute("Name"))
        .collect();
    assert_eq!(
        cook_targets,
        vec!["Cook Game", "Cook Game on the fly", "Skip Cook Game"]
    );

    // README.md is not an allowed extension
    assert!(!xml.contains("README.md"));
}

#[test]
fn unknown_platform_fails_without_writing() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .args(["generate", "codelite.toml", "--platform", "Dreamcast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported host platform"));

    assert!(!dir.path().join("Intermediate").exists());
}

#[test]
fn unresolvable_file_fails_without_writing() {
    let manifest = MANIFEST.replace(
        "\"MyGame/Source/MyGame/MyGame.h\"",
        "\"Elsewhere/Stray.h\"",
    );
    let dir = workspace(&manifest);

    codelite_gen(dir.path())
        .args(["generate", "codelite.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Stray.h"));

    assert!(!dir.path().join("Intermediate").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .args(["generate", "codelite.toml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preview"))
        .stdout(predicate::str::contains("MyGameEditor.project"))
        .stdout(predicate::str::contains("Bar.cpp"));

    assert!(!dir.path().join("Intermediate").exists());
}

#[test]
fn output_dir_override() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .args(["generate", "codelite.toml", "--output-dir", "ide"])
        .assert()
        .success();

    assert!(dir.path().join("ide/MyGameEditor.project").is_file());
    assert!(dir.path().join("ide/MyGame.project").is_file());
}

#[test]
fn list_targets() {
    let dir = workspace(MANIFEST);

    codelite_gen(dir.path())
        .args(["targets", "codelite.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MyGameEditor (Editor): 2 files"))
        .stdout(predicate::str::contains("MyGame (Game): 1 files"));
}

#[test]
fn missing_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();

    codelite_gen(dir.path())
        .args(["targets", "codelite.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("codelite.toml"));
}

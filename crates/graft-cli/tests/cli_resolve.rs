use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

#[allow(deprecated)]
fn graft() -> Command {
    Command::cargo_bin("graft").unwrap()
}

fn write_local_pom(repo_root: &Path, group_id: &str, artifact_id: &str, version: &str, body: &str) {
    let group_path = group_id.replace('.', "/");
    let dir = repo_root.join(group_path).join(artifact_id).join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{artifact_id}-{version}.pom")), body).unwrap();
}

#[test]
fn resolve_single_leaf_offline_prints_both_packages_as_json() {
    let project = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();

    fs::write(
        project.path().join("pom.xml"),
        r#"<project>
            <groupId>org.example</groupId>
            <artifactId>root</artifactId>
            <version>1.0</version>
            <dependencies>
                <dependency>
                    <groupId>g</groupId>
                    <artifactId>a</artifactId>
                    <version>1.0</version>
                </dependency>
            </dependencies>
        </project>"#,
    )
    .unwrap();

    write_local_pom(
        repo.path(),
        "g",
        "a",
        "1.0",
        "<project><groupId>g</groupId><artifactId>a</artifactId><version>1.0</version></project>",
    );

    graft()
        .args(["resolve", "--offline", "--format", "json", "--local-repository"])
        .arg(repo.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"g:a:1.0\""))
        .stdout(predicate::str::contains("\"org.example:root:1.0\""));
}

#[test]
fn resolve_offline_missing_dependency_keeps_declared_version_unresolved() {
    let project = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();

    fs::write(
        project.path().join("pom.xml"),
        r#"<project>
            <groupId>org.example</groupId>
            <artifactId>root</artifactId>
            <version>1.0</version>
            <dependencies>
                <dependency>
                    <groupId>g</groupId>
                    <artifactId>missing</artifactId>
                    <version>9.0</version>
                </dependency>
            </dependencies>
        </project>"#,
    )
    .unwrap();

    graft()
        .args(["resolve", "--offline", "--format", "json", "--local-repository"])
        .arg(repo.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"g:missing:9.0\""));
}

#[test]
fn resolve_tree_format_renders_indented_dependency_tree() {
    let project = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();

    fs::write(
        project.path().join("pom.xml"),
        r#"<project>
            <groupId>org.example</groupId>
            <artifactId>root</artifactId>
            <version>1.0</version>
            <dependencies>
                <dependency>
                    <groupId>g</groupId>
                    <artifactId>a</artifactId>
                    <version>1.0</version>
                </dependency>
            </dependencies>
        </project>"#,
    )
    .unwrap();

    write_local_pom(
        repo.path(),
        "g",
        "a",
        "1.0",
        "<project><groupId>g</groupId><artifactId>a</artifactId><version>1.0</version></project>",
    );

    graft()
        .args(["resolve", "--offline", "--local-repository"])
        .arg(repo.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:root:1.0"))
        .stdout(predicate::str::contains("g:a:1.0"));
}

#[test]
fn resolve_reports_error_when_descriptor_is_missing() {
    let project = tempfile::tempdir().unwrap();
    graft()
        .args(["resolve", "--offline"])
        .arg(project.path())
        .assert()
        .failure();
}

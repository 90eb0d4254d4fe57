use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory of a checked-in sample project.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/projects")
        .join(name)
}

/// Copies a sample project into a scratch directory so generation can write next to it.
#[allow(dead_code)]
pub fn copy_fixture(name: &str) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    copy_dir(&fixture_path(name), temp.path());
    temp
}

fn copy_dir(from: &Path, to: &Path) {
    for entry in fs::read_dir(from).expect("Failed to read fixture dir") {
        let entry = entry.expect("Failed to read fixture entry");
        let target = to.join(entry.file_name());
        if entry.file_type().expect("Failed to stat fixture entry").is_dir() {
            fs::create_dir_all(&target).expect("Failed to create fixture subdir");
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).expect("Failed to copy fixture file");
        }
    }
}

#[allow(dead_code)]
pub fn stackup_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_stackup"))
}

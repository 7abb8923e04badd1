use linthook_common_fs::{find_project_root, find_project_root_with, PROJECT_MARKERS};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_marker_order_does_not_matter_within_one_dir() {
    let dir = tempdir().unwrap();
    for marker in PROJECT_MARKERS {
        fs::write(dir.path().join(marker), "").unwrap();
    }
    let file = dir.path().join("lib").join("x.py");
    fs::create_dir_all(file.parent().unwrap()).unwrap();

    assert_eq!(find_project_root_with(&file, PROJECT_MARKERS, None), dir.path());
}

#[test]
fn test_default_markers_find_go_module() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module example.com/x\n").unwrap();
    let pkg = dir.path().join("pkg").join("util");
    fs::create_dir_all(&pkg).unwrap();

    assert_eq!(find_project_root(pkg.join("util.go")), dir.path());
}

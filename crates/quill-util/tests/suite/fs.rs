use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use quill_util::{list_files, path_to_module_name, with_current_dir, Tempdir, UtilError};

static CWD_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn lists_nested_files_relative_to_base() {
    let dir = Tempdir::new().unwrap();
    dir.create_file("builtins.pyi", "").unwrap();
    dir.create_file("stdlib/os/__init__.pyi", "").unwrap();
    dir.create_file("stdlib/os/path.pyi", "").unwrap();
    dir.create_directory("empty").unwrap();

    let files = list_files(dir.path()).unwrap();
    assert_eq!(
        files,
        vec![
            PathBuf::from("builtins.pyi"),
            PathBuf::from("stdlib").join("os").join("__init__.pyi"),
            PathBuf::from("stdlib").join("os").join("path.pyi"),
        ]
    );

    let modules: Vec<String> = files.iter().map(path_to_module_name).collect();
    assert_eq!(modules, ["builtins", "stdlib.os", "stdlib.os.path"]);
}

#[test]
fn missing_directory_is_reported() {
    let dir = Tempdir::new().unwrap();
    let missing = dir.join("nope");
    match list_files(&missing) {
        Err(UtilError::NoSuchDirectory { path }) => assert_eq!(path, missing),
        other => panic!("expected NoSuchDirectory, got {other:?}"),
    }
}

#[test]
fn working_directory_is_restored_after_body() {
    let _lock = CWD_LOCK.lock().expect("CWD_LOCK mutex poisoned");
    let dir = Tempdir::new().unwrap();
    let before = std::env::current_dir().unwrap();

    let inside = with_current_dir(dir.path(), || std::env::current_dir().unwrap()).unwrap();
    assert_eq!(
        inside.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn working_directory_is_restored_after_panic() {
    let _lock = CWD_LOCK.lock().expect("CWD_LOCK mutex poisoned");
    let dir = Tempdir::new().unwrap();
    let before = std::env::current_dir().unwrap();

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        with_current_dir(dir.path(), || panic!("boom")).unwrap();
    }));
    assert!(result.is_err());
    assert_eq!(std::env::current_dir().unwrap(), before);
}

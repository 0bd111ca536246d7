use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xcookie::cli::{run, GenerateArgs, SkipConfirm, SyncReport};
use xcookie::constants::META_FILENAME;

fn relative_files(dir: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `dir1` - The first directory to compare (actual output).
/// * `dir2` - The second directory to compare (expected output).
pub fn print_dir_diff(dir1: &Path, dir2: &Path) {
    let files1 = relative_files(dir1);
    let files2 = relative_files(dir2);

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {:?}", dir1);
    println!("Expected output: {:?}", dir2);

    for file in files1.difference(&files2) {
        println!("  + {:?}", file);
    }
    for file in files2.difference(&files1) {
        println!("  - {:?}", file);
    }
    for file in files1.intersection(&files2) {
        let content1 = fs::read_to_string(dir1.join(file)).unwrap_or_default();
        let content2 = fs::read_to_string(dir2.join(file)).unwrap_or_default();
        if content1 != content2 {
            println!("\n  File: {:?}", file);
            println!("  --- Actual content:\n{content1}");
            println!("  --- Expected content:\n{content2}");
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Asserts that two generated trees hold the same files, ignoring the
/// manifests whose timestamps always differ.
pub fn assert_same_tree(actual: &Path, expected: &Path) {
    for dir in [actual, expected] {
        let manifest = dir.join(META_FILENAME);
        if manifest.exists() {
            fs::remove_file(manifest).unwrap();
        }
    }
    match dir_diff::is_different(actual, expected) {
        Ok(true) => {
            print_dir_diff(actual, expected);
            panic!("Directories differ. See above for details.");
        }
        Ok(false) => {}
        Err(e) => {
            debug!("Error comparing directories: {e:?}");
            panic!("Failed to compare directories");
        }
    }
}

/// Non-interactive generate arguments for the `kwdemo` project in `repo`.
pub fn generate_args(repo: &Path) -> GenerateArgs {
    GenerateArgs {
        repo_dpath: repo.to_path_buf(),
        tags: None,
        mod_name: None,
        repo_name: Some("kwdemo".to_string()),
        min_python: None,
        max_python: None,
        remote_host: None,
        remote_group: None,
        regen: Vec::new(),
        skip_confirms: Vec::new(),
        non_interactive: true,
        dry_run: false,
        diff: false,
        init_git: false,
    }
}

pub fn run_generate(args: GenerateArgs) -> SyncReport {
    run(args).unwrap()
}

pub fn skip_all() -> Vec<SkipConfirm> {
    vec![SkipConfirm::All]
}

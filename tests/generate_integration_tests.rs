use std::fs;
use test_log::test;
use xcookie::constants::META_FILENAME;
use xcookie::metadata::Manifest;

mod utils;
use utils::{assert_same_tree, generate_args, run_generate, skip_all};

#[test]
fn generates_every_applicable_file_into_an_empty_repo() {
    let repo = tempfile::tempdir().unwrap();
    let report = run_generate(generate_args(repo.path()));

    assert!(report.updated.is_empty() && report.skipped.is_empty());
    for key in [
        "pyproject.toml",
        "setup.py",
        "requirements.txt",
        "requirements/tests.txt",
        ".github/workflows/tests.yml",
        "kwdemo/__init__.py",
        "tests/test_import.py",
        "run_tests.py",
        "README.rst",
    ] {
        assert!(report.created.iter().any(|k| k == key), "{key} was not created");
        assert!(repo.path().join(key).is_file(), "{key} is missing");
    }
    assert!(!repo.path().join(".gitlab-ci.yml").exists());
    assert!(!repo.path().join("CMakeLists.txt").exists());

    let manifest = Manifest::load(repo.path()).unwrap().expect("manifest should be written");
    assert_eq!(manifest.files.len(), report.created.len());
    assert!(manifest.tags.contains(&"purepy".to_string()));
    assert!(manifest.tags.contains(&"github".to_string()));
    assert_eq!(manifest.remote.as_deref(), Some("https://github.com/kwdemo/kwdemo"));
}

#[test]
fn second_run_reports_everything_unchanged() {
    let repo = tempfile::tempdir().unwrap();
    let first = run_generate(generate_args(repo.path()));

    let mut args = generate_args(repo.path());
    args.repo_name = None;
    let second = run_generate(args);

    assert!(second.created.is_empty(), "{:?}", second.created);
    assert!(second.updated.is_empty(), "{:?}", second.updated);
    assert!(second.declined.is_empty(), "{:?}", second.declined);
    assert_eq!(second.unchanged.len(), first.created.len());
}

#[test]
fn user_edits_are_not_overwritten_without_confirmation() {
    let repo = tempfile::tempdir().unwrap();
    run_generate(generate_args(repo.path()));
    let before = Manifest::load(repo.path()).unwrap().unwrap();

    let setup_py = repo.path().join("setup.py");
    fs::write(&setup_py, "# my own setup\n").unwrap();
    let report = run_generate(generate_args(repo.path()));

    assert_eq!(report.declined, vec!["setup.py"]);
    assert_eq!(fs::read_to_string(&setup_py).unwrap(), "# my own setup\n");
    let after = Manifest::load(repo.path()).unwrap().unwrap();
    assert_eq!(after.files.get("setup.py"), before.files.get("setup.py"));

    let mut args = generate_args(repo.path());
    args.skip_confirms = skip_all();
    let report = run_generate(args);
    assert_eq!(report.updated, vec!["setup.py"]);
    assert_ne!(fs::read_to_string(&setup_py).unwrap(), "# my own setup\n");
}

#[test]
fn pristine_files_follow_configuration_changes() {
    let repo = tempfile::tempdir().unwrap();
    run_generate(generate_args(repo.path()));

    let mut args = generate_args(repo.path());
    args.min_python = Some("3.9".to_string());
    let report = run_generate(args);

    assert!(report.updated.iter().any(|k| k == "pyproject.toml"), "{:?}", report.updated);
    assert!(report.declined.is_empty(), "{:?}", report.declined);
    let pyproject = fs::read_to_string(repo.path().join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("min_python = \"3.9\""));
}

#[test]
fn keep_existing_files_are_only_regenerated_on_request() {
    let repo = tempfile::tempdir().unwrap();
    run_generate(generate_args(repo.path()));

    let readme = repo.path().join("README.rst");
    fs::write(&readme, "My own readme\n").unwrap();

    let report = run_generate(generate_args(repo.path()));
    assert_eq!(report.skipped, vec!["README.rst"]);
    assert_eq!(fs::read_to_string(&readme).unwrap(), "My own readme\n");

    let mut args = generate_args(repo.path());
    args.regen = vec!["README.rst".to_string()];
    args.skip_confirms = skip_all();
    let report = run_generate(args);
    assert_eq!(report.updated, vec!["README.rst"]);
    assert!(report.unchanged.is_empty());
    assert!(fs::read_to_string(&readme).unwrap().contains("kwdemo"));
}

#[test]
fn dry_run_touches_nothing() {
    let repo = tempfile::tempdir().unwrap();
    let mut args = generate_args(repo.path());
    args.dry_run = true;
    args.init_git = true;

    let report = run_generate(args);
    assert!(!report.created.is_empty());
    assert_eq!(fs::read_dir(repo.path()).unwrap().count(), 0);
}

#[test]
fn generation_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    run_generate(generate_args(first.path()));
    run_generate(generate_args(second.path()));

    assert!(first.path().join(META_FILENAME).is_file());
    assert_same_tree(first.path(), second.path());
}

#[test]
fn tags_select_templates_and_lines() {
    let repo = tempfile::tempdir().unwrap();
    let mut args = generate_args(repo.path());
    args.tags = Some(vec!["gitlab".into(), "binpy".into(), "cv2".into()]);
    args.remote_host = Some("https://gitlab.kitware.com".into());
    run_generate(args);

    assert!(repo.path().join(".gitlab-ci.yml").is_file());
    assert!(repo.path().join("CMakeLists.txt").is_file());
    assert!(repo.path().join("requirements/headless.txt").is_file());
    assert!(!repo.path().join(".github").exists());

    let requirements = fs::read_to_string(repo.path().join("requirements.txt")).unwrap();
    assert!(requirements.contains("\n-r requirements/headless.txt"));
}

#[test]
fn remote_fills_in_the_project_identity() {
    let repo = tempfile::tempdir().unwrap();
    let git = git2::Repository::init(repo.path()).unwrap();
    git.remote("origin", "git@gitlab.kitware.com:computer-vision/kwdemo.git").unwrap();

    let mut args = generate_args(repo.path());
    args.repo_name = None;
    run_generate(args);

    assert!(repo.path().join("kwdemo/__init__.py").is_file());
    assert!(repo.path().join(".gitlab-ci.yml").is_file());
    let manifest = Manifest::load(repo.path()).unwrap().unwrap();
    assert_eq!(
        manifest.remote.as_deref(),
        Some("https://gitlab.kitware.com/computer-vision/kwdemo")
    );
}

#[test]
fn init_git_adds_the_origin_remote() {
    let repo = tempfile::tempdir().unwrap();
    let mut args = generate_args(repo.path());
    args.init_git = true;
    run_generate(args);

    let git = git2::Repository::open(repo.path()).unwrap();
    let origin = git.find_remote("origin").unwrap();
    assert_eq!(origin.url(), Some("https://github.com/kwdemo/kwdemo"));
}

#[test]
fn invalid_tag_combinations_are_rejected() {
    let repo = tempfile::tempdir().unwrap();
    let mut args = generate_args(repo.path());
    args.tags = Some(vec!["purepy".into(), "binpy".into()]);

    let err = xcookie::cli::run(args).unwrap_err();
    assert!(matches!(err, xcookie::error::Error::ConfigValidation(_)));
    assert_eq!(fs::read_dir(repo.path()).unwrap().count(), 0);
}

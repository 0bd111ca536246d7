use indexmap::IndexSet;

/// One artifact xcookie can generate.
#[derive(Debug)]
pub struct TemplateSpec {
    /// Output path relative to the repository, itself a template.
    pub path: &'static str,
    /// Embedded minijinja source.
    pub source: &'static str,
    /// Every one of these tags must be active.
    pub tags: &'static [&'static str],
    /// None of these tags may be active.
    pub skip_tags: &'static [&'static str],
    /// Whether an existing file is regenerated by default.
    pub overwrite: bool,
    pub executable: bool,
}

impl TemplateSpec {
    const fn new(path: &'static str, source: &'static str) -> Self {
        Self { path, source, tags: &[], skip_tags: &[], overwrite: true, executable: false }
    }

    const fn when(mut self, tags: &'static [&'static str]) -> Self {
        self.tags = tags;
        self
    }

    const fn keep_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }

    const fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    pub fn is_applicable(&self, active: &IndexSet<String>) -> bool {
        self.tags.iter().all(|tag| active.contains(*tag))
            && !self.skip_tags.iter().any(|tag| active.contains(*tag))
    }
}

macro_rules! template {
    ($path:literal, $source:literal) => {
        TemplateSpec::new($path, include_str!(concat!("../../templates/", $source)))
    };
}

pub static REGISTRY: &[TemplateSpec] = &[
    template!("pyproject.toml", "pyproject.toml.j2"),
    template!("setup.py", "setup.py.j2"),
    template!("requirements.txt", "requirements.txt.j2"),
    template!("requirements/runtime.txt", "requirements/runtime.txt.j2").keep_existing(),
    template!("requirements/tests.txt", "requirements/tests.txt.j2").keep_existing(),
    template!("requirements/optional.txt", "requirements/optional.txt.j2").keep_existing(),
    template!("requirements/docs.txt", "requirements/docs.txt.j2").keep_existing(),
    template!("requirements/headless.txt", "requirements/headless.txt.j2")
        .when(&["cv2"])
        .keep_existing(),
    template!("requirements/graphics.txt", "requirements/graphics.txt.j2")
        .when(&["cv2"])
        .keep_existing(),
    template!("requirements/gdal.txt", "requirements/gdal.txt.j2")
        .when(&["gdal"])
        .keep_existing(),
    template!(".github/workflows/tests.yml", "github/tests.yml.j2").when(&["github"]),
    template!(".gitlab-ci.yml", "gitlab-ci.yml.j2").when(&["gitlab"]),
    template!("docs/source/conf.py", "docs/conf.py.j2").keep_existing(),
    template!("docs/source/index.rst", "docs/index.rst.j2").keep_existing(),
    template!(".readthedocs.yml", "readthedocs.yml.j2"),
    template!("CMakeLists.txt", "CMakeLists.txt.j2").when(&["binpy"]).keep_existing(),
    template!("{{ mod_dpath }}/__init__.py", "module/__init__.py.j2").keep_existing(),
    template!("tests/test_import.py", "tests/test_import.py.j2").keep_existing(),
    template!("run_tests.py", "run_tests.py.j2").executable(),
    template!(".gitignore", "gitignore.j2").keep_existing(),
    template!("CHANGELOG.md", "CHANGELOG.md.j2").keep_existing(),
    template!("README.rst", "README.rst.j2").keep_existing(),
];

use crate::{
    cli::{
        processor::{FileProcessor, SyncReport},
        DirectivesArgs, GenerateArgs, RemoteArgs, RewriteArgs, UrlShape,
    },
    config::{ProjectConfig, XCookieConfig},
    directive::{Command, DirectiveExtractor, Rewriter},
    error::Result,
    metadata::Manifest,
    remote::{detect_remote, init_repo, GitUrl},
    renderer::MiniJinjaRenderer,
    template::{processor::SyncProcessor, registry::REGISTRY, stage::stage},
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;

/// Runs the generate workflow: resolve the configuration, stage every
/// applicable template and sync the staged files into the repository
pub struct Runner {
    args: GenerateArgs,
}

impl Runner {
    pub fn new(args: GenerateArgs) -> Self {
        Self { args }
    }

    /// Executes the complete generation workflow
    pub fn run(self) -> Result<SyncReport> {
        let repo_dpath = self.args.repo_dpath.as_path();
        let project = self.resolve_project()?;

        if self.args.init_git && !self.args.dry_run {
            init_repo(repo_dpath, Some(&project.remote_url()?))?;
        }

        let engine = MiniJinjaRenderer::new();
        let staging = stage(&project, REGISTRY, &engine)?;
        log::debug!("Staged {} files in '{}'", staging.keys().count(), staging.root().display());

        let manifest = Manifest::load(repo_dpath)?;
        let regen = self.regen_globs()?;
        let processor = SyncProcessor::new(&staging, repo_dpath, manifest.as_ref(), regen.as_ref());
        let file_processor = FileProcessor::new(
            processor,
            &self.args.skip_confirms,
            self.args.non_interactive,
            self.args.dry_run,
            self.args.diff,
        );
        let report = file_processor.process_all_files()?;

        if !self.args.dry_run {
            self.save_manifest(manifest, &project, &report)?;
        }

        let prefix = if self.args.dry_run { "[DRY RUN] " } else { "" };
        println!("{prefix}Synced {}: {}.", repo_dpath.display(), report.summary());
        Ok(report)
    }

    /// Merges the configuration file, the `origin` remote and the command line
    fn resolve_project(&self) -> Result<ProjectConfig> {
        let repo_dpath = self.args.repo_dpath.as_path();
        let config = XCookieConfig::load_or_default(repo_dpath)?;
        let remote = if repo_dpath.is_dir() { detect_remote(repo_dpath)? } else { None };
        ProjectConfig::resolve(config, self.args.overrides()?, repo_dpath, remote.as_ref())
    }

    /// The `--regen` globs, or `None` when none were given
    fn regen_globs(&self) -> Result<Option<GlobSet>> {
        if self.args.regen.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.args.regen {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Some(builder.build()?))
    }

    /// Records what this run wrote. Files that were skipped or declined keep
    /// their previous entry.
    fn save_manifest(
        &self,
        previous: Option<Manifest>,
        project: &ProjectConfig,
        report: &SyncReport,
    ) -> Result<()> {
        let mut files = previous.map(|manifest| manifest.files).unwrap_or_default();
        files.extend(report.recorded.iter().map(|(key, hash)| (key.clone(), hash.clone())));

        let manifest = Manifest {
            tags: project.tags.iter().cloned().collect(),
            remote: Some(project.url.clone()),
            files,
            ..Manifest::default()
        };
        log::debug!("Writing manifest to '{}'", Manifest::path(&self.args.repo_dpath).display());
        manifest.save(&self.args.repo_dpath)
    }
}

/// Prints every directive of `args.file` with its effects, one JSON object
/// per line.
pub fn print_directives(args: &DirectivesArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)?;
    let extractor = DirectiveExtractor::new(&args.namespace, Command::ALL)?;
    let argv: Vec<String> = std::env::args().collect();
    let environ: HashMap<String, String> = std::env::vars().collect();

    for (lineno, line) in text.lines().enumerate() {
        for directive in extractor.extract(line) {
            let directive = directive?;
            let effects = directive.effects(&argv, &environ)?;
            let record = json!({
                "line": lineno + 1,
                "directive": directive.to_string(),
                "parsed": directive,
                "effects": effects,
            });
            println!("{record}");
        }
    }
    Ok(())
}

/// Applies the conditional comment directives of `args.file`.
pub fn rewrite(args: &RewriteArgs) -> Result<()> {
    let rewriter = Rewriter::new(args.tags.iter().cloned())?;
    if !args.dry_run {
        if rewriter.rewrite_file(&args.file)? {
            log::info!("Rewrote '{}'", args.file.display());
        } else {
            log::info!("Nothing to rewrite in '{}'", args.file.display());
        }
        return Ok(());
    }

    let text = std::fs::read_to_string(&args.file)?;
    let rewritten = rewriter.rewrite_text(&text)?;
    print!("{}", rewritten.as_deref().unwrap_or(&text));
    Ok(())
}

/// Prints the parts of `args.url` as JSON, or the url in another shape.
pub fn remote(args: &RemoteArgs) -> Result<()> {
    let url = GitUrl::from_str(&args.url)?;
    match args.to {
        Some(UrlShape::Https) => println!("{}", url.to_https()?),
        Some(UrlShape::Ssh) => println!("{}", url.to_ssh()?),
        Some(UrlShape::Git) => println!("{}", url.to_git()?),
        None => println!("{}", serde_json::to_string_pretty(url.info()?)?),
    }
    Ok(())
}

/// Main entry point of the generate command
pub fn run(args: GenerateArgs) -> Result<SyncReport> {
    let runner = Runner::new(args);
    runner.run()
}

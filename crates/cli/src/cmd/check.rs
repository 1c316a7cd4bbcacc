//! Validate every template under a directory.

use color_eyre::eyre::Result;
use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::interpolate::{Severity, TemplateIssue, VariableInterpolator};
use magnetvars_core::vars::VariableMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{fail, load_vars};
use crate::CheckArgs;

/// Problems found in one template.
#[derive(Debug, Default)]
struct FileReport {
    source: String,
    issues: Vec<TemplateIssue>,
    unresolved: Vec<String>,
    read_error: Option<String>,
}

impl FileReport {
    fn failed(&self) -> bool {
        self.read_error.is_some()
            || !self.unresolved.is_empty()
            || self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

pub fn run(cfg: &ResolvedConfig, args: &CheckArgs) {
    if !args.dir.is_dir() {
        fail("check", format!("not a directory: {}", args.dir.display()));
    }
    match check(cfg, args) {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(e) => fail("check", format!("{e:#}")),
    }
}

/// Check all templates and print a report. Returns the number of failed files.
fn check(cfg: &ResolvedConfig, args: &CheckArgs) -> Result<usize> {
    let vars = if args.syntax_only { VariableMap::new() } else { load_vars(cfg, &args.sources)? };
    let interpolator = VariableInterpolator::new(cfg.interpolation_options())?;

    let files = template_files(cfg, &args.dir);
    if files.is_empty() {
        println!("(no templates found)");
        return Ok(0);
    }

    let mut failed = 0;
    for path in &files {
        let report = check_file(&interpolator, path, &vars, args.syntax_only);
        let display = path.strip_prefix(&args.dir).unwrap_or(path).display();

        if report.failed() {
            failed += 1;
            println!("FAIL {display}");
        } else {
            println!("OK   {display}");
        }
        if let Some(err) = &report.read_error {
            println!("  {err}");
        }
        for issue in &report.issues {
            let (line, col) = line_col(&report.source, issue.offset);
            let level = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("  {line}:{col} {level}: {}", issue.message());
        }
        if !report.unresolved.is_empty() {
            let names: Vec<String> = report.unresolved.iter().map(|n| format!("@{n}")).collect();
            println!("  unresolved: {}", names.join(", "));
        }
    }

    println!("-- {} templates, {} failed --", files.len(), failed);
    Ok(failed)
}

fn template_files(cfg: &ResolvedConfig, dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && cfg.is_template_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

fn check_file(
    interpolator: &VariableInterpolator,
    path: &Path,
    vars: &VariableMap,
    syntax_only: bool,
) -> FileReport {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return FileReport { read_error: Some(format!("failed to read: {e}")), ..Default::default() };
        }
    };

    let issues = interpolator.validate(&content);
    let unresolved = if syntax_only {
        Vec::new()
    } else {
        interpolator.interpolate(&content, vars).unresolved_variables
    };
    tracing::debug!(
        path = %path.display(),
        issues = issues.len(),
        unresolved = unresolved.len(),
        "checked template"
    );

    FileReport { source: content, issues, unresolved, read_error: None }
}

/// 1-based line and column of a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}

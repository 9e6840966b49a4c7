//! AI documentation pipeline: classify each source file, generate a page
//! per file, then a project overview and an index linking everything.

use analysis::find_source_files;
use anyhow::{Context, Result};
use chrono::Utc;
use llm::{prompts, GenOverrides, TextGenerator};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct DocsOptions {
    pub source_root: PathBuf,
    pub out_dir: PathBuf,
    /// Directory scanned when the source root yields nothing. The CI
    /// workflow falls back to the working directory; tests disable this.
    pub fallback_root: Option<PathBuf>,
}

impl DocsOptions {
    pub fn new(source_root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            out_dir: out_dir.into(),
            fallback_root: Some(PathBuf::from(".")),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModuleInfo {
    file: String,
    #[serde(rename = "type")]
    doc_type: &'static str,
    size: usize,
}

#[derive(Debug, Default)]
pub struct DocsOutcome {
    pub documented: usize,
    pub skipped: Vec<(PathBuf, String)>,
    pub pages: Vec<PathBuf>,
}

/// Lexical doc-type classifier, first match wins. Deliberately textual,
/// not syntax-aware: a string literal containing "class " classifies the
/// file as a class. This matches the established artifact layout.
pub fn doc_type(path: &Path, content: &str) -> &'static str {
    if path.file_name().map_or(false, |n| n == "__init__.py") {
        "module"
    } else if content.contains("class ") && content.contains("def ") {
        "class"
    } else if content.contains("def ") {
        "function"
    } else {
        "module"
    }
}

pub async fn run(generator: &dyn TextGenerator, opts: &DocsOptions) -> Result<DocsOutcome> {
    let mut files = find_source_files(&opts.source_root);
    let mut scan_root = opts.source_root.clone();
    if files.is_empty() {
        if let Some(fallback) = &opts.fallback_root {
            warn!(
                "no source files under {}, scanning {}",
                opts.source_root.display(),
                fallback.display()
            );
            files = find_source_files(fallback);
            scan_root = fallback.clone();
        }
    }
    let files_found = files.len();
    info!("documenting {files_found} source files");

    let mut outcome = DocsOutcome::default();
    let mut modules = Vec::new();

    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                error!("failed to read {}: {e}", path.display());
                outcome.skipped.push((path, e.to_string()));
                continue;
            }
        };

        let kind = doc_type(&path, &content);
        info!("generating {kind} documentation for {}", path.display());

        match generator.generate_documentation(&content, kind).await {
            Ok(documentation) => {
                let page = write_page(opts, &scan_root, &path, kind, &documentation)?;
                outcome.pages.push(page);
                outcome.documented += 1;
                modules.push(ModuleInfo {
                    file: path.display().to_string(),
                    doc_type: kind,
                    size: content.len(),
                });
            }
            Err(e) => {
                error!("documentation failed for {}: {e}", path.display());
                outcome.skipped.push((path, e.to_string()));
            }
        }
    }

    if outcome.documented > 0 {
        write_overview(generator, opts, &modules).await?;
        write_index(opts, &outcome.pages)?;
    }
    write_generation_report(opts, files_found, &outcome)?;

    Ok(outcome)
}

/// One page per source file, mirroring the structure under the scanned
/// root.
fn write_page(
    opts: &DocsOptions,
    scan_root: &Path,
    source: &Path,
    kind: &str,
    documentation: &str,
) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(scan_root)
        .unwrap_or(source)
        .to_path_buf();
    let page_dir = match relative.parent() {
        Some(parent) if parent != Path::new("") => opts.out_dir.join(parent),
        _ => opts.out_dir.clone(),
    };
    fs::create_dir_all(&page_dir).with_context(|| format!("creating {}", page_dir.display()))?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let page = page_dir.join(format!("{stem}.md"));

    let file_name = source
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let mut doc = format!("# {file_name} Documentation\n\n");
    doc.push_str(&format!("**File path**: `{}`\n", source.display()));
    doc.push_str(&format!("**Doc type**: {kind}\n\n---\n\n"));
    doc.push_str(documentation);

    fs::write(&page, doc).with_context(|| format!("writing {}", page.display()))?;
    Ok(page)
}

async fn write_overview(
    generator: &dyn TextGenerator,
    opts: &DocsOptions,
    modules: &[ModuleInfo],
) -> Result<()> {
    let listing = serde_json::to_string_pretty(modules)?;
    let prompt = prompts::project_overview(&listing);

    let overview = match generator
        .generate(&prompt, &GenOverrides::max_length(1000))
        .await
    {
        Ok(text) => text,
        Err(e) => {
            error!("overview generation failed: {e}");
            format!("Overview generation failed: {e}")
        }
    };

    let path = opts.out_dir.join("OVERVIEW.md");
    fs::write(&path, format!("# Project Overview\n\n{overview}"))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Index page linking the overview and every generated page.
fn write_index(opts: &DocsOptions, pages: &[PathBuf]) -> Result<()> {
    let mut index = String::from("# Documentation Index\n\n");
    index.push_str("- [Project Overview](OVERVIEW.md)\n");
    for page in pages {
        let relative = page.strip_prefix(&opts.out_dir).unwrap_or(page);
        let name = page
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        index.push_str(&format!("- [{name}]({})\n", relative.display()));
    }

    let path = opts.out_dir.join("README.md");
    fs::write(&path, index).with_context(|| format!("writing {}", path.display()))?;
    info!("documentation index written to {}", path.display());
    Ok(())
}

/// Machine-readable run report written next to the index: what was
/// scanned, what was generated, and where.
#[derive(Debug, Serialize)]
struct GenerationReport {
    timestamp: String,
    files_processed: usize,
    docs_generated: usize,
    docs_files: Vec<String>,
}

fn write_generation_report(
    opts: &DocsOptions,
    files_found: usize,
    outcome: &DocsOutcome,
) -> Result<()> {
    let mut docs_files: Vec<String> = outcome
        .pages
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    if outcome.documented > 0 {
        docs_files.push(opts.out_dir.join("OVERVIEW.md").display().to_string());
    }

    let report = GenerationReport {
        timestamp: Utc::now().to_rfc3339(),
        files_processed: files_found,
        docs_generated: docs_files.len(),
        docs_files,
    };

    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("creating {}", opts.out_dir.display()))?;
    let path = opts.out_dir.join("docs_generation_report.json");
    fs::write(&path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_initializer_is_module() {
        assert_eq!(doc_type(Path::new("pkg/__init__.py"), "class A: pass"), "module");
    }

    #[test]
    fn test_class_requires_both_keywords() {
        assert_eq!(
            doc_type(Path::new("a.py"), "class A:\n    def m(self): pass\n"),
            "class"
        );
        assert_eq!(doc_type(Path::new("a.py"), "def f(): pass\n"), "function");
        assert_eq!(doc_type(Path::new("a.py"), "VALUE = 3\n"), "module");
    }

    #[test]
    fn test_classifier_is_lexical_not_syntactic() {
        // A string literal mentioning both keywords still classifies as
        // class; this is the documented heuristic.
        let content = "text = 'class Foo and def bar'\n";
        assert_eq!(doc_type(Path::new("a.py"), content), "class");
    }
}

//! AI code-review pipeline: discover sources, analyze structure, submit
//! each file for review, aggregate, persist the markdown/JSON artifacts.

use analysis::{analyze_source, find_changed_files, find_source_files, FileAnalysis};
use anyhow::{Context, Result};
use llm::{prompts, GenOverrides, TextGenerator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Cap on the content excerpt embedded in a review prompt.
const EXCERPT_CHARS: usize = 2000;
/// Cap on a PR-annotation comment body.
const COMMENT_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub source_root: PathBuf,
    pub out_dir: PathBuf,
    /// Emit `ai_review_comments.json` for PR annotations.
    pub ci_platform: bool,
    /// Directory scanned when the source root yields nothing. The CI
    /// workflow falls back to the working directory; tests disable this.
    pub fallback_root: Option<PathBuf>,
}

impl ReviewOptions {
    pub fn new(source_root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            out_dir: out_dir.into(),
            ci_platform: false,
            fallback_root: Some(PathBuf::from(".")),
        }
    }
}

/// One reviewed file: the structural analysis, the generated review text,
/// and the derived issue flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReview {
    pub file: String,
    pub analysis: FileAnalysis,
    pub review: String,
    pub has_issues: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewTotals {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_functions: usize,
    pub total_classes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewData {
    pub summary: String,
    pub totals: ReviewTotals,
    pub reviews: Vec<FileReview>,
}

/// PR annotation object for the CI platform, anchored at line 1.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewComment {
    pub path: String,
    pub line: u32,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct ReviewOutcome {
    pub reviewed: usize,
    pub flagged: usize,
    /// Files skipped because the inference call failed, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// A review flags issues when it contains the warning glyph, the error
/// glyph, or the word "problem". Three independent substring checks.
pub fn has_issues(review: &str) -> bool {
    review.contains("⚠️") || review.contains("❌") || review.contains("problem")
}

pub async fn run(generator: &dyn TextGenerator, opts: &ReviewOptions) -> Result<ReviewOutcome> {
    let mut files = find_changed_files(&opts.source_root);
    if files.is_empty() {
        if let Some(fallback) = &opts.fallback_root {
            warn!(
                "no source files under {}, scanning {}",
                opts.source_root.display(),
                fallback.display()
            );
            files = find_source_files(fallback);
        }
    }
    info!("reviewing {} source files", files.len());

    let mut reviews = Vec::new();
    let mut outcome = ReviewOutcome::default();

    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                error!("failed to read {}: {e}", path.display());
                outcome.skipped.push((path, e.to_string()));
                continue;
            }
        };

        let analysis = analyze_source(&path, &content);
        match review_one(generator, &path, &content, &analysis).await {
            Ok(review) => {
                if review.has_issues {
                    info!("issues found in {}", path.display());
                } else {
                    info!("review clean for {}", path.display());
                }
                reviews.push(review);
            }
            Err(e) => {
                error!("review failed for {}: {e:#}", path.display());
                outcome.skipped.push((path, e.to_string()));
            }
        }
    }

    if reviews.is_empty() {
        warn!("no reviews were completed");
        return Ok(outcome);
    }

    let totals = ReviewTotals {
        total_files: reviews.len(),
        files_with_issues: reviews.iter().filter(|r| r.has_issues).count(),
        total_functions: reviews.iter().map(|r| r.analysis.functions.len()).sum(),
        total_classes: reviews.iter().map(|r| r.analysis.classes.len()).sum(),
    };
    let summary = summarize(generator, &totals, &reviews).await;

    outcome.reviewed = totals.total_files;
    outcome.flagged = totals.files_with_issues;
    save_artifacts(opts, &reviews, &totals, &summary)?;
    Ok(outcome)
}

async fn review_one(
    generator: &dyn TextGenerator,
    path: &Path,
    content: &str,
    analysis: &FileAnalysis,
) -> Result<FileReview> {
    let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    let analysis_json = serde_json::to_string_pretty(analysis)?;
    let prompt = prompts::code_review(&path.display().to_string(), &excerpt, &analysis_json);

    let review = generator
        .generate(&prompt, &GenOverrides::max_length(1500))
        .await?;

    Ok(FileReview {
        file: path.display().to_string(),
        analysis: analysis.clone(),
        has_issues: has_issues(&review),
        review,
    })
}

/// Resubmit only the flagged subset for the project-level narrative.
async fn summarize(
    generator: &dyn TextGenerator,
    totals: &ReviewTotals,
    reviews: &[FileReview],
) -> String {
    let flagged: Vec<&FileReview> = reviews.iter().filter(|r| r.has_issues).collect();
    let flagged_json = serde_json::to_string_pretty(&flagged).unwrap_or_default();
    let prompt = prompts::review_summary(
        totals.total_files,
        totals.files_with_issues,
        totals.total_functions,
        totals.total_classes,
        &flagged_json,
    );

    match generator
        .generate(&prompt, &GenOverrides::max_length(1000))
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            error!("summary generation failed: {e}");
            format!("Summary generation failed: {e}")
        }
    }
}

fn save_artifacts(
    opts: &ReviewOptions,
    reviews: &[FileReview],
    totals: &ReviewTotals,
    summary: &str,
) -> Result<()> {
    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("creating {}", opts.out_dir.display()))?;

    for review in reviews {
        let stem = Path::new(&review.file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        let path = opts.out_dir.join(format!("{stem}_review.md"));
        let mut doc = format!("# Code Review Report: {}\n\n", review.file);
        doc.push_str(&format!(
            "**File size**: {} lines\n\n---\n\n",
            review.analysis.line_count
        ));
        doc.push_str(&review.review);
        fs::write(&path, doc).with_context(|| format!("writing {}", path.display()))?;
    }

    let summary_path = opts.out_dir.join("SUMMARY.md");
    fs::write(
        &summary_path,
        format!("# Code Review Project Summary\n\n{summary}"),
    )
    .with_context(|| format!("writing {}", summary_path.display()))?;

    let data = ReviewData {
        summary: summary.to_string(),
        totals: totals.clone(),
        reviews: reviews.to_vec(),
    };
    let data_path = opts.out_dir.join("review_data.json");
    fs::write(&data_path, serde_json::to_string_pretty(&data)?)
        .with_context(|| format!("writing {}", data_path.display()))?;

    if opts.ci_platform {
        let comments: Vec<ReviewComment> = reviews
            .iter()
            .filter(|r| r.has_issues)
            .map(|r| ReviewComment {
                path: r.file.clone(),
                line: 1,
                body: format!(
                    "## Issues found by AI code review\n\n{}...",
                    r.review.chars().take(COMMENT_CHARS).collect::<String>()
                ),
            })
            .collect();
        let comments_path = opts.out_dir.join("ai_review_comments.json");
        fs::write(&comments_path, serde_json::to_string_pretty(&comments)?)
            .with_context(|| format!("writing {}", comments_path.display()))?;
    }

    info!("review artifacts written to {}", opts.out_dir.display());
    Ok(())
}

//! Batch import driver: walk a source's listing feeds page by page,
//! dedup each lead against the recipes already persisted, import the
//! rest, and record every outcome. One bad recipe never aborts a run;
//! only a failing listing fetch does, since without listings there is
//! nothing to drive.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db;
use crate::pipeline;
use crate::types::{ListOutcome, ParsedOutcome, RecipeLead, Source};

/// Per-run tallies, printed as the batch summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub pages: usize,
    pub leads: usize,
    pub imported: usize,
    pub partial: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportCounts {
    pub fn print(&self) {
        println!(
            "Walked {} listing pages: {} leads, {} imported, {} partial, {} already imported, {} failed.",
            self.pages, self.leads, self.imported, self.partial, self.skipped, self.failed
        );
    }
}

/// Listing feeds per source. fodmap-formula paginates per category;
/// the other sites have one archive feed.
fn feeds(source: Source) -> Vec<String> {
    match source {
        Source::FodmapFormula => {
            const CATEGORIES: &[&str] = &[
                "breakfast",
                "lunch",
                "dinner",
                "dessert",
                "soupsalad",
                "side-dishes",
                "appetizers",
                "snacks",
                "drinks",
            ];
            CATEGORIES
                .iter()
                .map(|cat| format!("https://www.fodmapformula.com/category/recipe/{cat}"))
                .collect()
        }
        Source::FodmapEveryday => vec!["https://www.fodmapeveryday.com/recipes".to_string()],
        Source::Karlijns => vec!["https://www.karlijnskitchen.com/en/recipes".to_string()],
    }
}

pub async fn run(
    conn: &Connection,
    client: &reqwest::Client,
    source: Source,
    dry_run: bool,
) -> Result<ImportCounts> {
    if dry_run {
        println!("> Dry run: nothing will be written");
    }
    let mut counts = ImportCounts::default();
    for feed in feeds(source) {
        walk_feed(conn, client, &feed, dry_run, &mut counts).await?;
    }
    Ok(counts)
}

/// Walk one feed's pages lazily. The true last page is unknown ahead of
/// time: the walk ends when a page 404s, no list parser matches, or a
/// page comes back with zero leads.
pub(crate) async fn walk_feed(
    conn: &Connection,
    client: &reqwest::Client,
    feed: &str,
    dry_run: bool,
    counts: &mut ImportCounts,
) -> Result<()> {
    for page_url in (1u32..).map(|n| format!("{feed}/page/{n}")) {
        println!("> Listing recipes from {page_url}");
        let outcome = pipeline::list_recipes(client, &page_url)
            .await
            .with_context(|| format!("listing fetch failed for {page_url}"))?;

        let leads = match outcome {
            ListOutcome::Success(leads) => leads,
            ListOutcome::Partial { leads, errors } => {
                warn!(
                    "listing parsed partially, {} leads kept, {} cards invalid",
                    leads.len(),
                    errors.len()
                );
                for e in &errors {
                    warn!("    {}: {}", e.path, e.message);
                }
                leads
            }
            ListOutcome::Error { message } => {
                info!("{message}; end of feed");
                return Ok(());
            }
        };
        if leads.is_empty() {
            info!("no leads on {page_url}; end of feed");
            return Ok(());
        }

        counts.pages += 1;
        counts.leads += leads.len();
        println!("> Found {} recipe leads", leads.len());

        let pb = ProgressBar::new(leads.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        for lead in &leads {
            pb.set_message(lead.title.clone());
            import_lead(conn, client, lead, dry_run, counts).await;
            pb.inc(1);
        }
        pb.finish_and_clear();
    }
    Ok(())
}

/// Import one lead. Every failure mode here is logged and swallowed so
/// the batch keeps moving.
async fn import_lead(
    conn: &Connection,
    client: &reqwest::Client,
    lead: &RecipeLead,
    dry_run: bool,
    counts: &mut ImportCounts,
) {
    match db::recipe_exists(conn, &lead.url) {
        Ok(true) => {
            info!(url = %lead.url, "skipped: already imported");
            counts.skipped += 1;
            return;
        }
        Ok(false) => {}
        Err(e) => {
            warn!(url = %lead.url, "dedup lookup failed: {e}");
            counts.failed += 1;
            return;
        }
    }

    let outcome = match pipeline::parse_recipe(client, &lead.url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(url = %lead.url, "skipped: {e}");
            counts.failed += 1;
            return;
        }
    };

    match outcome {
        ParsedOutcome::Success(recipe) => {
            if dry_run {
                info!(url = %lead.url, "imported (dry run): {}", recipe.title);
                counts.imported += 1;
                return;
            }
            match db::save_recipe(conn, &recipe) {
                Ok(_) => {
                    info!(url = %lead.url, "imported: {}", recipe.title);
                    counts.imported += 1;
                }
                Err(e) => {
                    warn!(url = %lead.url, "failed to save recipe: {e}");
                    counts.failed += 1;
                }
            }
        }
        ParsedOutcome::Partial { draft, errors } => {
            warn!(url = %lead.url, "partial import, {} field errors", errors.len());
            for e in &errors {
                warn!("    {}: {}", e.path, e.message);
            }
            counts.partial += 1;
            if dry_run {
                return;
            }
            if let Err(e) = db::record_partial_import(conn, &lead.url, &lead.title, &errors, &draft)
            {
                warn!(url = %lead.url, "failed to record partial import: {e}");
            }
        }
        ParsedOutcome::Error { message } => {
            warn!(url = %lead.url, "skipped: {message}");
            counts.failed += 1;
        }
    }
}

// ── Tests ──

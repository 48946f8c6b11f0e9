mod courses;
mod db;
mod fetch;
mod import;
mod parsers;
mod pipeline;
mod types;
mod validate;

use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::types::{ListOutcome, ParsedOutcome, RecipeImport, Source};

#[derive(Parser)]
#[command(name = "recipe_scraper", about = "Recipe site importer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Batch-import every recipe a source's listing feeds link to
    Import {
        /// Source site to import from
        #[arg(value_enum)]
        source: Source,
        /// Walk the listings and parse, but write nothing
        #[arg(short = 'd', long)]
        dry_run: bool,
    },
    /// Parse a single recipe page and print the outcome
    Parse {
        /// Recipe detail page URL
        url: String,
    },
    /// Parse a single listing page and print the leads found
    List {
        /// Listing page URL
        url: String,
    },
    /// Show recorded import audit rows
    Imports {
        /// Filter by status (success, partial)
        #[arg(short, long)]
        status: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show import statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { source, dry_run } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let client = fetch::client();
            println!("> Importing from source: {}", source.as_str());
            let counts = import::run(&conn, &client, source, dry_run).await?;
            counts.print();
            Ok(())
        }
        Commands::Parse { url } => {
            let client = fetch::client();
            match pipeline::parse_recipe(&client, &url).await? {
                ParsedOutcome::Success(recipe) => print_recipe(&recipe),
                ParsedOutcome::Partial { draft, errors } => {
                    println!("Partial extraction, {} field errors:", errors.len());
                    for e in &errors {
                        println!("    {}: {}", e.path, e.message);
                    }
                    println!("\nRaw draft:");
                    println!("{}", serde_json::to_string_pretty(&draft)?);
                }
                ParsedOutcome::Error { message } => println!("Error: {message}"),
            }
            Ok(())
        }
        Commands::List { url } => {
            let client = fetch::client();
            match pipeline::list_recipes(&client, &url).await? {
                ListOutcome::Success(leads) => print_leads(&leads),
                ListOutcome::Partial { leads, errors } => {
                    println!("Listing parsed partially, {} invalid cards:", errors.len());
                    for e in &errors {
                        println!("    {}: {}", e.path, e.message);
                    }
                    println!();
                    print_leads(&leads);
                }
                ListOutcome::Error { message } => println!("Error: {message}"),
            }
            Ok(())
        }
        Commands::Imports { status, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            if let Some(s) = &status {
                if s != "success" && s != "partial" {
                    anyhow::bail!("invalid status {s:?}: expected success or partial");
                }
            }
            let rows = db::fetch_imports(&conn, status.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No import records found.");
                return Ok(());
            }

            println!(
                "{:<8} | {:<14} | {:<19} | {:<40} | {:<48} | {}",
                "Status", "Source", "Updated", "Title", "URL", "Errors"
            );
            println!("{}", "-".repeat(150));
            for r in &rows {
                println!(
                    "{:<8} | {:<14} | {:<19} | {:<40} | {:<48} | {}",
                    r.status,
                    r.source,
                    r.updated_at,
                    truncate(&r.title, 40),
                    truncate(&r.url, 48),
                    r.errors.len()
                );
                for e in &r.errors {
                    println!("             {}: {}", e.path, e.message);
                }
            }
            println!("\n{} import records", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Recipes:   {}", s.recipes);
            for (source, count) in &s.per_source {
                println!("    {:<16} {}", source, count);
            }
            println!("Imports:   {}", s.imports);
            println!("Succeeded: {}", s.succeeded);
            println!("Partial:   {}", s.partial);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_recipe(recipe: &RecipeImport) {
    println!("Title:    {}", recipe.title);
    println!("Time:     {}", recipe.time);
    println!("Servings: {}", recipe.servings);
    println!(
        "Courses:  {}",
        recipe
            .courses
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(posted) = recipe.posted_at {
        println!("Posted:   {posted}");
    }
    println!("Image:    {}", recipe.image_url);
    for set in &recipe.ingredient_sets {
        if set.name.is_empty() {
            println!("\nIngredients:");
        } else {
            println!("\nIngredients ({}):", set.name);
        }
        for ingredient in &set.ingredients {
            println!("    - {ingredient}");
        }
    }
    for set in &recipe.instruction_sets {
        if set.name.is_empty() {
            println!("\nInstructions:");
        } else {
            println!("\nInstructions ({}):", set.name);
        }
        for (i, step) in set.instructions.iter().enumerate() {
            println!("    {}. {}", i + 1, step);
        }
    }
    if !recipe.notes.is_empty() {
        println!("\nNotes:");
        for note in &recipe.notes {
            println!("    - {note}");
        }
    }
}

fn print_leads(leads: &[crate::types::RecipeLead]) {
    println!("{:<48} | {}", "Title", "URL");
    println!("{}", "-".repeat(110));
    for lead in leads {
        println!("{:<48} | {}", truncate(&lead.title, 48), lead.url);
    }
    println!("\n{} recipe leads", leads.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

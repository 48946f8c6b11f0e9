use anyhow::Result;
use rusqlite::Connection;

use crate::types::{Course, FieldError, RecipeDraft, RecipeImport};

const DEFAULT_DB_PATH: &str = "data/recipes.sqlite";

pub fn connect() -> Result<Connection> {
    let path = std::env::var("RECIPE_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    if let Some(dir) = std::path::Path::new(&path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS recipes (
            id          INTEGER PRIMARY KEY,
            title       TEXT NOT NULL,
            time        TEXT NOT NULL,
            servings    INTEGER NOT NULL,
            image_url   TEXT NOT NULL,
            notes       TEXT NOT NULL DEFAULT '[]',
            posted_at   TEXT,
            keywords    TEXT NOT NULL DEFAULT '[]',
            courses     TEXT NOT NULL,
            source_url  TEXT UNIQUE NOT NULL,
            source      TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_recipes_source ON recipes(source);

        CREATE TABLE IF NOT EXISTS ingredient_sets (
            id          INTEGER PRIMARY KEY,
            recipe_id   INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position    INTEGER NOT NULL,
            name        TEXT NOT NULL DEFAULT '',
            ingredients TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_ingredient_sets_recipe ON ingredient_sets(recipe_id);

        CREATE TABLE IF NOT EXISTS instruction_sets (
            id           INTEGER PRIMARY KEY,
            recipe_id    INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position     INTEGER NOT NULL,
            name         TEXT NOT NULL DEFAULT '',
            instructions TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_instruction_sets_recipe ON instruction_sets(recipe_id);

        -- Audit trail: one row per import attempt, keyed on URL so re-runs
        -- refine the record instead of duplicating it.
        CREATE TABLE IF NOT EXISTS recipe_imports (
            id          INTEGER PRIMARY KEY,
            url         TEXT UNIQUE NOT NULL,
            title       TEXT,
            source      TEXT,
            status      TEXT NOT NULL CHECK(status IN ('success','partial')),
            errors      TEXT NOT NULL DEFAULT '[]',
            draft       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_imports_status ON recipe_imports(status);
        ",
    )?;
    Ok(())
}

fn join_courses(courses: &[Course]) -> String {
    courses
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

// ── Recipes ──

/// Dedup check: has this source URL already been imported as a recipe?
pub fn recipe_exists(conn: &Connection, source_url: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM recipes WHERE source_url = ?1",
        [source_url],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Persist a validated recipe, its ordered sets, and its success audit
/// row in one transaction. A half-written recipe is never visible.
pub fn save_recipe(conn: &Connection, recipe: &RecipeImport) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let recipe_id = {
        tx.execute(
            "INSERT INTO recipes
             (title, time, servings, image_url, notes, posted_at, keywords, courses, source_url, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                recipe.title,
                recipe.time,
                recipe.servings,
                recipe.image_url,
                serde_json::to_string(&recipe.notes)?,
                recipe.posted_at.map(|d| d.to_string()),
                serde_json::to_string(&recipe.keywords)?,
                join_courses(&recipe.courses),
                recipe.source_url,
                recipe.source.as_str(),
            ],
        )?;
        tx.last_insert_rowid()
    };

    {
        let mut stmt = tx.prepare(
            "INSERT INTO ingredient_sets (recipe_id, position, name, ingredients)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (i, set) in recipe.ingredient_sets.iter().enumerate() {
            stmt.execute(rusqlite::params![
                recipe_id,
                i as i64,
                set.name,
                serde_json::to_string(&set.ingredients)?,
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO instruction_sets (recipe_id, position, name, instructions)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (i, set) in recipe.instruction_sets.iter().enumerate() {
            stmt.execute(rusqlite::params![
                recipe_id,
                i as i64,
                set.name,
                serde_json::to_string(&set.instructions)?,
            ])?;
        }

        tx.execute(
            "INSERT INTO recipe_imports (url, title, source, status, errors, draft)
             VALUES (?1, ?2, ?3, 'success', '[]', NULL)
             ON CONFLICT(url) DO UPDATE SET
                 title = excluded.title,
                 source = excluded.source,
                 status = 'success',
                 errors = '[]',
                 draft = NULL,
                 updated_at = datetime('now')",
            rusqlite::params![recipe.source_url, recipe.title, recipe.source.as_str()],
        )?;
    }

    tx.commit()?;
    Ok(recipe_id)
}

// ── Import audit ──

/// Record a partial import for later manual repair: the field errors plus
/// the raw draft, upserted on URL.
pub fn record_partial_import(
    conn: &Connection,
    url: &str,
    title: &str,
    errors: &[FieldError],
    draft: &RecipeDraft,
) -> Result<()> {
    conn.execute(
        "INSERT INTO recipe_imports (url, title, source, status, errors, draft)
         VALUES (?1, ?2, ?3, 'partial', ?4, ?5)
         ON CONFLICT(url) DO UPDATE SET
             title = excluded.title,
             source = excluded.source,
             status = 'partial',
             errors = excluded.errors,
             draft = excluded.draft,
             updated_at = datetime('now')",
        rusqlite::params![
            url,
            title,
            draft.source.as_str(),
            serde_json::to_string(errors)?,
            serde_json::to_string(draft)?,
        ],
    )?;
    Ok(())
}

pub struct ImportRow {
    pub url: String,
    pub title: String,
    pub source: String,
    pub status: String,
    pub errors: Vec<FieldError>,
    pub updated_at: String,
}

pub fn fetch_imports(
    conn: &Connection,
    status: Option<&str>,
    limit: usize,
) -> Result<Vec<ImportRow>> {
    let sql = format!(
        "SELECT url, COALESCE(title,''), COALESCE(source,''), status, errors, updated_at
         FROM recipe_imports{}
         ORDER BY updated_at DESC
         LIMIT {}",
        match status {
            Some(_) => " WHERE status = ?1",
            None => "",
        },
        limit
    );

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ImportRow> {
        let errors_json: String = row.get(4)?;
        Ok(ImportRow {
            url: row.get(0)?,
            title: row.get(1)?,
            source: row.get(2)?,
            status: row.get(3)?,
            errors: serde_json::from_str(&errors_json).unwrap_or_default(),
            updated_at: row.get(5)?,
        })
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = match status {
        Some(s) => stmt
            .query_map([s], map_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub recipes: usize,
    pub per_source: Vec<(String, usize)>,
    pub imports: usize,
    pub succeeded: usize,
    pub partial: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let recipes: usize = conn.query_row("SELECT COUNT(*) FROM recipes", [], |r| r.get(0))?;

    let mut stmt =
        conn.prepare("SELECT source, COUNT(*) FROM recipes GROUP BY source ORDER BY source")?;
    let per_source = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let imports: usize = conn.query_row("SELECT COUNT(*) FROM recipe_imports", [], |r| r.get(0))?;
    let succeeded: usize = conn.query_row(
        "SELECT COUNT(*) FROM recipe_imports WHERE status = 'success'",
        [],
        |r| r.get(0),
    )?;
    let partial: usize = conn.query_row(
        "SELECT COUNT(*) FROM recipe_imports WHERE status = 'partial'",
        [],
        |r| r.get(0),
    )?;

    Ok(Stats {
        recipes,
        per_source,
        imports,
        succeeded,
        partial,
    })
}

// ── Tests ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed set of course tags a recipe can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Course {
    Breakfast,
    Main,
    Side,
    Salad,
    Soup,
    Snack,
    Dessert,
    Drink,
    Other,
}

impl Course {
    pub fn as_str(&self) -> &'static str {
        match self {
            Course::Breakfast => "BREAKFAST",
            Course::Main => "MAIN",
            Course::Side => "SIDE",
            Course::Salad => "SALAD",
            Course::Soup => "SOUP",
            Course::Snack => "SNACK",
            Course::Dessert => "DESSERT",
            Course::Drink => "DRINK",
            Course::Other => "OTHER",
        }
    }
}

/// Registered source sites. One source may be served by several parsers
/// when the site has gone through template changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    FodmapFormula,
    FodmapEveryday,
    Karlijns,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::FodmapFormula => "fodmap-formula",
            Source::FodmapEveryday => "fodmap-everyday",
            Source::Karlijns => "karlijns",
        }
    }
}

/// Named, ordered ingredient group. The name is empty when the page has
/// no sub-headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSet {
    pub name: String,
    pub ingredients: Vec<String>,
}

impl IngredientSet {
    /// Wrap a flat ingredient list in one implicit unnamed group.
    pub fn unnamed(ingredients: Vec<String>) -> Vec<IngredientSet> {
        vec![IngredientSet {
            name: String::new(),
            ingredients,
        }]
    }
}

/// Named, ordered instruction group; steps are sequential. Embedded HTML
/// inside steps is preserved, not stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub name: String,
    pub instructions: Vec<String>,
}

impl InstructionSet {
    pub fn unnamed(instructions: Vec<String>) -> Vec<InstructionSet> {
        vec![InstructionSet {
            name: String::new(),
            instructions,
        }]
    }
}

/// A recipe discovered on a listing page: just enough to decide whether
/// the detail page is worth fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLead {
    pub url: String,
    pub title: String,
    pub image_url: String,
}

/// Raw listing-card extraction. Any field may be missing; lead validation
/// decides downstream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeadDraft {
    pub url: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// Fully validated recipe extraction. Only the validator constructs this;
/// everything it holds satisfies the schema (non-empty title and time,
/// servings >= 1, at least one non-empty ingredient and instruction set,
/// at least one course).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeImport {
    pub title: String,
    pub time: String,
    pub servings: u32,
    pub image_url: String,
    pub ingredient_sets: Vec<IngredientSet>,
    pub instruction_sets: Vec<InstructionSet>,
    pub notes: Vec<String>,
    pub posted_at: Option<NaiveDate>,
    pub keywords: Vec<String>,
    pub courses: Vec<Course>,
    pub source_url: String,
    pub source: Source,
}

/// Raw detail-page extraction. Parsers never fail: a selector miss leaves
/// the field empty/zero/None here, and validation turns that into field
/// errors instead of a crash. `servings` keeps 0 as its invalid sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub time: Option<String>,
    pub servings: u32,
    pub image_url: Option<String>,
    pub ingredient_sets: Vec<IngredientSet>,
    pub instruction_sets: Vec<InstructionSet>,
    pub notes: Vec<String>,
    pub posted_at: Option<NaiveDate>,
    pub keywords: Vec<String>,
    pub courses: Vec<Course>,
    pub source_url: String,
    pub source: Source,
}

/// One schema violation in a raw extraction, addressed by a dotted field
/// path (e.g. `ingredient_sets.0.ingredients`) so the operator can locate
/// the exact field to repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Outcome of importing a single detail page. Fetch failures are not an
/// outcome; they surface as an `Err` from the pipeline call itself.
#[derive(Debug)]
pub enum ParsedOutcome {
    /// Validation passed; the payload satisfies every schema constraint.
    Success(RecipeImport),
    /// Validation failed; the raw draft plus every violated field is kept
    /// so the import can be repaired by hand later.
    Partial {
        draft: RecipeDraft,
        errors: Vec<FieldError>,
    },
    /// No applicable parser. Nothing structured enough to keep.
    Error { message: String },
}

/// Outcome of parsing one listing page.
#[derive(Debug)]
pub enum ListOutcome {
    Success(Vec<RecipeLead>),
    /// Some cards failed lead validation; the valid ones are kept.
    Partial {
        leads: Vec<RecipeLead>,
        errors: Vec<FieldError>,
    },
    /// Page not found or no listing parser matched. Routine when batch
    /// pagination walks past the last real page.
    Error { message: String },
}

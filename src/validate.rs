//! Schema validation for raw extractions. Violations are data, not
//! errors: each one becomes a path-addressed `FieldError` so a partial
//! import can be repaired by hand instead of being dropped.

use url::Url;

use crate::types::{FieldError, LeadDraft, RecipeDraft, RecipeImport, RecipeLead};

fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

fn check_url(errors: &mut Vec<FieldError>, path: &str, value: Option<&str>) {
    match value {
        Some(v) if is_url(v) => {}
        _ => errors.push(FieldError::new(path, "must be a valid URL")),
    }
}

/// Every schema violation in the draft, in field order.
pub fn recipe_errors(draft: &RecipeDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.title.as_deref().unwrap_or("").is_empty() {
        errors.push(FieldError::new("title", "must not be empty"));
    }
    if draft.time.as_deref().unwrap_or("").is_empty() {
        errors.push(FieldError::new("time", "must not be empty"));
    }
    if draft.servings < 1 {
        errors.push(FieldError::new("servings", "must be at least 1"));
    }
    check_url(&mut errors, "image_url", draft.image_url.as_deref());

    if draft.ingredient_sets.is_empty() {
        errors.push(FieldError::new(
            "ingredient_sets",
            "at least one ingredient set is required",
        ));
    }
    for (i, set) in draft.ingredient_sets.iter().enumerate() {
        if set.ingredients.is_empty() {
            errors.push(FieldError::new(
                format!("ingredient_sets.{i}.ingredients"),
                "at least one ingredient is required",
            ));
        }
    }

    if draft.instruction_sets.is_empty() {
        errors.push(FieldError::new(
            "instruction_sets",
            "at least one instruction set is required",
        ));
    }
    for (i, set) in draft.instruction_sets.iter().enumerate() {
        if set.instructions.is_empty() {
            errors.push(FieldError::new(
                format!("instruction_sets.{i}.instructions"),
                "at least one instruction is required",
            ));
        }
    }

    for (i, note) in draft.notes.iter().enumerate() {
        if note.trim().is_empty() {
            errors.push(FieldError::new(format!("notes.{i}"), "must not be empty"));
        }
    }

    if draft.courses.is_empty() {
        errors.push(FieldError::new("courses", "at least one course is required"));
    }

    check_url(&mut errors, "source_url", Some(draft.source_url.as_str()));

    errors
}

/// Convert a draft into the strict record, or hand the draft back with
/// its violations. The strict type is only ever built here.
pub fn validate_recipe(draft: RecipeDraft) -> Result<RecipeImport, (RecipeDraft, Vec<FieldError>)> {
    let errors = recipe_errors(&draft);
    if !errors.is_empty() {
        return Err((draft, errors));
    }

    Ok(RecipeImport {
        title: draft.title.unwrap_or_default(),
        time: draft.time.unwrap_or_default(),
        servings: draft.servings,
        image_url: draft.image_url.unwrap_or_default(),
        ingredient_sets: draft.ingredient_sets,
        instruction_sets: draft.instruction_sets,
        notes: draft.notes,
        posted_at: draft.posted_at,
        keywords: draft.keywords,
        courses: draft.courses,
        source_url: draft.source_url,
        source: draft.source,
    })
}

pub fn validate_lead(draft: LeadDraft) -> Result<RecipeLead, Vec<FieldError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "url", draft.url.as_deref());
    if draft.title.as_deref().unwrap_or("").is_empty() {
        errors.push(FieldError::new("title", "must not be empty"));
    }
    check_url(&mut errors, "image_url", draft.image_url.as_deref());

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RecipeLead {
        url: draft.url.unwrap_or_default(),
        title: draft.title.unwrap_or_default(),
        image_url: draft.image_url.unwrap_or_default(),
    })
}

// ── Tests ──

//! karlijnskitchen.com English recipes (Tasty Recipes, named ingredient
//! and instruction groups).
//! e.g. https://www.karlijnskitchen.com/en/recipe/low-fodmap-lasagna/

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{dom, SiteParser};
use crate::courses;
use crate::types::{IngredientSet, InstructionSet, LeadDraft, RecipeDraft, Source};

static LIST_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"karlijnskitchen\.com/en/(recipes|tag)").unwrap());

pub struct Karlijns;

/// Group headers sit next to their list containers; pair them by
/// position. Lists beyond the last header get an empty name.
fn grouped(doc: &Html, container: &str) -> Vec<(String, Vec<String>)> {
    let headers = dom::texts(
        doc,
        &format!(
            "{container} [data-tasty-recipes-customization] > h4, \
             {container} [data-tasty-recipes-customization] > p"
        ),
    );
    doc.select(&dom::sel(&format!("{container} ul, {container} ol")))
        .enumerate()
        .map(|(i, group)| {
            let name = headers.get(i).cloned().unwrap_or_default();
            (name, dom::texts_in(group, "li"))
        })
        .collect()
}

impl SiteParser for Karlijns {
    fn name(&self) -> &'static str {
        "karlijns"
    }

    fn can_parse(&self, doc: &Html, url: &str) -> bool {
        url.contains("karlijnskitchen.com") && dom::exists(doc, ".tasty-recipes")
    }

    fn can_list(&self, _doc: &Html, url: &str) -> bool {
        LIST_URL_RE.is_match(url)
    }

    fn list(&self, doc: &Html, _url: &str) -> Vec<LeadDraft> {
        doc.select(&dom::sel(".entry-summary"))
            .map(|card| LeadDraft {
                url: dom::attr_in(card, "a", "href"),
                title: dom::text_in(card, ".title"),
                image_url: dom::attr_in(card, "img", "src"),
            })
            .collect()
    }

    fn parse(&self, doc: &Html, url: &str) -> RecipeDraft {
        let ingredient_sets: Vec<IngredientSet> = grouped(doc, ".tasty-recipes-ingredients")
            .into_iter()
            .map(|(name, ingredients)| IngredientSet { name, ingredients })
            .collect();

        let instruction_sets: Vec<InstructionSet> = grouped(doc, ".tasty-recipes-instructions")
            .into_iter()
            .map(|(name, instructions)| InstructionSet { name, instructions })
            .collect();

        // Category text plus the breadcrumb trail; some posts only carry
        // their course in the breadcrumbs.
        let mut category = dom::text(doc, ".tasty-recipes-category").unwrap_or_default();
        if let Some(crumb) = dom::text(doc, "#breadcrumbs span") {
            if category.is_empty() {
                category = crumb;
            } else {
                category.push_str(", ");
                category.push_str(&crumb);
            }
        }

        RecipeDraft {
            title: dom::text(doc, ".tasty-recipes-title"),
            time: dom::text(doc, ".tasty-recipes-total-time")
                .map(|t| dom::strip_labels(&t, &["Total Time:"]))
                .filter(|t| !t.is_empty()),
            servings: dom::text(doc, ".tasty-recipes-yield [data-amount]")
                .map(|t| dom::first_int(&t))
                .unwrap_or(0),
            image_url: dom::attr(doc, ".entry-content img", "src"),
            ingredient_sets,
            instruction_sets,
            notes: dom::inner_htmls(doc, ".tasty-recipes-notes-body p"),
            posted_at: dom::posted_date(doc, ".entry-date"),
            keywords: Vec::new(),
            courses: courses::classify(&category),
            source_url: url.to_string(),
            source: Source::Karlijns,
        }
    }
}

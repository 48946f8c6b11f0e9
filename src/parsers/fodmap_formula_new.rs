//! fodmapformula.com posts using the current Tasty Recipes card.
//! e.g. https://www.fodmapformula.com/low-fodmap-warm-potato-salad/

use scraper::Html;

use super::{dom, SiteParser};
use crate::courses;
use crate::types::{IngredientSet, InstructionSet, LeadDraft, RecipeDraft, Source};

pub struct FodmapFormulaNew;

impl SiteParser for FodmapFormulaNew {
    fn name(&self) -> &'static str {
        "fodmap-formula-new"
    }

    fn can_parse(&self, doc: &Html, url: &str) -> bool {
        url.contains("fodmapformula.com") && dom::exists(doc, ".tasty-recipes-entry-header")
    }

    fn can_list(&self, doc: &Html, url: &str) -> bool {
        url.contains("fodmapformula.com") && dom::exists(doc, ".entry")
    }

    fn list(&self, doc: &Html, _url: &str) -> Vec<LeadDraft> {
        doc.select(&dom::sel(".entry"))
            .map(|card| LeadDraft {
                url: dom::attr_in(card, ".entry-image-link", "href"),
                title: dom::text_in(card, ".entry-title-link"),
                image_url: dom::attr_in(card, ".entry-image", "src"),
            })
            .collect()
    }

    fn parse(&self, doc: &Html, url: &str) -> RecipeDraft {
        let ingredients = dom::texts(doc, ".tasty-recipes-ingredients li");
        let instructions = dom::texts(doc, ".tasty-recipes-instructions li");

        let keywords = dom::text(doc, ".tasty-recipes-keywords")
            .map(|raw| dom::strip_labels(&raw, &["Keywords:"]))
            .map(|raw| {
                raw.split(',')
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let category = dom::text(doc, ".tasty-recipes-category").unwrap_or_default();

        RecipeDraft {
            title: dom::text(doc, "h1.entry-title"),
            time: dom::text(doc, ".tasty-recipes-total-time")
                .map(|t| dom::strip_labels(&t, &["Total Time:"]))
                .filter(|t| !t.is_empty()),
            servings: dom::text(doc, ".yield [data-amount]")
                .map(|t| dom::first_int(&t))
                .unwrap_or(0),
            image_url: dom::content_image(doc),
            ingredient_sets: IngredientSet::unnamed(ingredients),
            instruction_sets: InstructionSet::unnamed(instructions),
            notes: dom::inner_htmls(doc, ".tasty-recipes-notes-body p"),
            posted_at: None,
            keywords,
            courses: courses::classify(&category),
            source_url: url.to_string(),
            source: Source::FodmapFormula,
        }
    }
}

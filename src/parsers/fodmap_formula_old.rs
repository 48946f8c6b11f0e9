//! Older fodmapformula.com posts rendered with WP Recipe Maker.
//! e.g. https://www.fodmapformula.com/london-fog/

use scraper::Html;

use super::{dom, SiteParser};
use crate::courses;
use crate::types::{IngredientSet, InstructionSet, LeadDraft, RecipeDraft, Source};

pub struct FodmapFormulaOld;

fn servings(doc: &Html) -> u32 {
    dom::text(doc, ".yield [data-amount]")
        .or_else(|| dom::text(doc, ".wprm-recipe-servings"))
        .map(|t| dom::first_int(&t))
        .unwrap_or(0)
}

impl SiteParser for FodmapFormulaOld {
    fn name(&self) -> &'static str {
        "fodmap-formula-old"
    }

    fn can_parse(&self, doc: &Html, url: &str) -> bool {
        url.contains("fodmapformula.com") && dom::exists(doc, ".wprm-recipe")
    }

    fn can_list(&self, doc: &Html, url: &str) -> bool {
        url.contains("fodmapformula.com") && dom::exists(doc, ".entry")
    }

    fn list(&self, doc: &Html, _url: &str) -> Vec<LeadDraft> {
        doc.select(&dom::sel(".entry"))
            .map(|card| LeadDraft {
                url: dom::attr_in(card, ".entry-image-link", "href"),
                title: dom::text_in(card, ".entry-content-link"),
                image_url: dom::attr_in(card, ".entry-image", "src"),
            })
            .collect()
    }

    fn parse(&self, doc: &Html, url: &str) -> RecipeDraft {
        let ingredients = dom::texts(doc, ".wprm-recipe-ingredient");
        let instructions = dom::texts(doc, ".wprm-recipe-instruction");

        // The card shows prep/cook/total; the total is rendered last.
        let time = dom::texts(doc, ".wprm-recipe-time").pop();

        let category = dom::text(doc, ".wprm-recipe-course").unwrap_or_default();

        RecipeDraft {
            title: dom::text(doc, "h1.entry-title"),
            time,
            servings: servings(doc),
            image_url: dom::content_image(doc),
            ingredient_sets: IngredientSet::unnamed(ingredients),
            instruction_sets: InstructionSet::unnamed(instructions),
            notes: dom::inner_htmls(
                doc,
                ".wprm-recipe-notes-container p, .wprm-recipe-notes-container li",
            ),
            posted_at: None,
            keywords: Vec::new(),
            courses: courses::classify(&category),
            source_url: url.to_string(),
            source: Source::FodmapFormula,
        }
    }
}

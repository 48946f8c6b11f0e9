//! fodmapeveryday.com recipes (WP Recipe Maker, named ingredient groups).
//! e.g. https://www.fodmapeveryday.com/recipes/rhubarb-upside-down-cake/

use scraper::Html;

use super::{dom, SiteParser};
use crate::courses;
use crate::types::{IngredientSet, InstructionSet, LeadDraft, RecipeDraft, Source};

pub struct FodmapEveryday;

/// Group names render with a trailing colon ("For the crust:"); drop it.
fn group_name(raw: Option<String>) -> String {
    raw.map(|n| dom::collapse_ws(&n.replace(':', "")))
        .unwrap_or_default()
}

impl SiteParser for FodmapEveryday {
    fn name(&self) -> &'static str {
        "fodmap-everyday"
    }

    fn can_parse(&self, doc: &Html, url: &str) -> bool {
        url.contains("fodmapeveryday.com") && dom::exists(doc, ".wprm-recipe")
    }

    fn can_list(&self, _doc: &Html, url: &str) -> bool {
        url.contains("fodmapeveryday.com/recipes")
    }

    fn list(&self, doc: &Html, _url: &str) -> Vec<LeadDraft> {
        doc.select(&dom::sel(".entry"))
            .map(|card| LeadDraft {
                url: dom::attr_in(card, ".entry-image-link", "href"),
                title: dom::text_in(card, ".entry-content h6"),
                image_url: dom::attr_in(card, ".entry-image-link img", "src"),
            })
            .collect()
    }

    fn parse(&self, doc: &Html, url: &str) -> RecipeDraft {
        let ingredient_sets: Vec<IngredientSet> = doc
            .select(&dom::sel(".wprm-recipe-ingredient-group"))
            .map(|group| IngredientSet {
                name: group_name(dom::text_in(group, ".wprm-recipe-ingredient-group-name")),
                ingredients: dom::texts_in(group, ".wprm-recipe-ingredient"),
            })
            .collect();

        // Instructions carry no grouping markup on this site.
        let instructions = dom::texts(doc, ".wprm-recipe-instruction");

        let category = dom::text(doc, ".wprm-recipe-course").unwrap_or_default();

        RecipeDraft {
            title: dom::text(doc, ".wprm-recipe-name"),
            time: dom::text(doc, ".wprm-recipe-total-time-container")
                .map(|t| dom::strip_labels(&t, &["Total Time:"]))
                .filter(|t| !t.is_empty()),
            servings: dom::text(doc, ".wprm-recipe-servings")
                .map(|t| dom::first_int(&t))
                .unwrap_or(0),
            image_url: dom::og_image(doc),
            ingredient_sets,
            instruction_sets: InstructionSet::unnamed(instructions),
            notes: dom::inner_htmls(
                doc,
                ".wprm-recipe-notes-container p, .wprm-recipe-notes-container li",
            ),
            posted_at: dom::posted_date(doc, ".entry-modified-date")
                .or_else(|| dom::posted_date(doc, ".entry-date")),
            keywords: Vec::new(),
            courses: courses::classify(&category),
            source_url: url.to_string(),
            source: Source::FodmapEveryday,
        }
    }
}

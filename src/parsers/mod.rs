pub mod dom;
mod fodmap_everyday;
mod fodmap_formula_new;
mod fodmap_formula_old;
mod karlijns;

use scraper::Html;

use crate::types::{LeadDraft, RecipeDraft};
use fodmap_everyday::FodmapEveryday;
use fodmap_formula_new::FodmapFormulaNew;
use fodmap_formula_old::FodmapFormulaOld;
use karlijns::Karlijns;

/// One structural parser per supported site template. Extraction is
/// permissive by contract: a selector miss becomes an empty/zero/None
/// field in the draft, never an error. Completeness is judged by the
/// validation step, not here.
pub trait SiteParser: Sync {
    fn name(&self) -> &'static str;
    /// Whether this parser's detail-page markers are present.
    fn can_parse(&self, doc: &Html, url: &str) -> bool;
    /// Whether this parser can read `url` as a listing page. Independent
    /// of `can_parse`; listing and detail pages have different markup.
    fn can_list(&self, doc: &Html, url: &str) -> bool;
    fn list(&self, doc: &Html, url: &str) -> Vec<LeadDraft>;
    fn parse(&self, doc: &Html, url: &str) -> RecipeDraft;
}

/// Registered parsers in dispatch order; first match wins. Sites are
/// disjoint by domain, so order only decides between the two
/// fodmap-formula templates.
static PARSERS: [&(dyn SiteParser); 4] = [
    &FodmapFormulaNew,
    &FodmapFormulaOld,
    &FodmapEveryday,
    &Karlijns,
];

pub fn find_detail_parser(doc: &Html, url: &str) -> Option<&'static dyn SiteParser> {
    PARSERS.iter().copied().find(|p| p.can_parse(doc, url))
}

pub fn find_list_parser(doc: &Html, url: &str) -> Option<&'static dyn SiteParser> {
    PARSERS.iter().copied().find(|p| p.can_list(doc, url))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Course, Source};
    use chrono::NaiveDate;

    fn doc(fixture: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{fixture}.html")).unwrap();
        Html::parse_document(&html)
    }

    #[test]
    fn formula_new_detail() {
        let doc = doc("fodmap_formula_new");
        let url = "https://www.fodmapformula.com/low-fodmap-warm-potato-salad/";

        let parser = find_detail_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "fodmap-formula-new");

        let draft = parser.parse(&doc, url);
        assert_eq!(draft.title.as_deref(), Some("Low FODMAP Warm Potato Salad"));
        assert_eq!(draft.time.as_deref(), Some("30 minutes"));
        assert_eq!(draft.servings, 4);
        assert_eq!(draft.ingredient_sets.len(), 1);
        assert_eq!(draft.ingredient_sets[0].ingredients.len(), 4);
        assert_eq!(draft.instruction_sets[0].instructions.len(), 3);
        assert_eq!(draft.courses, vec![Course::Side, Course::Salad]);
        assert_eq!(draft.keywords, vec!["potato", "salad"]);
        // The logo, share badge and svg icon are skipped.
        assert_eq!(
            draft.image_url.as_deref(),
            Some("https://www.fodmapformula.com/photos/potato-salad.jpg")
        );
        assert_eq!(draft.notes.len(), 1);
        assert_eq!(draft.source, Source::FodmapFormula);
    }

    #[test]
    fn formula_old_detail() {
        let doc = doc("fodmap_formula_old");
        let url = "https://www.fodmapformula.com/london-fog/";

        let parser = find_detail_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "fodmap-formula-old");

        let draft = parser.parse(&doc, url);
        assert_eq!(draft.title.as_deref(), Some("London Fog"));
        // Three wprm times on the card; the total renders last.
        assert_eq!(draft.time.as_deref(), Some("10 minutes"));
        assert_eq!(draft.servings, 2);
        assert_eq!(draft.ingredient_sets[0].ingredients.len(), 3);
        assert_eq!(draft.instruction_sets[0].instructions.len(), 2);
        assert_eq!(draft.courses, vec![Course::Drink]);
        assert!(draft.keywords.is_empty());
        assert_eq!(draft.posted_at, None);
    }

    #[test]
    fn everyday_detail_with_named_ingredient_groups() {
        let doc = doc("fodmap_everyday");
        let url = "https://www.fodmapeveryday.com/recipes/rhubarb-upside-down-cake/";

        let parser = find_detail_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "fodmap-everyday");

        let draft = parser.parse(&doc, url);
        assert_eq!(draft.title.as_deref(), Some("Rhubarb Upside Down Cake"));
        assert_eq!(draft.servings, 8);
        assert_eq!(draft.time.as_deref(), Some("1 hour 15 minutes"));

        assert_eq!(draft.ingredient_sets.len(), 2);
        assert_eq!(draft.ingredient_sets[0].name, "For the Topping");
        assert_eq!(draft.ingredient_sets[0].ingredients.len(), 2);
        assert_eq!(draft.ingredient_sets[1].name, "For the Cake");
        assert_eq!(draft.ingredient_sets[1].ingredients.len(), 3);

        assert_eq!(draft.instruction_sets.len(), 1);
        assert_eq!(draft.instruction_sets[0].instructions.len(), 4);

        assert_eq!(
            draft.posted_at,
            NaiveDate::from_ymd_opt(2022, 1, 12)
        );
        assert_eq!(
            draft.image_url.as_deref(),
            Some("https://www.fodmapeveryday.com/photos/rhubarb-cake.jpg")
        );
        assert_eq!(draft.courses, vec![Course::Dessert]);
    }

    #[test]
    fn karlijns_detail_with_grouped_sets_and_breadcrumb_courses() {
        let doc = doc("karlijns");
        let url = "https://www.karlijnskitchen.com/en/recipe/low-fodmap-lasagna/";

        let parser = find_detail_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "karlijns");

        let draft = parser.parse(&doc, url);
        assert_eq!(draft.title.as_deref(), Some("Low FODMAP Lasagna"));
        assert_eq!(draft.servings, 4);

        assert_eq!(draft.ingredient_sets.len(), 2);
        assert_eq!(draft.ingredient_sets[0].name, "For the sauce");
        assert_eq!(draft.ingredient_sets[1].name, "For the layers");
        assert_eq!(draft.instruction_sets.len(), 2);
        assert_eq!(draft.instruction_sets[0].name, "Sauce");

        // No category element on the page; the breadcrumb carries it.
        assert_eq!(draft.courses, vec![Course::Main]);
        assert_eq!(draft.posted_at, NaiveDate::from_ymd_opt(2023, 3, 8));
        // Notes keep their embedded markup.
        assert!(draft.notes[0].contains("<strong>"));
    }

    #[test]
    fn formula_listing_cards() {
        let doc = doc("fodmap_formula_list");
        let url = "https://www.fodmapformula.com/category/recipe/dinner/page/1";

        let parser = find_list_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "fodmap-formula-new");

        let drafts = parser.list(&doc, url);
        assert_eq!(drafts.len(), 3);
        assert_eq!(
            drafts[0].url.as_deref(),
            Some("https://www.fodmapformula.com/low-fodmap-warm-potato-salad/")
        );
        assert_eq!(drafts[0].title.as_deref(), Some("Low FODMAP Warm Potato Salad"));
        // The third card is missing its link; the draft records the gap.
        assert_eq!(drafts[2].url, None);
    }

    #[test]
    fn everyday_listing_cards() {
        let doc = doc("fodmap_everyday_list");
        let url = "https://www.fodmapeveryday.com/recipes/page/27";

        let parser = find_list_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "fodmap-everyday");

        let drafts = parser.list(&doc, url);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].title.as_deref(), Some("Low FODMAP Chicken Soup"));
    }

    #[test]
    fn karlijns_listing_cards() {
        let doc = doc("karlijns_list");
        let url = "https://www.karlijnskitchen.com/en/recipes/page/2";

        let parser = find_list_parser(&doc, url).unwrap();
        assert_eq!(parser.name(), "karlijns");

        let drafts = parser.list(&doc, url);
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].url.as_deref().unwrap().contains("karlijnskitchen.com"));
    }

    #[test]
    fn registry_order_decides_when_both_formula_templates_match() {
        let html = r#"<html><body>
            <div class="tasty-recipes-entry-header"></div>
            <div class="wprm-recipe"></div>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let parser = find_detail_parser(&doc, "https://www.fodmapformula.com/x/").unwrap();
        assert_eq!(parser.name(), "fodmap-formula-new");
    }

    #[test]
    fn unknown_site_has_no_parser() {
        let doc = Html::parse_document("<html><body><p>hello</p></body></html>");
        assert!(find_detail_parser(&doc, "https://example.com/recipe").is_none());
        assert!(find_list_parser(&doc, "https://example.com/recipes").is_none());
    }

    #[test]
    fn every_parser_degrades_gracefully_on_an_empty_document() {
        let doc = Html::parse_document("<html><body></body></html>");
        for parser in PARSERS {
            let draft = parser.parse(&doc, "https://example.com/empty");
            assert_eq!(draft.title, None, "parser {}", parser.name());
            assert_eq!(draft.servings, 0, "parser {}", parser.name());
            assert!(draft.courses.is_empty(), "parser {}", parser.name());
            assert!(parser.list(&doc, "https://example.com/empty").is_empty());
        }
    }
}

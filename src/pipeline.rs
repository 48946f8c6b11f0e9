//! The two page-level pipelines: fetch → dispatch → extract → validate,
//! classified into a tri-state outcome. Fetch failures surface as `Err`
//! and are the caller's problem (the batch driver logs and moves on);
//! everything after the fetch is an outcome, never an error.

use scraper::Html;
use tracing::debug;

use crate::fetch::{self, FetchError};
use crate::parsers;
use crate::types::{FieldError, ListOutcome, ParsedOutcome};
use crate::validate;

/// Import one detail page.
pub async fn parse_recipe(
    client: &reqwest::Client,
    url: &str,
) -> Result<ParsedOutcome, FetchError> {
    let html = fetch::get(client, url).await?;
    Ok(parse_recipe_html(&html, url))
}

/// The in-memory half of `parse_recipe`, split out so extraction and
/// validation are testable without a network.
pub fn parse_recipe_html(html: &str, url: &str) -> ParsedOutcome {
    let doc = Html::parse_document(html);

    let Some(parser) = parsers::find_detail_parser(&doc, url) else {
        return ParsedOutcome::Error {
            message: "no parser found".into(),
        };
    };
    debug!(parser = parser.name(), url, "parsing detail page");

    let draft = parser.parse(&doc, url);
    match validate::validate_recipe(draft) {
        Ok(recipe) => ParsedOutcome::Success(recipe),
        Err((draft, errors)) => ParsedOutcome::Partial { draft, errors },
    }
}

/// Extract recipe leads from one listing page. A 404 maps to the `Error`
/// outcome instead of a fetch failure: batch pagination routinely walks
/// past the last real page.
pub async fn list_recipes(client: &reqwest::Client, url: &str) -> Result<ListOutcome, FetchError> {
    let html = match fetch::get(client, url).await {
        Ok(html) => html,
        Err(FetchError::NotFound(_)) => {
            return Ok(ListOutcome::Error {
                message: "page not found".into(),
            })
        }
        Err(e) => return Err(e),
    };
    Ok(list_recipes_html(&html, url))
}

pub fn list_recipes_html(html: &str, url: &str) -> ListOutcome {
    let doc = Html::parse_document(html);

    let Some(parser) = parsers::find_list_parser(&doc, url) else {
        return ListOutcome::Error {
            message: "no list parser found".into(),
        };
    };
    debug!(parser = parser.name(), url, "parsing listing page");

    let mut leads = Vec::new();
    let mut errors = Vec::new();
    for (i, draft) in parser.list(&doc, url).into_iter().enumerate() {
        match validate::validate_lead(draft) {
            Ok(lead) => leads.push(lead),
            Err(errs) => errors.extend(errs.into_iter().map(|e| FieldError {
                path: format!("leads.{i}.{}", e.path),
                message: e.message,
            })),
        }
    }

    if errors.is_empty() {
        ListOutcome::Success(leads)
    } else {
        ListOutcome::Partial { leads, errors }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Course;

    /// Minimal fodmap-formula detail page with everything the schema needs.
    const SYNTHETIC_RECIPE: &str = r#"<!DOCTYPE html>
        <html><body>
          <h1 class="entry-title">Weeknight Bake</h1>
          <img src="https://www.fodmapformula.com/photos/bake.jpg" width="800" height="600">
          <div class="tasty-recipes-entry-header">
            <span class="tasty-recipes-total-time">Total Time: 45min</span>
            <span class="yield"><span data-amount="4">4</span></span>
            <span class="tasty-recipes-category">Dinner</span>
          </div>
          <div class="tasty-recipes-ingredients"><ul>
            <li>2 cups flour</li>
            <li>1 egg</li>
          </ul></div>
          <div class="tasty-recipes-instructions"><ol>
            <li>Mix</li>
            <li>Bake</li>
          </ol></div>
        </body></html>"#;

    #[test]
    fn a_complete_page_imports_successfully() {
        let outcome =
            parse_recipe_html(SYNTHETIC_RECIPE, "https://www.fodmapformula.com/weeknight-bake/");

        let ParsedOutcome::Success(recipe) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(recipe.title, "Weeknight Bake");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.time, "45min");
        assert_eq!(recipe.courses, vec![Course::Main]);
        assert_eq!(recipe.ingredient_sets.len(), 1);
        assert_eq!(recipe.ingredient_sets[0].ingredients.len(), 2);
        assert_eq!(recipe.instruction_sets[0].instructions.len(), 2);
        assert_eq!(
            recipe.source_url,
            "https://www.fodmapformula.com/weeknight-bake/"
        );
    }

    #[test]
    fn a_bare_page_on_a_known_site_is_partial_with_field_errors() {
        let html = r#"<html><body><div class="tasty-recipes-entry-header"></div></body></html>"#;
        let outcome = parse_recipe_html(html, "https://www.fodmapformula.com/mystery/");

        let ParsedOutcome::Partial { draft, errors } = outcome else {
            panic!("expected partial, got {outcome:?}");
        };
        assert_eq!(draft.servings, 0);
        assert!(errors.iter().any(|e| e.path == "servings"));
        assert!(errors.iter().any(|e| e.path == "courses"));
        assert!(errors.iter().any(|e| e.path == "title"));
    }

    #[test]
    fn an_unknown_site_is_an_error_outcome() {
        let outcome = parse_recipe_html("<html></html>", "https://example.com/recipe");
        let ParsedOutcome::Error { message } = outcome else {
            panic!("expected error, got {outcome:?}");
        };
        assert_eq!(message, "no parser found");
    }

    #[test]
    fn listing_keeps_valid_leads_when_some_cards_are_broken() {
        let html = std::fs::read_to_string("tests/fixtures/fodmap_formula_list.html").unwrap();
        let outcome = list_recipes_html(
            &html,
            "https://www.fodmapformula.com/category/recipe/dinner/page/1",
        );

        let ListOutcome::Partial { leads, errors } = outcome else {
            panic!("expected partial, got {outcome:?}");
        };
        assert_eq!(leads.len(), 2);
        assert!(errors.iter().any(|e| e.path == "leads.2.url"));
    }

    #[test]
    fn listing_an_unknown_page_is_an_error_outcome() {
        let outcome = list_recipes_html("<html></html>", "https://example.com/archive");
        assert!(matches!(outcome, ListOutcome::Error { .. }));
    }

    #[tokio::test]
    async fn listing_404_is_a_clean_error_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fodmapeveryday.com/recipes/page/99")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/fodmapeveryday.com/recipes/page/99", server.url());
        let outcome = list_recipes(&fetch::client(), &url).await.unwrap();

        let ListOutcome::Error { message } = outcome else {
            panic!("expected error, got {outcome:?}");
        };
        assert_eq!(message, "page not found");
    }

    #[tokio::test]
    async fn listing_5xx_is_a_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fodmapeveryday.com/recipes/page/1")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/fodmapeveryday.com/recipes/page/1", server.url());
        let err = list_recipes(&fetch::client(), &url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
    }
}

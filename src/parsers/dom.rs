//! Selector-level extraction helpers shared by the site parsers. All of
//! them degrade to `None`/empty on a selector miss; none of them raise.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Non-content images to skip when scanning for a recipe photo: icons,
/// social-share badges, site logos.
const IMAGE_SRC_BLOCKLIST: &[&str] = &["svg", "pinterest.", "facebook.", "fb.", "logo"];

/// Date label prefixes some themes prepend to their posting date.
const DATE_LABELS: &[&str] = &["Published", "Updated", "Modified"];

const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Compile a selector literal. Selectors are compile-time constants, so a
/// parse failure is a programming error.
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

pub fn exists(doc: &Html, css: &str) -> bool {
    doc.select(&sel(css)).next().is_some()
}

/// Trimmed text content of an element, with runs of internal whitespace
/// (newlines, tabs) collapsed to single spaces.
pub fn element_text(el: ElementRef) -> String {
    collapse_ws(&el.text().collect::<String>())
}

pub fn collapse_ws(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").to_string()
}

/// Text of the first element matching `css`, or None when the selector
/// misses or the element is empty.
pub fn text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&sel(css))
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Texts of every element matching `css`, empties dropped.
pub fn texts(doc: &Html, css: &str) -> Vec<String> {
    doc.select(&sel(css))
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Inner HTML of every element matching `css`. Used where embedded markup
/// must survive (notes are rendered as raw HTML downstream).
pub fn inner_htmls(doc: &Html, css: &str) -> Vec<String> {
    doc.select(&sel(css))
        .map(|el| el.inner_html().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn attr(doc: &Html, css: &str, name: &str) -> Option<String> {
    doc.select(&sel(css))
        .next()
        .and_then(|el| el.value().attr(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Scoped variants for extracting within one listing card.
pub fn text_in(el: ElementRef, css: &str) -> Option<String> {
    el.select(&sel(css))
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

pub fn texts_in(el: ElementRef, css: &str) -> Vec<String> {
    el.select(&sel(css))
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn attr_in(el: ElementRef, css: &str, name: &str) -> Option<String> {
    el.select(&sel(css))
        .next()
        .and_then(|child| child.value().attr(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Remove label prefixes such as "Total Time:" and re-collapse.
pub fn strip_labels(text: &str, labels: &[&str]) -> String {
    let mut out = text.to_string();
    for label in labels {
        out = out.replace(label, "");
    }
    collapse_ws(&out)
}

/// Best-effort integer: first run of digits, 0 when there is none. 0 is
/// the deliberate invalid sentinel for servings.
pub fn first_int(text: &str) -> u32 {
    INT_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// First plausible content photo on the page: skip blocklisted sources
/// and portrait-shaped images (sidebar icons tend to be narrow).
/// Elements without width/height attributes pass the shape check.
pub fn content_image(doc: &Html) -> Option<String> {
    doc.select(&sel("img")).find_map(|img| {
        let src = img.value().attr("src")?.trim();
        if src.is_empty() {
            return None;
        }
        let lower = src.to_lowercase();
        if IMAGE_SRC_BLOCKLIST.iter().any(|b| lower.contains(b)) {
            return None;
        }
        if dimension(img, "width") < dimension(img, "height") {
            return None;
        }
        Some(src.to_string())
    })
}

fn dimension(img: ElementRef, name: &str) -> u32 {
    img.value()
        .attr(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Open Graph image fallback for sites whose content images are lazy-
/// loaded or hidden behind galleries.
pub fn og_image(doc: &Html) -> Option<String> {
    doc.select(&sel(r#"meta[property="og:image"]"#))
        .next()?
        .value()
        .attr("content")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Posting date from a text node, label prefixes stripped. Invalid or
/// absent date text yields None, never an error.
pub fn posted_date(doc: &Html, css: &str) -> Option<NaiveDate> {
    let raw = text(doc, css)?;
    parse_date(&strip_labels(&raw, DATE_LABELS))
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(collapse_ws("  1 cup\n\t flour  "), "1 cup flour");
    }

    #[test]
    fn strips_labels_then_collapses() {
        assert_eq!(
            strip_labels("Total Time:  1 hour 30 minutes", &["Total Time:"]),
            "1 hour 30 minutes"
        );
    }

    #[test]
    fn first_int_takes_the_first_numeric_token() {
        assert_eq!(first_int("Servings: 4 to 6"), 4);
        assert_eq!(first_int("serves four"), 0);
        assert_eq!(first_int(""), 0);
    }

    #[test]
    fn content_image_skips_blocklist_and_portraits() {
        let doc = Html::parse_document(
            r#"<html><body>
                <img src="/theme/logo.png" width="300" height="100">
                <img src="https://cdn.site/share/pinterest.png" width="40" height="40">
                <img src="/icons/star.svg">
                <img src="/photos/tall-sidebar.jpg" width="200" height="600">
                <img src="/photos/hero.jpg" width="1200" height="800">
            </body></html>"#,
        );
        assert_eq!(content_image(&doc).as_deref(), Some("/photos/hero.jpg"));
    }

    #[test]
    fn content_image_accepts_unsized_images() {
        let doc = Html::parse_document(r#"<img src="/photos/plain.jpg">"#);
        assert_eq!(content_image(&doc).as_deref(), Some("/photos/plain.jpg"));
    }

    #[test]
    fn og_image_reads_the_meta_tag() {
        let doc = Html::parse_document(
            r#"<head><meta property="og:image" content="https://cdn.site/dish.jpg"></head>"#,
        );
        assert_eq!(og_image(&doc).as_deref(), Some("https://cdn.site/dish.jpg"));
    }

    #[test]
    fn parses_long_month_dates_with_labels() {
        let doc = Html::parse_document(
            r#"<span class="entry-date">Published June 3, 2021</span>"#,
        );
        assert_eq!(
            posted_date(&doc, ".entry-date"),
            NaiveDate::from_ymd_opt(2021, 6, 3)
        );
    }

    #[test]
    fn bad_date_text_is_none() {
        assert_eq!(parse_date("last Tuesday"), None);
        assert_eq!(parse_date(""), None);
    }
}

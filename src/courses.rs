use crate::types::Course;

/// Keyword table mapping category fragments to course tags. Matching is
/// substring on the lowercased fragment, and rows overlap on purpose:
/// "brunch" signals both a main and a breakfast, "cake" both a breakfast
/// bake and a dessert.
const COURSE_KEYWORDS: &[(Course, &[&str])] = &[
    (Course::Main, &["main", "dinner", "diner", "lunch", "brunch"]),
    (Course::Breakfast, &["breakfast", "brunch", "bread", "cake"]),
    (Course::Side, &["appetizer", "side", "bread"]),
    (Course::Snack, &["snack", "treat", "candy"]),
    (Course::Dessert, &["dessert", "candy", "cake", "sweet"]),
    (Course::Drink, &["beverage", "drink"]),
    (Course::Other, &["condiment", "basic", "sauce"]),
    (Course::Soup, &["soup"]),
    (Course::Salad, &["salad"]),
];

/// Map a comma-separated category/breadcrumb string to course tags,
/// deduplicated in first-matched order. Heuristic: unmatched fragments
/// contribute nothing, and empty input yields no tags (which downstream
/// validation reports, rather than silently filing under OTHER).
pub fn classify(category_text: &str) -> Vec<Course> {
    let mut tags = Vec::new();
    for fragment in category_text.to_lowercase().split(',') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        for (course, keywords) in COURSE_KEYWORDS {
            if keywords.iter().any(|k| fragment.contains(k)) && !tags.contains(course) {
                tags.push(*course);
            }
        }
    }
    tags
}

// ── Tests ──

use crate::api::{LanguageShare, Repository};
use indexmap::IndexMap;

pub const MAX_LANGUAGES: usize = 10;

/// Share of each primary language in the total size of `repos`, largest first, at most [`MAX_LANGUAGES`] entries.
///
/// Ordering follows the raw size totals, ties keep the order in which languages were first seen.
/// Percentages are rounded to one decimal, so they do not necessarily add up to 100.
pub fn language_distribution(repos: &[Repository]) -> Vec<LanguageShare> {
    let mut totals: IndexMap<&str, u64> = IndexMap::new();
    for repo in repos {
        if let Some(language) = repo.language.as_deref() {
            let total = totals.entry(language).or_insert(0);
            *total = total.saturating_add(repo.size);
        }
    }

    let grand_total = totals.values().fold(0u64, |acc, size| acc.saturating_add(*size));
    let mut totals: Vec<(&str, u64)> = totals.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .take(MAX_LANGUAGES)
        .map(|(language, size)| LanguageShare::new(language.to_string(), rounded_percentage(size, grand_total)))
        .collect()
}

fn rounded_percentage(size: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (size as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Tests

#[cfg(test)]
use crate::fake::repo;

#[test]
fn two_languages_test() {
    let repos = vec![repo("a", Some("Python"), 300), repo("b", Some("JavaScript"), 100)];
    assert_eq!(
        language_distribution(&repos),
        vec![
            LanguageShare::new("Python".to_string(), 75.0),
            LanguageShare::new("JavaScript".to_string(), 25.0)
        ]
    );
}

#[test]
fn accumulates_and_skips_unknown_test() {
    let repos = vec![
        repo("a", Some("Rust"), 100),
        repo("b", None, 5000),
        repo("c", Some("Go"), 150),
        repo("d", Some("Rust"), 100),
    ];
    assert_eq!(
        language_distribution(&repos),
        vec![
            LanguageShare::new("Rust".to_string(), 57.1),
            LanguageShare::new("Go".to_string(), 42.9)
        ]
    );
}

#[test]
fn zero_total_test() {
    let repos = vec![repo("a", Some("C"), 0), repo("b", Some("Zig"), 0)];
    assert_eq!(
        language_distribution(&repos),
        vec![LanguageShare::new("C".to_string(), 0.0), LanguageShare::new("Zig".to_string(), 0.0)]
    );
}

#[test]
fn empty_test() {
    assert!(language_distribution(&[]).is_empty());
}

#[test]
fn top_ten_sorted_test() {
    let repos: Vec<_> = (0..15u64)
        .map(|i| repo(&format!("repo_{}", i), Some(format!("lang_{}", i).as_str()), (i % 7 + 1) * 10))
        .collect();
    let languages = language_distribution(&repos);
    assert_eq!(languages.len(), MAX_LANGUAGES);
    let sizes: Vec<u64> = languages
        .iter()
        .map(|share| repos.iter().find(|r| r.language.as_deref() == Some(share.name.as_str())).unwrap().size)
        .collect();
    assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "not sorted: {:?}", sizes);
    assert_eq!(languages[0].name, "lang_6");
    assert_eq!(languages[1].name, "lang_13");
}

#[test]
fn ties_keep_first_seen_order_test() {
    let repos = vec![
        repo("a", Some("Ruby"), 1),
        repo("b", Some("Perl"), 1),
        repo("c", Some("Lua"), 1),
    ];
    let names: Vec<_> = language_distribution(&repos).into_iter().map(|share| share.name).collect();
    assert_eq!(names, vec!["Ruby", "Perl", "Lua"]);
}

#[test]
fn ties_after_accumulation_keep_first_seen_order_test() {
    let repos = vec![
        repo("a", Some("Haskell"), 10),
        repo("b", Some("OCaml"), 20),
        repo("c", Some("Haskell"), 10),
        repo("d", Some("Elm"), 5),
    ];
    let names: Vec<_> = language_distribution(&repos).into_iter().map(|share| share.name).collect();
    assert_eq!(names, vec!["Haskell", "OCaml", "Elm"]);
}

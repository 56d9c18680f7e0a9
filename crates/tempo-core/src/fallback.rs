//! Deterministic local fallback for the external classifier.
//!
//! When the Gemini call fails for any reason, task names are grouped by a
//! project token extracted with a fixed ordered list of matchers. The result
//! depends only on the input list, so repeated failures produce identical
//! summaries.

use crate::category::{Category, CategorySet};

/// Groups task names by extracted project token.
///
/// Matchers are tried in order for each task:
///
/// 1. bracketed tag: `[ProjA] fix bug` -> `ProjA`
/// 2. colon prefix: `ProjA: weekly sync` -> `ProjA`
/// 3. compound first word: `ProjA-dev` / `ProjA_dev` -> `ProjA`
///
/// Tasks with no extractable token land in the `catch_all` category. Every
/// input task appears in exactly one output category; empty categories are
/// omitted. Category order is first-seen over the input list.
pub fn fallback_categories(tasks: &[String], catch_all: &str) -> CategorySet {
    let mut categories: Vec<Category> = Vec::new();
    let mut leftover: Vec<String> = Vec::new();

    for task in tasks {
        match extract_project_token(task) {
            Some(token) => {
                if let Some(category) = categories.iter_mut().find(|c| c.name == token) {
                    category.tasks.push(task.clone());
                } else {
                    categories.push(Category {
                        name: token,
                        tasks: vec![task.clone()],
                    });
                }
            }
            None => leftover.push(task.clone()),
        }
    }

    if !leftover.is_empty() {
        categories.push(Category {
            name: catch_all.to_string(),
            tasks: leftover,
        });
    }

    CategorySet { categories }
}

/// Extracts a project-name token from a task string, or `None` if the task
/// carries no recognizable project marker.
fn extract_project_token(task: &str) -> Option<String> {
    let task = task.trim();

    // Ordered matchers; the first hit wins.
    if let Some(token) = match_bracketed_tag(task) {
        return Some(token);
    }
    if let Some(token) = match_colon_prefix(task) {
        return Some(token);
    }
    match_compound_first_word(task)
}

/// `[ProjA] fix bug` -> `ProjA`.
fn match_bracketed_tag(task: &str) -> Option<String> {
    let rest = task.strip_prefix('[')?;
    let end = rest.find(']')?;
    let token = rest[..end].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// `ProjA: weekly sync` -> `ProjA`.
///
/// The prefix must be a single word; a colon deep inside a sentence is not a
/// project marker.
fn match_colon_prefix(task: &str) -> Option<String> {
    let (prefix, rest) = task.split_once(':')?;
    let prefix = prefix.trim();
    if prefix.is_empty() || rest.trim().is_empty() || prefix.contains(char::is_whitespace) {
        return None;
    }
    Some(prefix.to_string())
}

/// `ProjA-dev` -> `ProjA` (also `_` as separator).
///
/// Only the first whitespace-delimited word is considered, and both halves
/// around the separator must be non-empty.
fn match_compound_first_word(task: &str) -> Option<String> {
    let first_word = task.split_whitespace().next()?;
    let index = first_word.find(['-', '_'])?;
    let (token, rest) = first_word.split_at(index);
    if token.is_empty() || rest.len() <= 1 {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn groups_tasks_sharing_a_project_token() {
        let input = tasks(&["ProjA-dev", "ProjA-meeting", "ProjB-dev"]);
        let result = fallback_categories(&input, "Other");

        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.categories[0].name, "ProjA");
        assert_eq!(result.categories[0].tasks, vec!["ProjA-dev", "ProjA-meeting"]);
        assert_eq!(result.categories[1].name, "ProjB");
        assert_eq!(result.categories[1].tasks, vec!["ProjB-dev"]);
    }

    #[test]
    fn unmatched_tasks_go_to_the_catch_all() {
        let input = tasks(&["ProjA-dev", "lunch", "errands"]);
        let result = fallback_categories(&input, "Other");

        assert_eq!(result.categories.len(), 2);
        let other = &result.categories[1];
        assert_eq!(other.name, "Other");
        assert_eq!(other.tasks, vec!["lunch", "errands"]);
    }

    #[test]
    fn every_task_appears_exactly_once() {
        let input = tasks(&["[Infra] deploy", "ProjA: sync", "ProjA-dev", "reading"]);
        let result = fallback_categories(&input, "Other");
        assert!(result.covers_exactly(&input));
    }

    #[test]
    fn empty_categories_are_omitted() {
        // Everything matches a token, so no catch-all is emitted.
        let input = tasks(&["ProjA-dev", "ProjB_ops"]);
        let result = fallback_categories(&input, "Other");
        assert!(result.categories.iter().all(|c| !c.tasks.is_empty()));
        assert!(!result.categories.iter().any(|c| c.name == "Other"));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let result = fallback_categories(&[], "Other");
        assert!(result.is_empty());
    }

    #[test]
    fn is_deterministic_for_the_same_input() {
        let input = tasks(&["ProjA-dev", "lunch", "[Infra] patch", "ProjA: sync"]);
        let first = fallback_categories(&input, "Other");
        let second = fallback_categories(&input, "Other");
        assert_eq!(first, second);
    }

    #[test]
    fn bracketed_tag_takes_priority() {
        // Matches the bracket rule, not the hyphen rule.
        assert_eq!(
            extract_project_token("[ProjA] fix-bug"),
            Some("ProjA".to_string())
        );
    }

    #[test]
    fn colon_prefix_must_be_a_single_word() {
        assert_eq!(
            extract_project_token("ProjA: weekly sync"),
            Some("ProjA".to_string())
        );
        assert_eq!(extract_project_token("note to self: buy milk"), None);
    }

    #[test]
    fn compound_word_requires_both_halves() {
        assert_eq!(extract_project_token("ProjA-dev"), Some("ProjA".to_string()));
        assert_eq!(extract_project_token("ProjA_dev"), Some("ProjA".to_string()));
        assert_eq!(extract_project_token("-dev"), None);
        assert_eq!(extract_project_token("dev-"), None);
        assert_eq!(extract_project_token("plain task"), None);
    }

    #[test]
    fn empty_bracket_is_not_a_token() {
        assert_eq!(extract_project_token("[] cleanup"), None);
    }
}

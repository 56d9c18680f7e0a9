//! Typed category definitions shared with the classifier boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named grouping of task names, used only for reporting rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub tasks: Vec<String>,
}

/// An ordered list of categories, matching the classifier wire shape
/// `{"categories":[{"name":...,"tasks":[...]}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorySet {
    pub categories: Vec<Category>,
}

impl CategorySet {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Checks that every task in `tasks` appears exactly once across all
    /// categories, and that no category contains a task outside `tasks`.
    ///
    /// This is the classifier output contract; a set that fails it is
    /// rejected at the boundary and the caller falls back to the local
    /// heuristic.
    pub fn covers_exactly(&self, tasks: &[String]) -> bool {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for category in &self.categories {
            for task in &category.tasks {
                *seen.entry(task.as_str()).or_insert(0) += 1;
            }
        }
        if seen.len() != tasks.len() {
            return false;
        }
        tasks
            .iter()
            .all(|task| seen.get(task.as_str()).copied() == Some(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(categories: &[(&str, &[&str])]) -> CategorySet {
        CategorySet {
            categories: categories
                .iter()
                .map(|(name, tasks)| Category {
                    name: (*name).to_string(),
                    tasks: tasks.iter().map(|t| (*t).to_string()).collect(),
                })
                .collect(),
        }
    }

    fn names(tasks: &[&str]) -> Vec<String> {
        tasks.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{"categories":[{"name":"Dev","tasks":["a","b"]},{"name":"Other","tasks":["c"]}]}"#;
        let parsed: CategorySet = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.categories.len(), 2);
        assert_eq!(parsed.categories[0].name, "Dev");
        assert_eq!(parsed.categories[1].tasks, vec!["c"]);
    }

    #[test]
    fn covers_exactly_accepts_a_partition() {
        let categories = set(&[("Dev", &["a", "b"]), ("Other", &["c"])]);
        assert!(categories.covers_exactly(&names(&["a", "b", "c"])));
    }

    #[test]
    fn covers_exactly_rejects_missing_task() {
        let categories = set(&[("Dev", &["a"])]);
        assert!(!categories.covers_exactly(&names(&["a", "b"])));
    }

    #[test]
    fn covers_exactly_rejects_duplicated_task() {
        let categories = set(&[("Dev", &["a"]), ("Other", &["a", "b"])]);
        assert!(!categories.covers_exactly(&names(&["a", "b"])));
    }

    #[test]
    fn covers_exactly_rejects_unknown_task() {
        let categories = set(&[("Dev", &["a", "mystery"])]);
        assert!(!categories.covers_exactly(&names(&["a"])));
    }

    #[test]
    fn empty_set_covers_empty_input() {
        let categories = CategorySet::default();
        assert!(categories.covers_exactly(&[]));
        assert!(categories.is_empty());
    }
}

use crate::models::Recipe;

/// Filter for the recipe listing.
///
/// An empty `name` is the same as no filter. Matching is a case-sensitive
/// substring test on the recipe name; results are always ordered by
/// descending id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    name: Option<String>,
}

impl RecipeQuery {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match &self.name {
            Some(needle) => recipe.name.contains(needle.as_str()),
            None => true,
        }
    }

    /// SQL `LIKE` pattern for the name filter, with wildcards in the
    /// user's input escaped so they match literally.
    pub fn like_pattern(&self) -> Option<String> {
        self.name.as_ref().map(|needle| {
            let escaped = needle
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
    }
}

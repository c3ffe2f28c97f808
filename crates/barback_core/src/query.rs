use serde::Deserialize;

use crate::recipe::Recipe;

/// Optional filters for listing recipes. Both filters must match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RecipeQuery {
    /// Case-insensitive substring of the name, the ml spec or an ingredient.
    pub q: Option<String>,
    /// Case-insensitive exact tag.
    pub tag: Option<String>,
}

impl RecipeQuery {
    pub fn is_empty(&self) -> bool {
        needle(&self.q).is_none() && needle(&self.tag).is_none()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let text_ok = needle(&self.q).is_none_or(|q| {
            contains_folded(&recipe.name, &q)
                || recipe
                    .spec_ml
                    .as_deref()
                    .is_some_and(|spec| contains_folded(spec, &q))
                || recipe
                    .ingredients
                    .iter()
                    .flatten()
                    .any(|ingredient| contains_folded(&ingredient.item, &q))
        });
        let tag_ok = needle(&self.tag)
            .is_none_or(|tag| recipe.tags.iter().any(|t| t.to_lowercase() == tag));
        text_ok && tag_ok
    }

    /// Filters `recipes`, keeping their order.
    pub fn apply<'a, I>(&self, recipes: I) -> Vec<Recipe>
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        recipes
            .into_iter()
            .filter(|recipe| self.matches(recipe))
            .cloned()
            .collect()
    }
}

fn needle(filter: &Option<String>) -> Option<String> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

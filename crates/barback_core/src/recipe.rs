use barback_logging::barback_debug;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::document::RawRow;
use crate::slug::slugify;
use crate::text::parse_decimal;

/// Spellings under which a row's name may be stored.
const NAME_KEYS: &[&str] = &["name", "Name", "NAME"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub item: String,
    pub ml: Option<f64>,
    pub oz: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub name: String,
    pub slug: String,
    pub glass: Option<String>,
    pub method: Option<String>,
    pub ice: Option<String>,
    pub garnish: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub spec_ml: Option<String>,
    pub spec_oz: Option<String>,
    pub history: Option<String>,
    pub tags: Vec<String>,
    pub abv_est: Option<f64>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub last_update: Option<String>,
    pub image_url: Option<String>,
}

/// The trimmed, non-blank name of a row, if it has one.
pub fn row_name(row: &RawRow) -> Option<&str> {
    NAME_KEYS.iter().find_map(|key| non_blank(row.get(key)))
}

/// Builds a [`Recipe`] from a remapped row, or `None` when the name is blank.
///
/// Malformed optional cells never fail the row: bad ingredient JSON and
/// non-numeric ABV become absent, blank text cells become absent.
pub fn parse_recipe(row: &RawRow) -> Option<Recipe> {
    let name = row_name(row)?;
    let text = |key: &str| non_blank(row.get(key)).map(str::to_string);

    let slug = non_blank(row.get("slug"))
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| slugify(name));

    Some(Recipe {
        name: name.to_string(),
        glass: text("glass"),
        method: text("method"),
        ice: text("ice"),
        garnish: text("garnish"),
        ingredients: row.get("ingredients").and_then(|cell| parse_ingredients(name, cell)),
        spec_ml: text("spec_ml"),
        spec_oz: text("spec_oz"),
        history: text("history"),
        tags: split_tags(row.get("tags").unwrap_or_default()),
        abv_est: row.get("abv_est").and_then(|cell| parse_abv(name, cell)),
        notes: text("notes"),
        source: text("source"),
        last_update: text("last_update"),
        image_url: text("image_url"),
        slug,
    })
}

/// Comma-separated tags, trimmed, blanks dropped, order and duplicates kept.
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a JSON ingredient list. Any malformed entry voids the whole list.
pub fn parse_ingredients(recipe: &str, cell: &str) -> Option<Vec<Ingredient>> {
    let trimmed = cell.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    let parsed: Vec<IngredientCell> = match serde_json::from_str(trimmed) {
        Ok(cells) => cells,
        Err(err) => {
            barback_debug!("Ignoring ingredients of {:?}: {}", recipe, err);
            return None;
        }
    };

    let ingredients: Option<Vec<Ingredient>> =
        parsed.into_iter().map(IngredientCell::validate).collect();
    if ingredients.is_none() {
        barback_debug!("Ignoring ingredients of {:?}: invalid entry", recipe);
    }
    ingredients
}

fn parse_abv(recipe: &str, cell: &str) -> Option<f64> {
    if cell.trim().is_empty() {
        return None;
    }
    let abv = parse_decimal(cell).filter(|value| *value >= 0.0);
    if abv.is_none() {
        barback_debug!("Ignoring abv_est of {:?}: {:?}", recipe, cell);
    }
    abv
}

fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Deserialize)]
struct IngredientCell {
    item: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    ml: Option<f64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    oz: Option<f64>,
}

impl IngredientCell {
    fn validate(self) -> Option<Ingredient> {
        let item = self.item.trim();
        let valid_quantity = |q: Option<f64>| q.is_none_or(|value| value >= 0.0);
        if item.is_empty() || !valid_quantity(self.ml) || !valid_quantity(self.oz) {
            return None;
        }
        Some(Ingredient {
            item: item.to_string(),
            ml: self.ml,
            oz: self.oz,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Number(f64),
    Text(String),
}

/// Accepts a JSON number, a numeric string (decimal comma allowed), or null.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Quantity>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Quantity::Number(value)) => Ok(Some(value)),
        Some(Quantity::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Quantity::Text(text)) => parse_decimal(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("not a quantity: {text:?}"))),
    }
}

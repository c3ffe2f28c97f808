use barback_core::{parse_recipe, RawRow, Recipe, RecipeQuery};

fn recipe(cells: &[(&str, &str)]) -> Recipe {
    let row: RawRow = cells.iter().copied().collect();
    parse_recipe(&row).unwrap()
}

fn sample() -> Vec<Recipe> {
    vec![
        recipe(&[
            ("name", "Gimlet"),
            ("ingredients", r#"[{"item":"Gin","ml":60}]"#),
            ("tags", "Sour, Gin"),
        ]),
        recipe(&[("name", "Daiquiri"), ("spec_ml", "60 rum, 25 lime"), ("tags", "sour")]),
        recipe(&[("name", "Negroni"), ("spec_ml", "30 gin, 30 campari"), ("tags", "bitter")]),
    ]
}

fn names(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn empty_query_keeps_everything_in_order() {
    let query = RecipeQuery::default();
    assert!(query.is_empty());
    let recipes = sample();
    assert_eq!(names(&query.apply(&recipes)), vec!["Gimlet", "Daiquiri", "Negroni"]);
}

#[test]
fn text_query_matches_name_spec_and_ingredients() {
    let recipes = sample();
    let query = RecipeQuery {
        q: Some("GIN".to_string()),
        tag: None,
    };
    assert_eq!(names(&query.apply(&recipes)), vec!["Gimlet", "Negroni"]);

    let query = RecipeQuery {
        q: Some("daiq".to_string()),
        tag: None,
    };
    assert_eq!(names(&query.apply(&recipes)), vec!["Daiquiri"]);
}

#[test]
fn tag_query_is_exact_and_case_insensitive() {
    let recipes = sample();
    let query = RecipeQuery {
        q: None,
        tag: Some("SOUR".to_string()),
    };
    assert_eq!(names(&query.apply(&recipes)), vec!["Gimlet", "Daiquiri"]);

    let query = RecipeQuery {
        q: None,
        tag: Some("sou".to_string()),
    };
    assert!(query.apply(&recipes).is_empty());
}

#[test]
fn filters_combine_and_blank_filters_are_ignored() {
    let recipes = sample();
    let query = RecipeQuery {
        q: Some("gin".to_string()),
        tag: Some("sour".to_string()),
    };
    assert_eq!(names(&query.apply(&recipes)), vec!["Gimlet"]);

    let query = RecipeQuery {
        q: Some("  ".to_string()),
        tag: Some(String::new()),
    };
    assert!(query.is_empty());
    assert_eq!(query.apply(&recipes).len(), 3);
}

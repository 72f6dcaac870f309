//! # View projections
//!
//! Turns an [`AppState`] snapshot into plain data a renderer can draw without
//! knowing anything about queries or stores.
//!
//! | Item | Shown when |
//! |------|-----------|
//! | loading indicator | a fetch is in flight |
//! | "No Recipes Found" | not loading and the list is empty |
//! | recipe cards | the list is non-empty, even while loading more |
//! | page size + "Load More" | loading, or the list is non-empty |
//! | edit button, recipe form | someone is signed in |

use api::{format_publish_date, Category, Recipe, SortOrder};

use crate::app::AppState;

pub const EMPTY_MESSAGE: &str = "No Recipes Found";

/// One card in the recipe list.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    /// `M-D-YYYY`
    pub publish_date: String,
    /// Draw the "UNPUBLISHED" badge
    pub unpublished: bool,
    pub image_url: Option<String>,
    pub editable: bool,
}

impl RecipeCard {
    fn new(recipe: &Recipe, editable: bool) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            category: recipe.category.label(),
            publish_date: format_publish_date(&recipe.publish_date),
            unpublished: !recipe.is_published,
            image_url: recipe.image_url.clone(),
            editable,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecipeListView {
    /// Banner for the signed-in user
    pub greeting: Option<String>,
    pub loading: bool,
    pub empty_message: Option<&'static str>,
    pub cards: Vec<RecipeCard>,
    pub show_pagination: bool,
    pub show_editor: bool,
    /// Id of the recipe loaded into the form, if editing
    pub editing: Option<String>,
    pub upload_progress: Option<u8>,
}

pub fn render(state: &AppState) -> RecipeListView {
    let signed_in = state.user.is_some();
    let has_recipes = !state.recipes.is_empty();

    RecipeListView {
        greeting: state.user.as_ref().map(|user| user.greeting()),
        loading: state.loading,
        empty_message: (!state.loading && !has_recipes).then_some(EMPTY_MESSAGE),
        cards: state
            .recipes
            .iter()
            .map(|recipe| RecipeCard::new(recipe, signed_in))
            .collect(),
        show_pagination: state.loading || has_recipes,
        show_editor: signed_in,
        editing: state.current_recipe.as_ref().map(|r| r.id.clone()),
        upload_progress: state.upload_progress,
    }
}

/// Options for the category select, starting with the empty "all" entry.
pub fn category_options() -> Vec<(&'static str, &'static str)> {
    std::iter::once(("", ""))
        .chain(Category::ALL.iter().map(|c| (c.key(), c.label())))
        .collect()
}

pub fn sort_options() -> Vec<(&'static str, &'static str)> {
    SORT_ORDERS.iter().map(|s| (s.key(), s.label())).collect()
}

const SORT_ORDERS: [SortOrder; 2] = [SortOrder::PublishDateDesc, SortOrder::PublishDateAsc];

/// Category filter for a select value; the empty value and unknown keys mean "all".
pub fn category_from_option(value: &str) -> Option<Category> {
    value.parse().ok()
}

pub fn sort_from_option(value: &str) -> Option<SortOrder> {
    SORT_ORDERS.into_iter().find(|s| s.key() == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{RecipeDraft, UserSession};
    use chrono::{TimeZone, Utc};
    use store::Document;

    fn recipe(id: &str, published: bool) -> Recipe {
        let draft = RecipeDraft {
            name: "Omelette".to_string(),
            category: Category::EggsAndBreakfast,
            directions: "Whisk".to_string(),
            ingredients: vec!["eggs".to_string()],
            publish_date: Utc.with_ymd_and_hms(2022, 12, 31, 10, 0, 0).unwrap(),
            is_published: published,
            image_url: Some("https://img/omelette.png".to_string()),
        };
        Recipe::from_document(&Document::new(id, draft.to_fields())).unwrap()
    }

    #[test]
    fn test_empty_state() {
        let view = render(&AppState::new(3));
        assert_eq!(view.empty_message, Some(EMPTY_MESSAGE));
        assert!(!view.show_pagination);
        assert!(!view.show_editor);
    }

    #[test]
    fn test_loading_hides_empty_message() {
        let mut state = AppState::new(3);
        state.loading = true;
        let view = render(&state);
        assert!(view.loading);
        assert_eq!(view.empty_message, None);
        assert!(view.show_pagination);
    }

    #[test]
    fn test_cards_for_signed_in_user() {
        let mut state = AppState::new(3);
        state.user = Some(UserSession {
            uid: "u".to_string(),
            email: "cook@example.com".to_string(),
            provider: "password".to_string(),
        });
        state.recipes = vec![recipe("a", true), recipe("b", false)];

        let view = render(&state);
        assert_eq!(view.greeting.as_deref(), Some("Welcome, cook@example.com"));
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].category, "Eggs & Breakfast");
        assert_eq!(view.cards[0].publish_date, "12-31-2022");
        assert!(!view.cards[0].unpublished);
        assert!(view.cards[1].unpublished);
        assert!(view.cards.iter().all(|c| c.editable));
    }

    #[test]
    fn test_select_options() {
        let categories = category_options();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0], ("", ""));
        assert_eq!(categories[1], ("breadsSandwichesAndPizza", "Breads, Sandwiches and Pizza"));
        assert_eq!(sort_options()[0].0, "publishDateDesc");
    }

    #[test]
    fn test_option_values_map_back() {
        assert_eq!(category_from_option(""), None);
        assert_eq!(category_from_option("fishAndSeafood"), Some(Category::FishAndSeafood));
        assert_eq!(category_from_option("soups"), None);
        assert_eq!(sort_from_option("publishDateAsc"), Some(SortOrder::PublishDateAsc));
        assert_eq!(sort_from_option("name"), None);
    }
}

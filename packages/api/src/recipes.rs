//! # Recipe queries and the recipe catalog
//!
//! Translates the reader's list state (category filter, sort order, page size,
//! whether they are signed in, and an optional continuation cursor) into a
//! [`QueryDescriptor`] and runs it against a [`DocumentStore`].
//!
//! ## Query rules
//!
//! - A selected category adds exactly one equality filter on `category`.
//! - An anonymous viewer always gets an equality filter `isPublished == true`.
//!   [`RecipeQuery`] keeps the viewer private so callers cannot drop it. This is a
//!   client-side rule only; a deployment with real access control must enforce it
//!   in the store as well.
//! - Ordering is always on `publishDate`; the direction comes from [`SortOrder`].
//! - A cursor is the id of the last recipe of the previous page. It is first
//!   resolved by a point read, and the page then starts strictly after that record.
//!
//! ## Merging pages
//!
//! [`merge_page`] appends a continued page to the displayed list and replaces the
//! list for a fresh query.
//!
//! Store failures propagate unchanged: no retries and no partial results.

use store::{DocumentStore, Filter, QueryDescriptor, StoreError};
use tracing::debug;

use crate::error::Result;
use crate::models::recipe::{FIELD_CATEGORY, FIELD_IS_PUBLISHED, FIELD_PUBLISH_DATE};
use crate::models::{Category, Recipe, RecipeDraft, SortOrder, UserSession};

/// Who is looking at the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Viewer {
    Anonymous,
    SignedIn,
}

/// Reader-facing list state for one page request.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeQuery {
    category: Option<Category>,
    sort: SortOrder,
    page_size: usize,
    viewer: Viewer,
    cursor: Option<String>,
}

impl RecipeQuery {
    /// Query for the given viewer; `None` is an anonymous reader.
    pub fn for_viewer(session: Option<&UserSession>, page_size: usize) -> Self {
        Self {
            category: None,
            sort: SortOrder::default(),
            page_size,
            viewer: match session {
                Some(_) => Viewer::SignedIn,
                None => Viewer::Anonymous,
            },
            cursor: None,
        }
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Continue after the recipe with this id.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn is_continuation(&self) -> bool {
        self.cursor.is_some()
    }

    /// Filters, ordering, and limit. The cursor anchor is attached by
    /// [`RecipeCatalog::fetch`] once it has been resolved.
    pub fn descriptor(&self) -> QueryDescriptor {
        let mut descriptor = QueryDescriptor::new();
        if let Some(category) = self.category {
            descriptor = descriptor.filter(Filter::eq(FIELD_CATEGORY, category.key()));
        }
        if self.viewer == Viewer::Anonymous {
            descriptor = descriptor.filter(Filter::eq(FIELD_IS_PUBLISHED, true));
        }
        descriptor
            .order_by(FIELD_PUBLISH_DATE, self.sort.direction())
            .limit(self.page_size)
    }
}

/// Combine a fetched page with what is already displayed.
pub fn merge_page(existing: Vec<Recipe>, page: Vec<Recipe>, continued: bool) -> Vec<Recipe> {
    if continued {
        let mut merged = existing;
        merged.extend(page);
        merged
    } else {
        page
    }
}

/// Recipe operations over a document store collection.
pub struct RecipeCatalog<S: DocumentStore> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> RecipeCatalog<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fetch one page of recipes.
    pub async fn fetch(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        let mut descriptor = query.descriptor();

        if let Some(cursor) = query.cursor() {
            let anchor = self
                .store
                .read_one(&self.collection, cursor)
                .await?
                .ok_or_else(|| StoreError::not_found(&self.collection, cursor))?;
            descriptor = descriptor.start_after(anchor);
        }

        let docs = self.store.read_many(&self.collection, &descriptor).await?;
        debug!(
            collection = %self.collection,
            cursor = ?query.cursor(),
            returned = docs.len(),
            "fetched recipe page"
        );
        docs.iter().map(Recipe::from_document).collect()
    }

    /// Validate and store a new recipe, returning its id.
    pub async fn create(&self, draft: &RecipeDraft) -> Result<String> {
        draft.validate()?;
        Ok(self.store.create(&self.collection, draft.to_fields()).await?)
    }

    pub async fn update(&self, id: &str, draft: &RecipeDraft) -> Result<()> {
        draft.validate()?;
        Ok(self
            .store
            .update(&self.collection, id, draft.to_fields())
            .await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.store.delete(&self.collection, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::{TimeZone, Utc};
    use store::{Direction, MemoryStore, Value};

    fn session() -> UserSession {
        UserSession {
            uid: "u1".to_string(),
            email: "cook@example.com".to_string(),
            provider: "password".to_string(),
        }
    }

    fn draft(name: &str, day: u32, category: Category, published: bool) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            category,
            directions: "Cook it".to_string(),
            ingredients: vec!["salt".to_string()],
            publish_date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            is_published: published,
            image_url: Some(format!("https://img/{name}.png")),
        }
    }

    fn filter_fields(descriptor: &QueryDescriptor) -> Vec<&str> {
        descriptor.filters.iter().map(|f| f.field.as_str()).collect()
    }

    #[test]
    fn test_category_filter_only_when_set() {
        for category in Category::ALL {
            let descriptor = RecipeQuery::for_viewer(Some(&session()), 3)
                .category(Some(category))
                .descriptor();
            assert_eq!(descriptor.filters, vec![Filter::eq("category", category.key())]);
        }

        let descriptor = RecipeQuery::for_viewer(Some(&session()), 3).descriptor();
        assert!(descriptor.filters.is_empty());
    }

    #[test]
    fn test_anonymous_viewer_always_filters_published() {
        for category in Category::ALL.map(Some).into_iter().chain([None]) {
            for sort in [SortOrder::PublishDateAsc, SortOrder::PublishDateDesc] {
                let descriptor = RecipeQuery::for_viewer(None, 6)
                    .category(category)
                    .sort(sort)
                    .after("cursor")
                    .descriptor();
                assert!(descriptor
                    .filters
                    .contains(&Filter::eq("isPublished", Value::Bool(true))));
            }
        }
        let signed_in = RecipeQuery::for_viewer(Some(&session()), 6).descriptor();
        assert!(!filter_fields(&signed_in).contains(&"isPublished"));
    }

    #[test]
    fn test_sort_is_on_publish_date() {
        let descriptor = RecipeQuery::for_viewer(None, 9)
            .sort(SortOrder::PublishDateAsc)
            .descriptor();
        let order = descriptor.order_by.unwrap();
        assert_eq!(order.field, "publishDate");
        assert_eq!(order.direction, Direction::Ascending);
        assert_eq!(descriptor.limit, Some(9));
    }

    #[test]
    fn test_merge_policy() {
        let recipe = |id: &str| Recipe {
            id: id.to_string(),
            ..Recipe::from_document(&store::Document::new(
                id,
                draft("x", 1, Category::Vegetables, true).to_fields(),
            ))
            .unwrap()
        };
        let existing = vec![recipe("a"), recipe("b")];

        let appended = merge_page(existing.clone(), vec![recipe("c")], true);
        let ids: Vec<_> = appended.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let replaced = merge_page(existing, vec![recipe("c")], false);
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].id, "c");
    }

    #[tokio::test]
    async fn test_roundtrip_through_catalog() {
        let catalog = RecipeCatalog::new(MemoryStore::new(), "recipes");
        let input = draft("Salmon", 7, Category::FishAndSeafood, true);
        let id = catalog.create(&input).await.unwrap();

        let page = catalog
            .fetch(&RecipeQuery::for_viewer(None, 3).category(Some(Category::FishAndSeafood)))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, id);
        assert_eq!(page[0].to_draft(), input);
    }

    #[tokio::test]
    async fn test_sort_orders_results() {
        let catalog = RecipeCatalog::new(MemoryStore::new(), "recipes");
        for (name, day) in [("b", 2), ("c", 3), ("a", 1), ("d", 4)] {
            catalog
                .create(&draft(name, day, Category::Vegetables, true))
                .await
                .unwrap();
        }

        let asc = catalog
            .fetch(&RecipeQuery::for_viewer(None, 10).sort(SortOrder::PublishDateAsc))
            .await
            .unwrap();
        assert!(asc.windows(2).all(|w| w[0].publish_date <= w[1].publish_date));

        let desc = catalog
            .fetch(&RecipeQuery::for_viewer(None, 10).sort(SortOrder::PublishDateDesc))
            .await
            .unwrap();
        assert!(desc.windows(2).all(|w| w[0].publish_date >= w[1].publish_date));
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_not_found() {
        let catalog = RecipeCatalog::new(MemoryStore::new(), "recipes");
        let err = catalog
            .fetch(&RecipeQuery::for_viewer(None, 3).after("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let store = MemoryStore::new();
        let catalog = RecipeCatalog::new(store.clone(), "recipes");
        let mut bad = draft("x", 1, Category::Vegetables, true);
        bad.name = "   ".to_string();
        assert!(matches!(
            catalog.create(&bad).await,
            Err(ApiError::InvalidDraft(_))
        ));
        assert_eq!(store.len("recipes").unwrap(), 0);
    }
}

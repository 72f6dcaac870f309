//! # Recipe model
//!
//! Defines the recipe as the application sees it, and its mapping to and from the
//! schemaless [`store::Document`] representation.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Category`] | The fixed, closed set of recipe categories. Each has a stable key (stored in documents and used in filters) and a human label. |
//! | [`SortOrder`] | The two orderings a reader can pick: newest-first (default) and oldest-first, both on the publish date. |
//! | [`Recipe`] | A decoded, stored recipe including its store-assigned `id`. |
//! | [`RecipeDraft`] | The form payload for create and update, validated before any store call. |
//!
//! ## Stored field names
//!
//! | Field | Value |
//! |-------|-------|
//! | `name` | string |
//! | `category` | category key string |
//! | `directions` | string |
//! | `ingredients` | array of strings |
//! | `publishDate` | timestamp (seconds) |
//! | `isPublished` | bool |
//! | `imageUrl` | string, absent or null when there is no image |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use store::{Direction, Document, Fields, Timestamp, Value};

use crate::error::{ApiError, Result};

pub const FIELD_NAME: &str = "name";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DIRECTIONS: &str = "directions";
pub const FIELD_INGREDIENTS: &str = "ingredients";
pub const FIELD_PUBLISH_DATE: &str = "publishDate";
pub const FIELD_IS_PUBLISHED: &str = "isPublished";
pub const FIELD_IMAGE_URL: &str = "imageUrl";

/// Recipe category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BreadsSandwichesAndPizza,
    EggsAndBreakfast,
    DessertsAndBakedGoods,
    FishAndSeafood,
    Vegetables,
}

impl Category {
    /// Every category, in the order the filter control lists them.
    pub const ALL: [Category; 5] = [
        Category::BreadsSandwichesAndPizza,
        Category::EggsAndBreakfast,
        Category::DessertsAndBakedGoods,
        Category::FishAndSeafood,
        Category::Vegetables,
    ];

    /// Key stored in documents.
    pub fn key(self) -> &'static str {
        match self {
            Category::BreadsSandwichesAndPizza => "breadsSandwichesAndPizza",
            Category::EggsAndBreakfast => "eggsAndBreakfast",
            Category::DessertsAndBakedGoods => "dessertsAndBakedGoods",
            Category::FishAndSeafood => "fishAndSeafood",
            Category::Vegetables => "vegetables",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::BreadsSandwichesAndPizza => "Breads, Sandwiches and Pizza",
            Category::EggsAndBreakfast => "Eggs & Breakfast",
            Category::DessertsAndBakedGoods => "Desserts & Baked Goods",
            Category::FishAndSeafood => "Fish & Seafood",
            Category::Vegetables => "Vegetables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| ApiError::UnknownCategory(s.to_string()))
    }
}

/// Ordering of the recipe list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    PublishDateDesc,
    PublishDateAsc,
}

impl SortOrder {
    pub fn key(self) -> &'static str {
        match self {
            SortOrder::PublishDateDesc => "publishDateDesc",
            SortOrder::PublishDateAsc => "publishDateAsc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::PublishDateDesc => "Publish Date (newest - oldest)",
            SortOrder::PublishDateAsc => "Publish Date (oldest - newest)",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            SortOrder::PublishDateDesc => Direction::Descending,
            SortOrder::PublishDateAsc => Direction::Ascending,
        }
    }
}

/// A stored recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub directions: String,
    pub ingredients: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub is_published: bool,
    pub image_url: Option<String>,
}

impl Recipe {
    /// Decode a raw document. The stored timestamp becomes a `DateTime<Utc>`.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let malformed = |reason: &str| ApiError::Decode {
            id: doc.id.clone(),
            reason: reason.to_string(),
        };

        let name = doc
            .get_str(FIELD_NAME)
            .ok_or_else(|| malformed("missing name"))?
            .to_string();
        let category = doc
            .get_str(FIELD_CATEGORY)
            .ok_or_else(|| malformed("missing category"))?
            .parse::<Category>()
            .map_err(|e| malformed(&e.to_string()))?;
        let publish_date = doc
            .get_timestamp(FIELD_PUBLISH_DATE)
            .and_then(Timestamp::to_datetime)
            .ok_or_else(|| malformed("missing or invalid publishDate"))?;
        let is_published = doc
            .get_bool(FIELD_IS_PUBLISHED)
            .ok_or_else(|| malformed("missing isPublished"))?;
        let directions = doc.get_str(FIELD_DIRECTIONS).unwrap_or_default().to_string();
        let ingredients = doc
            .get_array(FIELD_INGREDIENTS)
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        let image_url = doc
            .get_str(FIELD_IMAGE_URL)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: doc.id.clone(),
            name,
            category,
            directions,
            ingredients,
            publish_date,
            is_published,
            image_url,
        })
    }

    /// Editable fields of this recipe, e.g. to pre-fill an edit form.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            category: self.category,
            directions: self.directions.clone(),
            ingredients: self.ingredients.clone(),
            publish_date: self.publish_date,
            is_published: self.is_published,
            image_url: self.image_url.clone(),
        }
    }
}

/// Recipe form payload for create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub category: Category,
    pub directions: String,
    pub ingredients: Vec<String>,
    pub publish_date: DateTime<Utc>,
    pub is_published: bool,
    pub image_url: Option<String>,
}

impl RecipeDraft {
    /// Check the form before it is sent to the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidDraft("Recipe name is required".to_string()));
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(ApiError::InvalidDraft(
                "Ingredients are missing. Please add ingredients".to_string(),
            ));
        }
        if self.directions.trim().is_empty() {
            return Err(ApiError::InvalidDraft("Directions are required".to_string()));
        }
        if self.image_url.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::InvalidDraft(
                "Missing recipe image. Please add a recipe image".to_string(),
            ));
        }
        Ok(())
    }

    /// Stored representation. Publish dates are stored at second precision.
    pub fn to_fields(&self) -> Fields {
        let ingredients: Vec<Value> = self
            .ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(Value::from)
            .collect();

        Fields::from([
            (FIELD_NAME.to_string(), Value::from(self.name.trim())),
            (FIELD_CATEGORY.to_string(), Value::from(self.category.key())),
            (FIELD_DIRECTIONS.to_string(), Value::from(self.directions.as_str())),
            (FIELD_INGREDIENTS.to_string(), Value::Array(ingredients)),
            (
                FIELD_PUBLISH_DATE.to_string(),
                Value::Timestamp(Timestamp::new(self.publish_date.timestamp(), 0)),
            ),
            (FIELD_IS_PUBLISHED.to_string(), Value::from(self.is_published)),
            (FIELD_IMAGE_URL.to_string(), Value::from(self.image_url.clone())),
        ])
    }
}

/// Format a publish date as `M-D-YYYY` using the UTC calendar date.
pub fn format_publish_date(date: &DateTime<Utc>) -> String {
    format!("{}-{}-{}", date.month(), date.day(), date.year())
}

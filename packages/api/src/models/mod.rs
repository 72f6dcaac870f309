pub mod recipe;
pub mod user;

pub use recipe::{format_publish_date, Category, Recipe, RecipeDraft, SortOrder};
pub use user::UserSession;

//! # Query descriptors and their in-process evaluation
//!
//! A [`QueryDescriptor`] is the structured read-many request: equality filters that
//! are ANDed together, at most one [`OrderBy`], an optional `limit`, and an optional
//! `start_after` anchor document.
//!
//! Pagination is by record reference, not by offset. The caller reads the anchor
//! document first (a point read) and hands the snapshot to the query; results then
//! start strictly after the anchor's position under the active ordering. Positions
//! compare `(order value, id)` so that ties on the order field still continue
//! deterministically.
//!
//! [`QueryDescriptor::evaluate`] is shared by the in-memory and filesystem
//! backends.

use std::cmp::Ordering;

use crate::document::{Document, Value};

/// Equality constraint on a single field.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field)
            .is_some_and(|v| v.total_cmp(&self.value) == Ordering::Equal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort on a single field. Ties are broken by document id in the same direction.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let va = a.get(&self.field).unwrap_or(&Value::Null);
        let vb = b.get(&self.field).unwrap_or(&Value::Null);
        let ord = va.total_cmp(vb).then_with(|| a.id.cmp(&b.id));
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Structured read-many request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryDescriptor {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    /// Snapshot of the last document of the previous page
    pub start_after: Option<Document>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces any previous ordering; only one sort field is active at a time.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy::new(field, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, anchor: Document) -> Self {
        self.start_after = Some(anchor);
        self
    }

    /// Run this query over a set of documents.
    ///
    /// Documents lacking the order field are excluded when an ordering is active.
    /// Without an ordering, documents come back in id order.
    pub fn evaluate<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let by_id = OrderBy::new("", Direction::Ascending);
        let order = match &self.order_by {
            Some(order) => order,
            None => &by_id,
        };

        let mut hits: Vec<&Document> = docs
            .into_iter()
            .filter(|doc| self.filters.iter().all(|f| f.matches(doc)))
            .filter(|doc| self.order_by.is_none() || doc.get(&order.field).is_some())
            .collect();

        hits.sort_by(|a, b| order.compare(a, b));

        if let Some(anchor) = &self.start_after {
            hits.retain(|doc| order.compare(doc, anchor) == Ordering::Greater);
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        hits.into_iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Fields, Timestamp};

    fn doc(id: &str, secs: i64, category: &str) -> Document {
        Document::new(
            id,
            Fields::from([
                ("publishDate".to_string(), Value::Timestamp(Timestamp::new(secs, 0))),
                ("category".to_string(), Value::from(category)),
            ]),
        )
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_filters_are_anded() {
        let docs = vec![doc("a", 1, "fish"), doc("b", 2, "vegetables"), doc("c", 3, "fish")];
        let query = QueryDescriptor::new()
            .filter(Filter::eq("category", "fish"))
            .filter(Filter::eq("publishDate", Timestamp::new(3, 0)));
        assert_eq!(ids(&query.evaluate(&docs)), vec!["c"]);
    }

    #[test]
    fn test_descending_with_limit() {
        let docs = vec![doc("a", 1, "x"), doc("b", 3, "x"), doc("c", 2, "x")];
        let query = QueryDescriptor::new()
            .order_by("publishDate", Direction::Descending)
            .limit(2);
        assert_eq!(ids(&query.evaluate(&docs)), vec!["b", "c"]);
    }

    #[test]
    fn test_start_after_continues_past_anchor() {
        let docs = vec![
            doc("a", 1, "x"),
            doc("b", 2, "x"),
            doc("c", 3, "x"),
            doc("d", 4, "x"),
        ];
        let query = QueryDescriptor::new()
            .order_by("publishDate", Direction::Ascending)
            .limit(2)
            .start_after(docs[1].clone());
        assert_eq!(ids(&query.evaluate(&docs)), vec!["c", "d"]);
    }

    #[test]
    fn test_ties_continue_by_id() {
        let docs = vec![doc("a", 5, "x"), doc("b", 5, "x"), doc("c", 5, "x")];
        let first = QueryDescriptor::new()
            .order_by("publishDate", Direction::Ascending)
            .limit(2);
        let page = first.evaluate(&docs);
        assert_eq!(ids(&page), vec!["a", "b"]);

        let next = first.clone().start_after(page[1].clone());
        assert_eq!(ids(&next.evaluate(&docs)), vec!["c"]);
    }

    #[test]
    fn test_missing_order_field_is_excluded() {
        let mut docs = vec![doc("a", 1, "x")];
        docs.push(Document::new("b", Fields::new()));
        let query = QueryDescriptor::new().order_by("publishDate", Direction::Ascending);
        assert_eq!(ids(&query.evaluate(&docs)), vec!["a"]);
    }
}

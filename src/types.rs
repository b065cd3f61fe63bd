//! Core types for the gallery state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Key into the rating description table.
///
/// Ratings are opaque string keys; `"3"` and `"03"` are different ratings.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(pub String);

impl Rating {
    pub fn new(key: impl Into<String>) -> Self {
        Rating(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rating({:?})", self.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Rating {
    fn from(key: &str) -> Self {
        Rating(key.to_string())
    }
}

impl From<String> for Rating {
    fn from(key: String) -> Self {
        Rating(key)
    }
}

/// A rated media reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub url: String,
    pub rating: Rating,
}

impl Item {
    pub fn new(url: impl Into<String>, rating: impl Into<Rating>) -> Self {
        Self {
            url: url.into(),
            rating: rating.into(),
        }
    }
}

/// Human-readable description for each rating.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingDescriptions(BTreeMap<Rating, String>);

impl RatingDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rating: impl Into<Rating>, description: impl Into<String>) {
        self.0.insert(rating.into(), description.into());
    }

    pub fn get(&self, rating: &Rating) -> Option<&str> {
        self.0.get(rating).map(String::as_str)
    }

    pub fn contains(&self, rating: &Rating) -> bool {
        self.0.contains_key(rating)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rating, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl<R, D> FromIterator<(R, D)> for RatingDescriptions
where
    R: Into<Rating>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (R, D)>>(iter: I) -> Self {
        RatingDescriptions(
            iter.into_iter()
                .map(|(r, d)| (r.into(), d.into()))
                .collect(),
        )
    }
}

/// The whole gallery at a point in time.
///
/// Both parts are reference counted. Cloning a state is cheap and the clone
/// shares both allocations with the original; transitions only copy the part
/// they change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    items: Arc<Vec<Item>>,
    rating_descriptions: Arc<RatingDescriptions>,
}

impl GalleryState {
    pub fn new(items: Vec<Item>, rating_descriptions: RatingDescriptions) -> Self {
        Self {
            items: Arc::new(items),
            rating_descriptions: Arc::new(rating_descriptions),
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn rating_descriptions(&self) -> &RatingDescriptions {
        &self.rating_descriptions
    }

    /// Description of an item's rating, used as alt text when rendering.
    pub fn describe(&self, item: &Item) -> Option<&str> {
        self.rating_descriptions.get(&item.rating)
    }

    /// New state with `item` appended. `self` is left untouched and the
    /// description table is shared.
    pub fn with_item(&self, item: Item) -> Self {
        let mut items = Arc::clone(&self.items);
        Arc::make_mut(&mut items).push(item);
        Self {
            items,
            rating_descriptions: Arc::clone(&self.rating_descriptions),
        }
    }

    /// True if both states share the same item and description allocations.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
            && Arc::ptr_eq(&self.rating_descriptions, &other.rating_descriptions)
    }

    /// True if `other` shares this state's description table allocation.
    pub fn shares_descriptions_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rating_descriptions, &other.rating_descriptions)
    }
}

/// Store statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Dispatches whose transition succeeded.
    pub dispatch_count: u64,
    pub subscriber_count: usize,
    pub watcher_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptions() -> RatingDescriptions {
        [("1", "bad"), ("2", "good")].into_iter().collect()
    }

    #[test]
    fn test_with_item_leaves_original_untouched() {
        let state = GalleryState::new(vec![Item::new("a", "1")], descriptions());
        let next = state.with_item(Item::new("b", "2"));

        assert_eq!(state.items().len(), 1);
        assert_eq!(next.items().len(), 2);
        assert_eq!(next.items()[1], Item::new("b", "2"));
        assert!(next.shares_descriptions_with(&state));
        assert!(!next.ptr_eq(&state));
    }

    #[test]
    fn test_describe() {
        let state = GalleryState::new(vec![], descriptions());
        assert_eq!(state.describe(&Item::new("x", "2")), Some("good"));
        assert_eq!(state.describe(&Item::new("x", "9")), None);
    }

    #[test]
    fn test_ratings_are_opaque_keys() {
        let state = GalleryState::new(vec![], descriptions());
        assert_eq!(state.describe(&Item::new("x", "01")), None);
    }

    #[test]
    fn test_state_json_shape() {
        let state = GalleryState::new(vec![Item::new("a", "1")], descriptions());
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({
                "items": [{"url": "a", "rating": "1"}],
                "ratingDescriptions": {"1": "bad", "2": "good"}
            })
        );
    }
}

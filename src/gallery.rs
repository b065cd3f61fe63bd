//! Gallery wiring: initial state, store construction and form submission.

use crate::actions::{add_item, Action};
use crate::error::{Result, StoreError};
use crate::state::{reduce, reduce_checked};
use crate::store::{Store, StoreConfig};
use crate::types::{GalleryState, Item, RatingDescriptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A store holding a gallery.
pub type GalleryStore = Store<GalleryState, Action>;

/// Image shown in a fresh gallery.
pub const DEFAULT_ITEM_URL: &str = "https://media.giphy.com/media/O3iWjzootMuQw/giphy.gif";

/// Gallery configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    /// Items present before any dispatch.
    pub items: Vec<Item>,

    /// Description for each rating. Fixed for the store's lifetime.
    pub rating_descriptions: RatingDescriptions,

    /// Reject items whose rating has no description.
    pub validate_ratings: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            items: vec![Item::new(DEFAULT_ITEM_URL, "5")],
            rating_descriptions: default_rating_descriptions(),
            validate_ratings: false,
        }
    }
}

/// The five stock rating descriptions.
pub fn default_rating_descriptions() -> RatingDescriptions {
    [
        ("1", "It kinda sucked."),
        ("2", "It was just okay."),
        ("3", "How can a puppy not be cute?"),
        ("4", "Super adorable, made my day."),
        ("5", "AWESOME!"),
    ]
    .into_iter()
    .collect()
}

impl GalleryConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GalleryConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading gallery config");
        Self::from_json(&text)
    }

    /// Check the configuration is usable.
    ///
    /// With `validate_ratings` set, every seed item must have a described
    /// rating.
    pub fn validate(&self) -> Result<()> {
        if self.rating_descriptions.is_empty() {
            return Err(StoreError::InvalidConfig(
                "rating descriptions must not be empty".to_string(),
            ));
        }
        if self.validate_ratings {
            if let Some(item) = self
                .items
                .iter()
                .find(|item| !self.rating_descriptions.contains(&item.rating))
            {
                return Err(StoreError::InvalidConfig(format!(
                    "seed item {} has undescribed rating {}",
                    item.url, item.rating
                )));
            }
        }
        Ok(())
    }

    /// Initial gallery state for this configuration.
    pub fn initial_state(&self) -> GalleryState {
        GalleryState::new(self.items.clone(), self.rating_descriptions.clone())
    }
}

/// Build a gallery store from a configuration.
pub fn create_store(config: &GalleryConfig) -> Result<GalleryStore> {
    create_store_with(config, StoreConfig {
        name: "gallery".to_string(),
        ..Default::default()
    })
}

/// Build a gallery store with a custom store configuration.
pub fn create_store_with(
    config: &GalleryConfig,
    store_config: StoreConfig,
) -> Result<GalleryStore> {
    config.validate()?;
    store_config.validate()?;
    let initial = config.initial_state();
    let store = if config.validate_ratings {
        Store::with_config(initial, reduce_checked, store_config)
    } else {
        Store::with_config(
            initial,
            |state: &GalleryState, action: &Action| Ok(reduce(state, action)),
            store_config,
        )
    };
    Ok(store)
}

/// The two fields of the "add item" form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub url: String,
    pub rating: String,
}

impl ItemForm {
    pub fn new(url: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            rating: rating.into(),
        }
    }

    /// Read both fields into an item and clear them.
    pub fn take_item(&mut self) -> Item {
        Item::new(std::mem::take(&mut self.url), std::mem::take(&mut self.rating))
    }
}

/// Handle a form submission: clear the form and dispatch its item.
///
/// The fields are cleared even if the dispatch fails.
pub fn submit(store: &GalleryStore, form: &mut ItemForm) -> Result<()> {
    let item = form.take_item();
    store.dispatch(add_item(item))
}

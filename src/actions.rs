//! Actions and action creators.
//!
//! Actions are inert values describing a requested change. They decode from
//! JSON as `{"type": "ADD_PUP", "pup": {...}}`; any other `type` decodes to
//! [`Action::Unrecognized`], which every transition treats as a no-op.

use crate::error::Result;
use crate::types::{Item, Rating};
use serde::{Deserialize, Serialize};

/// A requested state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Append an item to the gallery.
    #[serde(rename = "ADD_PUP")]
    AddItem {
        #[serde(rename = "pup")]
        item: Item,
    },

    /// Any action whose kind this store does not know.
    #[serde(other)]
    Unrecognized,
}

impl Action {
    /// Decode an action from JSON.
    ///
    /// `null` and objects without a `type` field decode to
    /// [`Action::Unrecognized`]. A known `type` with a payload of the wrong
    /// shape is an error.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let untagged = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(fields) => !fields.contains_key("type"),
            _ => false,
        };
        if untagged {
            return Ok(Action::Unrecognized);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Encode an action as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build an action appending `item`.
pub fn add_item(item: Item) -> Action {
    Action::AddItem { item }
}

/// Build an action appending an item made from its two fields.
pub fn add_item_from(url: impl Into<String>, rating: impl Into<Rating>) -> Action {
    add_item(Item::new(url, rating))
}

//! Gallery state transitions.

use crate::actions::Action;
use crate::error::{Result, StoreError};
use crate::types::GalleryState;

/// Apply an action to a gallery state.
///
/// Pure: the input state is never modified and the result depends only on
/// the arguments. Unrecognized actions return a state sharing every
/// allocation with the input.
pub fn reduce(state: &GalleryState, action: &Action) -> GalleryState {
    match action {
        Action::AddItem { item } => state.with_item(item.clone()),
        Action::Unrecognized => state.clone(),
    }
}

/// Like [`reduce`], but rejects items whose rating has no description.
pub fn reduce_checked(state: &GalleryState, action: &Action) -> Result<GalleryState> {
    if let Action::AddItem { item } = action {
        if !state.rating_descriptions().contains(&item.rating) {
            return Err(StoreError::UnknownRating(item.rating.clone()));
        }
    }
    Ok(reduce(state, action))
}

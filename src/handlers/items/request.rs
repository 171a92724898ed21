//! Item request DTOs

use serde::Deserialize;

/// Item search query
#[derive(Debug, Deserialize)]
pub struct SearchItemsQuery {
    /// Case-insensitive substring of the item name
    pub q: Option<String>,
}

//! Item response DTOs

use serde::Serialize;

/// A catalog item with its stock across warehouses
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub id: u32,
    pub name: String,
    pub stock: u32,
}

/// Search result
#[derive(Debug, Serialize)]
pub struct ItemsListResponse {
    pub items: Vec<ItemResponse>,
    pub total: usize,
}

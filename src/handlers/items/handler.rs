//! Item handler implementations
//!
//! The catalog is static; stock is looked up in several warehouses
//! concurrently, each lookup annotating the request on its own.

use std::time::{Duration, Instant};

use axum::{
    extract::{Path, Query},
    Json,
};
use futures::future::join_all;

use crate::{
    annotate,
    error::{AppError, AppResult},
    logger::{RequestLog, Value},
};

use super::{
    request::SearchItemsQuery,
    response::{ItemResponse, ItemsListResponse},
};

const CATALOG: &[(u32, &str)] = &[
    (1, "hex key set"),
    (2, "torque wrench"),
    (3, "wire stripper"),
    (4, "socket wrench"),
];

const WAREHOUSES: &[&str] = &["north", "south", "east"];

/// Search the catalog
pub async fn search_items(
    log: RequestLog,
    Query(query): Query<SearchItemsQuery>,
) -> AppResult<Json<ItemsListResponse>> {
    if query.q.as_deref().is_some_and(|q| q.trim().is_empty()) {
        annotate!(log, "query", query.q);
        return Err(AppError::InvalidInput("query must not be blank".to_string()));
    }
    let needle = query.q.as_deref().map(str::to_lowercase);

    let mut items = Vec::new();
    for &(id, name) in CATALOG {
        if needle.as_deref().is_none_or(|n| name.contains(n)) {
            items.push(ItemResponse {
                id,
                name: name.to_string(),
                stock: total_stock(&log, id).await,
            });
        }
    }

    annotate!(log, "query", query.q, "count", items.len());

    let total = items.len();
    Ok(Json(ItemsListResponse { items, total }))
}

/// Get a single item
pub async fn get_item(log: RequestLog, Path(id): Path<u32>) -> AppResult<Json<ItemResponse>> {
    log.set("item_id", id);

    let (id, name) = CATALOG
        .iter()
        .copied()
        .find(|(item_id, _)| *item_id == id)
        .ok_or_else(|| AppError::NotFound(format!("item {}", id)))?;

    Ok(Json(ItemResponse {
        id,
        name: name.to_string(),
        stock: total_stock(&log, id).await,
    }))
}

/// Always fails as if an upstream dependency were down
pub async fn fail(log: RequestLog) -> AppResult<Json<ItemsListResponse>> {
    let err = AppError::Upstream("inventory service unreachable".to_string());
    log.message("inventory lookup failed", [Value::from("error"), Value::error(&err)]);
    Err(err)
}

/// Panics inside the handler
pub async fn explode(log: RequestLog) -> &'static str {
    annotate!(log, "about_to", "panic");
    panic!("item handler panicked on purpose");
}

/// Sum the stock of an item across all warehouses, queried concurrently
async fn total_stock(log: &RequestLog, id: u32) -> u32 {
    let lookups = WAREHOUSES.iter().map(|warehouse| {
        let log = log.clone();
        async move {
            let started = Instant::now();
            let stock = warehouse_stock(warehouse, id).await;
            log.set(format!("{}_ms", warehouse), started.elapsed());
            stock
        }
    });
    join_all(lookups).await.into_iter().sum()
}

async fn warehouse_stock(warehouse: &str, id: u32) -> u32 {
    let delay = (warehouse.len() as u64) * 2 + u64::from(id);
    tokio::time::sleep(Duration::from_millis(delay)).await;
    (id * 7 + warehouse.len() as u32) % 13
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_total_stock_annotates_each_warehouse() {
        let log = RequestLog::new();
        let stock = total_stock(&log, 2).await;
        assert_eq!(stock, (14 + 5) % 13 + (14 + 5) % 13 + (14 + 4) % 13);

        let annotations = log.finalize();
        for warehouse in WAREHOUSES {
            assert!(annotations.contains_key(&format!("{}_ms", warehouse)));
        }
    }

    #[tokio::test]
    async fn test_get_unknown_item_is_not_found() {
        let log = RequestLog::new();
        let result = get_item(log.clone(), Path(99)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(log.finalize().get("item_id"), Some(&Value::Uint(99)));
    }

    #[tokio::test]
    async fn test_blank_query_is_invalid_input() {
        let log = RequestLog::new();
        let query = SearchItemsQuery {
            q: Some("  ".to_string()),
        };
        let result = search_items(log.clone(), Query(query)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(log.finalize().get("query"), Some(&Value::from("  ")));
    }

    #[tokio::test]
    async fn test_fail_annotates_error() {
        let log = RequestLog::new();
        assert!(fail(log.clone()).await.is_err());

        let annotations = log.finalize();
        assert_eq!(
            annotations.get("error"),
            Some(&Value::Error("Upstream error: inventory service unreachable".to_string()))
        );
        assert_eq!(
            annotations.get("msg"),
            Some(&Value::from("inventory lookup failed"))
        );
    }
}

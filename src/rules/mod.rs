//! Integrity rules: the invariant checks evaluated against current
//! persisted state immediately before a mutation commits, plus the
//! composite product search. All checks are check-then-act against the
//! store; concurrent requests are not serialized here (see DESIGN.md).

use std::collections::HashSet;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::category::Category;
use crate::models::order::OrderStatus;
use crate::models::product::Product;
use crate::store::{CategoryStore, ProductStore};

/// Combined result cap for search, applied after union and de-dup.
pub const SEARCH_CAP: usize = 20;

/// No two categories may share a case-insensitive name. Pass the id of
/// the category being renamed so it does not conflict with itself.
pub async fn ensure_category_name_available(
    categories: &dyn CategoryStore,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<(), ApiError> {
    if categories.find_by_name_ci(name, exclude).await?.is_some() {
        let message = if exclude.is_some() {
            "Category name already exists"
        } else {
            "Category already exists"
        };
        return Err(ApiError::conflict(message));
    }
    Ok(())
}

/// A category can only be deleted while no product references it; the
/// rejection reports the exact blocking count.
pub async fn ensure_category_deletable(
    products: &dyn ProductStore,
    category: Uuid,
) -> Result<(), ApiError> {
    let count = products.count_in_category(category).await?;
    if count > 0 {
        return Err(ApiError::conflict(format!(
            "Cannot delete category. {count} product(s) are using this category."
        )));
    }
    Ok(())
}

/// A product's category reference must resolve at create and update
/// time. Returns the category so handlers can embed its summary in the
/// response.
pub async fn ensure_category_exists(
    categories: &dyn CategoryStore,
    id: Uuid,
) -> Result<Category, ApiError> {
    categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::invalid_reference("Invalid category ID"))
}

/// An order status transition may land on any of the four kinds, but
/// nothing else.
pub fn parse_status(raw: Option<&str>) -> Result<OrderStatus, ApiError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| ApiError::validation_failed("Invalid status value"))
}

/// Two-pass product search. Pass 1 matches the query case-insensitively
/// as a substring of product name or description, newest first, capped
/// at [`SEARCH_CAP`]. Pass 2 matches the names of categories and pulls
/// every product in a matching category. The union keeps pass-1 order
/// first, drops duplicate ids (first occurrence wins), and is truncated
/// to [`SEARCH_CAP`] after the union, so direct matches can crowd out
/// category matches.
pub async fn search_products(
    products: &dyn ProductStore,
    categories: &dyn CategoryStore,
    query: &str,
) -> Result<Vec<Product>, ApiError> {
    let needle = query.trim();

    let direct = products.search_text(needle, SEARCH_CAP).await?;

    let needle_lower = needle.to_lowercase();
    let matching_categories: Vec<Uuid> = categories
        .list()
        .await?
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&needle_lower))
        .map(|c| c.id)
        .collect();
    let by_category = if matching_categories.is_empty() {
        Vec::new()
    } else {
        products.list_in_categories(&matching_categories).await?
    };

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for product in direct.into_iter().chain(by_category) {
        if seen.insert(product.id) {
            merged.push(product);
        }
    }
    merged.truncate(SEARCH_CAP);

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::NewCategory;
    use crate::models::product::NewProduct;
    use crate::models::ImageRef;
    use crate::store::memory::MemoryStore;

    fn category(name: &str) -> Category {
        Category::new(NewCategory { name: name.to_string(), description: None, image: None })
    }

    fn product(name: &str, category: Uuid, description: Option<&str>) -> Product {
        Product::new(NewProduct {
            name: name.to_string(),
            category,
            price: 99.99,
            image: ImageRef::One("https://img/item.jpg".to_string()),
            description: description.map(str::to_string),
            in_stock: None,
        })
    }

    #[tokio::test]
    async fn duplicate_names_conflict_case_insensitively() {
        let store = MemoryStore::new();
        let rings = category("Rings");
        CategoryStore::insert(&store, &rings).await.unwrap();

        let err = ensure_category_name_available(&store, "rings", None).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Category already exists");

        // Renaming a category to its own unchanged name succeeds.
        ensure_category_name_available(&store, "RINGS", Some(rings.id)).await.unwrap();

        let earrings = category("Earrings");
        CategoryStore::insert(&store, &earrings).await.unwrap();
        let err = ensure_category_name_available(&store, "Rings", Some(earrings.id))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Category name already exists");
    }

    #[tokio::test]
    async fn delete_guard_reports_the_blocking_count() {
        let store = MemoryStore::new();
        let rings = category("Rings");
        CategoryStore::insert(&store, &rings).await.unwrap();
        ensure_category_deletable(&store, rings.id).await.unwrap();

        ProductStore::insert(&store, &product("Gold Band", rings.id, None)).await.unwrap();
        ProductStore::insert(&store, &product("Silver Band", rings.id, None)).await.unwrap();

        let err = ensure_category_deletable(&store, rings.id).await.unwrap_err();
        assert_eq!(
            err.message(),
            "Cannot delete category. 2 product(s) are using this category."
        );
    }

    #[tokio::test]
    async fn dangling_category_reference_is_rejected() {
        let store = MemoryStore::new();
        let err = ensure_category_exists(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidReference(_)));
        assert_eq!(err.message(), "Invalid category ID");
    }

    #[test]
    fn status_rule_accepts_only_known_kinds() {
        assert_eq!(parse_status(Some("completed")).unwrap(), OrderStatus::Completed);
        assert!(parse_status(Some("shipped")).is_err());
        assert!(parse_status(None).is_err());
    }

    #[tokio::test]
    async fn search_unions_category_matches_without_duplicates() {
        let store = MemoryStore::new();
        let necklaces = category("Necklaces");
        let rings = category("Rings");
        CategoryStore::insert(&store, &necklaces).await.unwrap();
        CategoryStore::insert(&store, &rings).await.unwrap();

        // Name mentions "necklace" AND lives in Necklaces: one id, both passes.
        ProductStore::insert(&store, &product("Pearl Necklace", necklaces.id, None))
            .await
            .unwrap();
        // Only reachable through the category-name pass.
        ProductStore::insert(&store, &product("Golden Strand", necklaces.id, None))
            .await
            .unwrap();
        // Matches neither pass.
        ProductStore::insert(&store, &product("Gold Band", rings.id, None)).await.unwrap();

        let results = search_products(&store, &store, "Necklace").await.unwrap();
        let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Pearl Necklace"));
        assert!(names.contains(&"Golden Strand"));
        assert!(!names.contains(&"Gold Band"));

        let ids: HashSet<Uuid> = results.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), results.len(), "duplicate product ids in search results");
    }

    #[tokio::test]
    async fn search_caps_the_union_at_twenty() {
        let store = MemoryStore::new();
        let necklaces = category("Necklaces");
        CategoryStore::insert(&store, &necklaces).await.unwrap();

        for i in 0..25 {
            ProductStore::insert(&store, &product(&format!("Necklace {i}"), necklaces.id, None))
                .await
                .unwrap();
        }

        let results = search_products(&store, &store, "necklace").await.unwrap();
        assert_eq!(results.len(), SEARCH_CAP);
    }

    #[tokio::test]
    async fn search_matches_descriptions_too() {
        let store = MemoryStore::new();
        let rings = category("Rings");
        CategoryStore::insert(&store, &rings).await.unwrap();
        ProductStore::insert(
            &store,
            &product("Statement Piece", rings.id, Some("Bold emerald gemstone")),
        )
        .await
        .unwrap();

        let results = search_products(&store, &store, "emerald").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Statement Piece");
    }
}

//! # Product Search Shared
//!
//! Shared data structures for the product search system. The central type
//! is [`Product`], the catalog record that flows from the record source
//! through the bulk loader into the search engine and back out of search
//! results.

use serde::{Deserialize, Serialize};

/// A single product record from the catalog.
///
/// Field names match the document fields stored in the search engine, so
/// the same type serializes into bulk-write bodies and deserializes out of
/// search hit `_source` objects. List fields default to empty rather than
/// null when absent, and scalar fields default to their zero values so a
/// sparse `_source` still deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, non-empty within a load batch.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    /// Free-text availability description (e.g. "In Stock").
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub reviews_count: i64,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Catalog prominence rank; lower is more prominent. Search layers
    /// sort ascending on this field.
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub top_review: String,
    #[serde(default)]
    pub delivery: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub root_bs_category: String,
    #[serde(default)]
    pub product_details: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            brand: String::new(),
            description: String::new(),
            availability: String::new(),
            reviews_count: 0,
            categories: Vec::new(),
            rank: 0,
            rating: 0.0,
            manufacturer: String::new(),
            department: String::new(),
            top_review: String::new(),
            delivery: Vec::new(),
            features: Vec::new(),
            ingredients: String::new(),
            is_available: false,
            root_bs_category: String::new(),
            product_details: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_source() {
        let source = serde_json::json!({
            "id": "abc-123",
            "title": "USB-C Cable",
            "rank": 42
        });

        let product: Product = serde_json::from_value(source).unwrap();

        assert_eq!(product.id, "abc-123");
        assert_eq!(product.title, "USB-C Cable");
        assert_eq!(product.rank, 42);
        assert!(product.categories.is_empty());
        assert!(product.delivery.is_empty());
        assert!(product.features.is_empty());
        assert!(!product.is_available);
        assert_eq!(product.rating, 0.0);
    }

    #[test]
    fn test_deserialize_full_source() {
        let source = serde_json::json!({
            "id": "abc-123",
            "title": "Granola Bars",
            "brand": "Acme",
            "description": "Box of 12",
            "availability": "In Stock",
            "reviews_count": 310,
            "categories": ["Grocery", "Snacks"],
            "rank": 7,
            "rating": 4.5,
            "manufacturer": "Acme Foods",
            "department": "grocery",
            "top_review": "Great taste",
            "delivery": ["Ships to Canada"],
            "features": ["Gluten free"],
            "ingredients": "Oats, honey",
            "is_available": true,
            "root_bs_category": "Grocery & Gourmet Food",
            "product_details": "12 x 30g bars"
        });

        let product: Product = serde_json::from_value(source).unwrap();

        assert_eq!(product.categories, vec!["Grocery", "Snacks"]);
        assert_eq!(product.reviews_count, 310);
        assert!(product.is_available);
    }

    #[test]
    fn test_serialize_round_trip_keeps_field_names() {
        let product = Product {
            id: "p1".to_string(),
            product_details: "details".to_string(),
            is_available: true,
            ..Default::default()
        };

        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["id"], "p1");
        assert_eq!(value["product_details"], "details");
        assert_eq!(value["is_available"], true);
        assert!(value["categories"].as_array().unwrap().is_empty());
    }
}

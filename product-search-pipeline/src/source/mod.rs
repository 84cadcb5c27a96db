//! Record source for the ingestion pipeline.
//!
//! Parses the product catalog CSV into typed records. A malformed row is
//! logged and skipped; only a total file-read failure aborts the parse.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::PipelineError;
use product_search_shared::Product;

/// Raw CSV row before field coercion. Every column is optional so sparse
/// rows still deserialize.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    availability: Option<String>,
    #[serde(default)]
    reviews_count: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    top_review: Option<String>,
    #[serde(default)]
    delivery: Option<String>,
    #[serde(default)]
    features: Option<String>,
    #[serde(default)]
    ingredients: Option<String>,
    #[serde(default)]
    is_available: Option<String>,
    #[serde(default)]
    root_bs_category: Option<String>,
    #[serde(default)]
    product_details: Option<String>,
}

impl RawRecord {
    /// Coerce the raw row into a product record, assigning a fresh id.
    fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            title: self.title.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            availability: self.availability.unwrap_or_default(),
            reviews_count: parse_int(self.reviews_count.as_deref()),
            categories: parse_string_list(self.categories.as_deref()),
            rank: parse_int(self.rank.as_deref()),
            rating: parse_float(self.rating.as_deref()),
            manufacturer: self.manufacturer.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            top_review: self.top_review.unwrap_or_default(),
            delivery: parse_string_list(self.delivery.as_deref()),
            features: parse_string_list(self.features.as_deref()),
            ingredients: self.ingredients.unwrap_or_default(),
            is_available: parse_bool(self.is_available.as_deref()),
            root_bs_category: self.root_bs_category.unwrap_or_default(),
            product_details: self.product_details.unwrap_or_default(),
        }
    }
}

/// Parse the catalog file into product records.
///
/// Rows that fail to deserialize are skipped with a warning; the parse
/// only fails when the file itself cannot be read.
pub fn parse_products(path: impl AsRef<Path>) -> Result<Vec<Product>, PipelineError> {
    let path = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            PipelineError::source(format!("Failed to read {}: {}", path.display(), e))
        })?;

    let mut products = Vec::new();
    let mut row_number = 0usize;

    for result in reader.deserialize::<RawRecord>() {
        row_number += 1;
        match result {
            Ok(raw) => products.push(raw.into_product()),
            Err(e) => warn!(row = row_number, error = %e, "Skipping malformed row"),
        }

        if row_number % 1000 == 0 {
            info!(
                rows = row_number,
                products = products.len(),
                "Catalog parsing progress"
            );
        }
    }

    info!(
        products = products.len(),
        rows = row_number,
        "Parsed product records"
    );
    Ok(products)
}

/// Parse an integer cell, defaulting to 0 on blank or garbled values.
fn parse_int(value: Option<&str>) -> i64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Parse a float cell, defaulting to 0.0 on blank or garbled values.
fn parse_float(value: Option<&str>) -> f32 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

/// Parse a boolean cell; accepts true/yes/1 in any case.
fn parse_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("true") | Some("yes") | Some("1")
    )
}

/// Parse a list cell holding a JSON string array. A blank or literal
/// "null" cell becomes empty; a cell that is not valid JSON becomes a
/// one-element list.
fn parse_string_list(value: Option<&str>) -> Vec<String> {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() && v != "null" => v,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(_) => vec![raw.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "title,brand,description,availability,reviews_count,categories,rank,rating,manufacturer,department,top_review,delivery,features,ingredients,is_available,root_bs_category,product_details";

    fn write_catalog(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_full_row() {
        let file = write_catalog(&[
            r#"Granola Bars,Acme,Box of 12,In Stock,310,"[""Grocery"",""Snacks""]",7,4.5,Acme Foods,grocery,Great,"[""Ships to Canada""]","[""Gluten free""]","Oats, honey",true,Grocery,12 bars"#,
        ]);

        let products = parse_products(file.path()).unwrap();

        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert!(!product.id.is_empty());
        assert_eq!(product.title, "Granola Bars");
        assert_eq!(product.categories, vec!["Grocery", "Snacks"]);
        assert_eq!(product.reviews_count, 310);
        assert_eq!(product.rank, 7);
        assert_eq!(product.rating, 4.5);
        assert!(product.is_available);
        assert_eq!(product.ingredients, "Oats, honey");
    }

    #[test]
    fn test_parse_assigns_unique_ids() {
        let file = write_catalog(&[
            "A,,,,,,,,,,,,,,,,",
            "B,,,,,,,,,,,,,,,,",
        ]);

        let products = parse_products(file.path()).unwrap();

        assert_eq!(products.len(), 2);
        assert_ne!(products[0].id, products[1].id);
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "Good Product,,,,,,,,,,,,,,,,").unwrap();
        // Invalid UTF-8 in the title cell makes this row undeserializable.
        file.write_all(b"Bad \xff\xfe Product,,,,,,,,,,,,,,,,\n").unwrap();
        writeln!(file, "Another Good,,,,,,,,,,,,,,,,").unwrap();
        file.flush().unwrap();

        let products = parse_products(file.path()).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Good Product");
        assert_eq!(products[1].title, "Another Good");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = parse_products("/nonexistent/catalog.csv");
        assert!(matches!(result, Err(PipelineError::SourceError(_))));
    }

    #[test]
    fn test_parse_int_defaults() {
        assert_eq!(parse_int(None), 0);
        assert_eq!(parse_int(Some("")), 0);
        assert_eq!(parse_int(Some("not a number")), 0);
        assert_eq!(parse_int(Some("42")), 42);
        assert_eq!(parse_int(Some(" 17 ")), 17);
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some("TRUE")));
        assert!(parse_bool(Some("yes")));
        assert!(parse_bool(Some("1")));
        assert!(!parse_bool(Some("false")));
        assert!(!parse_bool(Some("0")));
        assert!(!parse_bool(Some("")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_parse_string_list_fallbacks() {
        assert_eq!(
            parse_string_list(Some(r#"["a","b"]"#)),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            parse_string_list(Some("Free shipping")),
            vec!["Free shipping".to_string()]
        );
        assert!(parse_string_list(Some("null")).is_empty());
        assert!(parse_string_list(Some("")).is_empty());
        assert!(parse_string_list(None).is_empty());
    }
}

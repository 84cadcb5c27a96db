//! Layered query cascade builder.
//!
//! This module builds the ordered sequence of progressively looser search
//! queries that together form one multi-search submission. Construction is
//! pure: no I/O, deterministic output for a given term.
//!
//! Layer 1 is a phrase match over the high-precision fields; layers 2-4
//! widen to all searchable fields with increasing fuzziness. Every layer
//! after the first excludes the positive match clauses of all stricter
//! layers before it, so a document can only satisfy the loosest layer it
//! genuinely belongs to. The exclusion chain is built from the ordered
//! clause list, so adding a layer keeps the property intact.

use serde_json::{json, Value};

/// Fields searched by the term layers.
pub const SEARCHABLE_FIELDS: [&str; 5] = [
    "title",
    "brand",
    "description",
    "categories",
    "product_details",
];

/// Fields searched by the precision phrase layer.
pub const PHRASE_FIELDS: [&str; 3] = ["title", "brand", "categories"];

/// Page size applied when the requested size is out of range.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// One layer of the cascade: a multi-search header/body pair.
#[derive(Debug, Clone)]
pub struct LayerRequest {
    /// The index-selector line (`{"index": <name>}`).
    pub header: Value,
    /// The complete query body, carrying its own `size` and sort order.
    pub body: Value,
}

/// Collapse an out-of-range page size to the default.
///
/// Sizes in `1..=100` pass through unchanged; everything else becomes 20.
pub fn coerce_page_size(requested: usize) -> usize {
    if requested == 0 || requested > MAX_PAGE_SIZE {
        DEFAULT_PAGE_SIZE
    } else {
        requested
    }
}

/// Build the four-layer cascade for one search term.
///
/// Each layer carries the caller's page size as its own independent result
/// limit and sorts ascending by rank. The cascade intentionally
/// over-fetches; the executor's merge deduplicates across layers.
pub fn build_cascade(index: &str, term: &str, page_size: usize) -> Vec<LayerRequest> {
    let clauses = layer_clauses(term);

    clauses
        .iter()
        .enumerate()
        .map(|(position, clause)| LayerRequest {
            header: json!({ "index": index }),
            body: layer_body(clause.clone(), &clauses[..position], page_size),
        })
        .collect()
}

/// Flatten the cascade into the newline-delimited line sequence of one
/// multi-search submission: header, body, header, body, ...
pub fn to_request_lines(layers: Vec<LayerRequest>) -> Vec<Value> {
    let mut lines = Vec::with_capacity(layers.len() * 2);
    for layer in layers {
        lines.push(layer.header);
        lines.push(layer.body);
    }
    lines
}

/// The ordered positive match clauses, strictest first.
fn layer_clauses(term: &str) -> Vec<Value> {
    vec![
        phrase_clause(term),
        term_clause(term, 0),
        term_clause(term, 1),
        term_clause(term, 2),
    ]
}

/// Phrase match over the precision fields, tolerating small reorderings.
fn phrase_clause(term: &str) -> Value {
    json!({
        "multi_match": {
            "query": term,
            "fields": PHRASE_FIELDS,
            "type": "phrase",
            "slop": 2
        }
    })
}

/// Term match over all searchable fields with the given edit distance.
fn term_clause(term: &str, fuzziness: u8) -> Value {
    json!({
        "multi_match": {
            "query": term,
            "fields": SEARCHABLE_FIELDS,
            "fuzziness": fuzziness
        }
    })
}

/// Wrap a positive clause and its exclusions into a complete query body.
///
/// The first layer carries no `must_not` key at all; later layers exclude
/// exactly the clauses handed to them.
fn layer_body(must: Value, exclusions: &[Value], page_size: usize) -> Value {
    let mut bool_query = serde_json::Map::new();
    bool_query.insert("must".to_string(), must);
    if !exclusions.is_empty() {
        bool_query.insert("must_not".to_string(), Value::Array(exclusions.to_vec()));
    }

    json!({
        "query": { "bool": bool_query },
        "sort": [ { "rank": "asc" } ],
        "size": page_size
    })
}

//! Known layouts of the antiSMASH results JSON.
//!
//! Each layout is a `(matcher, extractor)` pair. Variants are tried in
//! table order and the first matcher that accepts the document decides how
//! it is read; there is no probing of individual fields across variants.

use crate::error::ParseError;
use serde::Deserialize;
use serde_json::Value;

/// A region as described by the results JSON, before joining with the
/// visualiser data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    /// antiSMASH anchor, `r<record>c<region>`, both 1-based.
    pub anchor: String,
    pub record_name: String,
    pub start: u64,
    pub end: u64,
    pub products: Vec<String>,
}

/// One supported layout of the results file.
pub struct SchemaVariant {
    pub name: &'static str,
    pub matches: fn(&Value) -> bool,
    pub extract: fn(&Value) -> Result<Vec<Area>, serde_json::Error>,
}

/// Supported layouts, most recent first.
pub const SCHEMA_VARIANTS: &[SchemaVariant] = &[
    SchemaVariant {
        name: "antismash-json-v2-v3",
        matches: matches_current,
        extract: extract_current,
    },
    SchemaVariant {
        name: "antismash-json-legacy",
        matches: matches_legacy,
        extract: extract_legacy,
    },
];

/// Schema version declared by the document, 0 when absent.
///
/// Whole-number floats such as `2.0` count as integers. Any other value
/// yields `None` and matches no variant.
pub fn schema_version(doc: &Value) -> Option<i64> {
    match doc.get("schema") {
        None | Some(Value::Null) => Some(0),
        Some(value) => value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
        }),
    }
}

fn declared_schema(doc: &Value) -> String {
    doc.get("schema")
        .map(Value::to_string)
        .unwrap_or_else(|| "none".to_string())
}

/// Read every area of a results document using the first matching variant.
pub fn extract_areas(doc: &Value) -> Result<Vec<Area>, ParseError> {
    let variant = SCHEMA_VARIANTS
        .iter()
        .find(|variant| (variant.matches)(doc))
        .ok_or_else(|| ParseError::IncompatibleSchema(declared_schema(doc)))?;

    (variant.extract)(doc).map_err(|source| ParseError::Layout {
        variant: variant.name,
        source,
    })
}

fn anchor(record_index: usize, area_index: usize) -> String {
    format!("r{}c{}", record_index + 1, area_index + 1)
}

#[derive(Deserialize)]
struct CurrentResults {
    records: Vec<CurrentRecord>,
}

#[derive(Deserialize)]
struct CurrentRecord {
    id: String,
    #[serde(default)]
    areas: Vec<CurrentArea>,
}

#[derive(Deserialize)]
struct CurrentArea {
    start: u64,
    end: u64,
    #[serde(default)]
    products: Vec<String>,
}

fn matches_current(doc: &Value) -> bool {
    schema_version(doc).map_or(false, |v| (2..=3).contains(&v))
}

fn extract_current(doc: &Value) -> Result<Vec<Area>, serde_json::Error> {
    let results = CurrentResults::deserialize(doc)?;

    let mut areas = Vec::new();
    for (r_index, record) in results.records.into_iter().enumerate() {
        for (c_index, area) in record.areas.into_iter().enumerate() {
            areas.push(Area {
                anchor: anchor(r_index, c_index),
                record_name: record.id.clone(),
                start: area.start,
                end: area.end,
                products: area.products,
            });
        }
    }
    Ok(areas)
}

#[derive(Deserialize)]
struct LegacyResults {
    records: Vec<LegacyRecord>,
}

#[derive(Deserialize)]
struct LegacyRecord {
    #[serde(alias = "name")]
    id: String,
    #[serde(default)]
    regions: Vec<LegacyRegion>,
}

#[derive(Deserialize)]
struct LegacyRegion {
    start: u64,
    end: u64,
    #[serde(default)]
    products: Option<Vec<String>>,
    #[serde(default)]
    product: Option<String>,
}

impl LegacyRegion {
    fn into_products(self) -> Vec<String> {
        match (self.products, self.product) {
            (Some(products), _) => products,
            (None, Some(product)) => vec![product],
            (None, None) => Vec::new(),
        }
    }
}

fn matches_legacy(doc: &Value) -> bool {
    schema_version(doc).map_or(false, |v| v <= 1)
        && doc
            .get("records")
            .and_then(Value::as_array)
            .map(|records| records.iter().all(|r| r.get("areas").is_none()))
            .unwrap_or(false)
}

fn extract_legacy(doc: &Value) -> Result<Vec<Area>, serde_json::Error> {
    let results = LegacyResults::deserialize(doc)?;

    let mut areas = Vec::new();
    for (r_index, record) in results.records.into_iter().enumerate() {
        for (c_index, region) in record.regions.into_iter().enumerate() {
            let (start, end) = (region.start, region.end);
            areas.push(Area {
                anchor: anchor(r_index, c_index),
                record_name: record.id.clone(),
                start,
                end,
                products: region.into_products(),
            });
        }
    }
    Ok(areas)
}

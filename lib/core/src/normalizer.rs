//! Catalog normalization
//!
//! Turns a [`RawCatalog`] into typed [`Product`] records. Normalization never
//! fails: rows without identity are dropped and recorded in a [`LoadReport`],
//! missing columns fall back to defaults, and unparsable prices become zero.

use crate::product::{Product, ProductId, RawCatalog, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_TOKEN};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Product attributes the normalizer knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Category,
    Brand,
    SkinToneTag,
    Description,
    Price,
    ImageUrl,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::Category,
        Column::Brand,
        Column::SkinToneTag,
        Column::Description,
        Column::Price,
        Column::ImageUrl,
    ];

    /// Canonical header name
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Category => "category",
            Column::Brand => "brand",
            Column::SkinToneTag => "skin_tone_tag",
            Column::Description => "description",
            Column::Price => "price",
            Column::ImageUrl => "image_url",
        }
    }

    /// Header names accepted for this column, lowercase
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Id => &["id"],
            Column::Name => &["name", "nome"],
            Column::Category => &["category", "categoria"],
            Column::Brand => &["brand", "marca"],
            Column::SkinToneTag => &["skin_tone_tag", "tom_de_pele", "tom_pele"],
            Column::Description => &["description", "descricao", "descrição"],
            Column::Price => &["price", "preco", "preço"],
            Column::ImageUrl => &["image_url", "imagem", "image"],
        }
    }
}

/// Why a catalog row was left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// Neither an id nor a name
    MissingIdentity,
    /// The id column exists but this row has no id
    MissingId,
    UnparsableId { value: String },
    NegativeId { value: String },
    DuplicateId { id: ProductId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: RejectReason,
}

/// Summary of what normalization kept, dropped and synthesized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub rejections: Vec<RowRejection>,
    pub ids_synthesized: bool,
    pub placeholder_corpus: bool,
    pub missing_columns: Vec<String>,
}

impl LoadReport {
    pub fn products_loaded(&self) -> usize {
        self.rows_read - self.rows_rejected
    }

    fn reject(&mut self, row: usize, reason: RejectReason) {
        debug!("Rejecting catalog row {}: {:?}", row, reason);
        self.rows_rejected += 1;
        self.rejections.push(RowRejection { row, reason });
    }
}

/// Normalizer output
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub products: Vec<Product>,
    pub report: LoadReport,
}

/// Header position of each known column
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    positions: [Option<usize>; 8],
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut positions = [None; 8];
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = normalized
                .iter()
                .position(|h| column.aliases().contains(&h.as_str()));
        }
        Self { positions }
    }

    fn position(&self, column: Column) -> Option<usize> {
        let slot = Column::ALL.iter().position(|c| *c == column)?;
        self.positions[slot]
    }

    fn get<'a>(&self, row: &'a [Option<String>], column: Column) -> Option<&'a str> {
        self.position(column)
            .and_then(|pos| row.get(pos))
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn text(&self, row: &[Option<String>], column: Column) -> String {
        self.get(row, column).unwrap_or_default().to_string()
    }
}

/// Largest integer an `f64` holds exactly (2^53)
const MAX_EXACT_FLOAT_ID: f64 = 9_007_199_254_740_992.0;

/// Parse an id cell. Integral decimals such as `"7.0"` are accepted up to 2^53.
pub fn parse_id(value: &str) -> Result<ProductId, RejectReason> {
    let value = value.trim();
    if let Ok(id) = value.parse::<u64>() {
        return Ok(id);
    }
    let negative = || RejectReason::NegativeId {
        value: value.to_string(),
    };
    if value.parse::<i64>().is_ok() {
        return Err(negative());
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f < 0.0 => Err(negative()),
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f <= MAX_EXACT_FLOAT_ID => Ok(f as u64),
        _ => Err(RejectReason::UnparsableId {
            value: value.to_string(),
        }),
    }
}

/// Parse a price cell; anything unusable becomes `0.0`.
///
/// A decimal comma is accepted when the value has no dot.
pub fn parse_price(value: Option<&str>) -> f64 {
    let Some(value) = value.map(str::trim) else {
        return 0.0;
    };
    let parsed = value.parse::<f64>().ok().or_else(|| {
        if value.contains(',') && !value.contains('.') {
            value.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    });
    match parsed {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => 0.0,
    }
}

/// Normalize raw catalog rows into products, in row order
pub fn normalize(raw: &RawCatalog) -> Normalized {
    let columns = ColumnMap::resolve(&raw.headers);
    let mut report = LoadReport {
        rows_read: raw.rows.len(),
        ..LoadReport::default()
    };

    report.missing_columns = Column::ALL
        .iter()
        .filter(|c| columns.position(**c).is_none())
        .map(|c| c.as_str().to_string())
        .collect();
    if !report.missing_columns.is_empty() {
        debug!("Catalog is missing columns {:?}; using defaults", report.missing_columns);
    }

    let synthesize_ids = columns.position(Column::Id).is_none();
    report.ids_synthesized = synthesize_ids;

    let mut products = Vec::with_capacity(raw.rows.len());
    let mut seen_ids: AHashSet<ProductId> = AHashSet::with_capacity(raw.rows.len());

    for (idx, row) in raw.rows.iter().enumerate() {
        let row_number = idx + 1;
        let id_cell = columns.get(row, Column::Id);
        let name_cell = columns.get(row, Column::Name);

        if id_cell.is_none() && name_cell.is_none() {
            report.reject(row_number, RejectReason::MissingIdentity);
            continue;
        }

        let id = if synthesize_ids {
            products.len() as ProductId + 1
        } else {
            let Some(cell) = id_cell else {
                report.reject(row_number, RejectReason::MissingId);
                continue;
            };
            match parse_id(cell) {
                Ok(id) => id,
                Err(reason) => {
                    report.reject(row_number, reason);
                    continue;
                }
            }
        };

        if !seen_ids.insert(id) {
            report.reject(row_number, RejectReason::DuplicateId { id });
            continue;
        }

        let mut product = Product {
            id,
            name: name_cell.unwrap_or_default().to_string(),
            category: columns.text(row, Column::Category),
            brand: columns.text(row, Column::Brand),
            skin_tone_tag: columns.text(row, Column::SkinToneTag),
            description: columns.text(row, Column::Description),
            price: parse_price(columns.get(row, Column::Price)),
            image_url: columns
                .get(row, Column::ImageUrl)
                .unwrap_or(PLACEHOLDER_IMAGE_URL)
                .to_string(),
            composite_text: String::new(),
        };
        product.composite_text = product.build_composite_text();
        products.push(product);
    }

    if !products.is_empty() && products.iter().all(|p| p.composite_text.trim().is_empty()) {
        warn!(
            "All {} products have empty text; substituting '{}' as composite text",
            products.len(),
            PLACEHOLDER_TOKEN
        );
        for product in &mut products {
            product.composite_text = PLACEHOLDER_TOKEN.to_string();
        }
        report.placeholder_corpus = true;
    }

    if report.rows_rejected > 0 {
        warn!(
            "Dropped {} of {} catalog rows",
            report.rows_rejected, report.rows_read
        );
    }
    info!("Normalized {} products", report.products_loaded());

    Normalized { products, report }
}

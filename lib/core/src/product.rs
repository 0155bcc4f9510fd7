use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog-wide product identity
pub type ProductId = u64;

/// Image used when the catalog row has no `image_url`
pub const PLACEHOLDER_IMAGE_URL: &str = "/static/img/placeholder.png";

/// Composite text substituted for every product when the whole corpus is empty
pub const PLACEHOLDER_TOKEN: &str = "placeholder";

/// A normalized catalog record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub skin_tone_tag: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    pub image_url: String,
    /// Text the vectorizer sees: name, description, category, brand
    pub composite_text: String,
}

impl Product {
    /// Create a product with only identity and name set; other fields take defaults
    #[inline]
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        let mut product = Self {
            id,
            name: name.into(),
            category: String::new(),
            brand: String::new(),
            skin_tone_tag: String::new(),
            description: String::new(),
            price: 0.0,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            composite_text: String::new(),
        };
        product.composite_text = product.build_composite_text();
        product
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.composite_text = self.build_composite_text();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self.composite_text = self.build_composite_text();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self.composite_text = self.build_composite_text();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = if price.is_finite() && price > 0.0 { price } else { 0.0 };
        self
    }

    /// Join name, description, category and brand with single spaces.
    ///
    /// Empty fields still contribute their separator, so the result may carry
    /// leading or doubled spaces; tokenization ignores them.
    pub fn build_composite_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name, self.description, self.category, self.brand
        )
    }
}

/// Catalog rows as read from the source, before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    pub headers: Vec<String>,
    /// One cell per header; blank cells are `None`
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawCatalog {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row; blank cells become `None` and short rows are padded
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .map(|cell| {
                cell.map(Into::into)
                    .filter(|s: &String| !s.trim().is_empty())
            })
            .collect();
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Build from JSON objects; headers are collected in first-seen order.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified, and
    /// nulls count as missing.
    pub fn from_json_records(records: &[Value]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            if let Some(obj) = record.as_object() {
                for key in obj.keys() {
                    if !headers.iter().any(|h| h == key) {
                        headers.push(key.clone());
                    }
                }
            }
        }

        let mut catalog = Self::new(headers);
        for record in records {
            let cells: Vec<Option<String>> = catalog
                .headers
                .iter()
                .map(|h| match record.get(h) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            catalog.push_row(cells);
        }
        catalog
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_composite_text_order() {
        let product = Product::new(1, "Batom")
            .with_description("matte")
            .with_category("labios")
            .with_brand("Acme");
        assert_eq!(product.composite_text, "Batom matte labios Acme");
    }

    #[test]
    fn test_negative_price_clamped() {
        let product = Product::new(1, "Base").with_price(-3.0);
        assert_eq!(product.price, 0.0);
        let product = Product::new(1, "Base").with_price(f64::NAN);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_from_json_records() {
        let raw = RawCatalog::from_json_records(&[
            json!({"id": 1, "name": "red lipstick"}),
            json!({"id": 2, "price": "9.9", "name": null}),
        ]);
        assert_eq!(raw.headers, vec!["id", "name", "price"]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows[0], vec![Some("1".to_string()), Some("red lipstick".to_string()), None]);
        assert_eq!(raw.rows[1], vec![Some("2".to_string()), None, Some("9.9".to_string())]);
    }

    #[test]
    fn test_push_row_blank_and_padding() {
        let mut raw = RawCatalog::new(vec!["id".into(), "name".into(), "brand".into()]);
        raw.push_row([Some("1"), Some("   ")]);
        assert_eq!(raw.rows[0], vec![Some("1".to_string()), None, None]);
    }
}

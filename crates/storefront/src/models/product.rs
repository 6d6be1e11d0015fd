//! Catalog domain types.

use serde::{Deserialize, Serialize};

use drip_bloom_core::{Price, ProductId};

/// A product from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price as a decimal string.
    pub price: Price,
    /// Category slug.
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Sizes the product can be ordered in.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Whether the product is currently available.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl Product {
    /// Whether `size` is one of this product's sizes.
    ///
    /// Products without a size list are one-size and accept any size label.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.is_empty() || self.sizes.iter().any(|s| s == size)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults() {
        let product: Product = serde_json::from_str(
            r#"{"id":"prod-9","name":"Plain","description":"","price":10,"category":null}"#,
        )
        .expect("deserialize");

        assert!(product.available);
        assert!(product.images.is_empty());
        assert!(product.offers_size("anything"));
        assert_eq!(product.price.to_string(), "10");
    }

    #[test]
    fn test_offers_size() {
        let product: Product = serde_json::from_str(
            r#"{"id":"prod-1","name":"Ring","description":"","price":"45.00","category":"rings","sizes":["S","M"]}"#,
        )
        .expect("deserialize");

        assert!(product.offers_size("M"));
        assert!(!product.offers_size("XL"));
    }
}

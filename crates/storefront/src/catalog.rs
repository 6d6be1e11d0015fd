//! Static product catalog.
//!
//! The catalog is read once at startup and shared read-only for the life
//! of the process. Cart and favorite reads resolve product IDs against it;
//! rows whose product is no longer listed are dropped from read results.
//!
//! # Format
//!
//! ```json
//! {
//!   "categories": [{ "id": "cat-rings", "name": "Rings", "slug": "rings" }],
//!   "products": [{
//!     "id": "prod-1", "name": "Crystal Clear Ring", "description": "...",
//!     "price": "45.00", "category": "rings",
//!     "images": ["https://..."], "sizes": ["S", "M"], "available": true
//!   }]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use drip_bloom_core::ProductId;

use crate::models::{Category, Product};

/// Catalog compiled into the binary, used when no path is configured.
pub const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog document is not valid JSON or has the wrong shape.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Two categories share an ID.
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Immutable product catalog, cheaply cloneable via `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    categories: Vec<Category>,
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Load the catalog bundled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled document is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid or contains duplicate IDs.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_parts(document.categories, document.products)
    }

    /// Build a catalog from already-parsed categories and products.
    ///
    /// # Errors
    ///
    /// Returns an error if product or category IDs are not unique.
    pub fn from_parts(
        categories: Vec<Category>,
        products: Vec<Product>,
    ) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }

            if let Some(slug) = &product.category
                && !categories.iter().any(|c| &c.slug == slug)
            {
                tracing::warn!(
                    product_id = %product.id,
                    category = %slug,
                    "Product references an unknown category"
                );
            }
        }

        Ok(Self {
            inner: Arc::new(CatalogInner {
                categories,
                products,
                index,
            }),
        })
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.inner.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.inner
            .index
            .get(id)
            .and_then(|&position| self.inner.products.get(position))
    }

    /// Products in the category with the given slug.
    pub fn products_in_category<'a>(
        &'a self,
        slug: &'a str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.inner
            .products
            .iter()
            .filter(move |product| product.category.as_deref() == Some(slug))
    }

    /// All categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.inner.categories
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().expect("bundled catalog is valid");
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.categories().len(), 3);

        let ring = catalog
            .product(&ProductId::from("prod-1"))
            .expect("prod-1 exists");
        assert_eq!(ring.name, "Crystal Clear Ring");
        assert_eq!(ring.price.to_string(), "45.00");
    }

    #[test]
    fn test_missing_product_is_none() {
        let catalog = Catalog::bundled().expect("bundled catalog is valid");
        assert!(catalog.product(&ProductId::from("prod-404")).is_none());
    }

    #[test]
    fn test_products_in_category() {
        let catalog = Catalog::bundled().expect("bundled catalog is valid");
        let sets: Vec<_> = catalog.products_in_category("sets").collect();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.first().map(|p| p.id.as_str()), Some("prod-3"));
        assert_eq!(catalog.products_in_category("nope").count(), 0);
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let json = r#"{"products":[
            {"id":"p","name":"A","description":"","price":"1.00","category":null},
            {"id":"p","name":"B","description":"","price":"2.00","category":null}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(id) if id.as_str() == "p"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let json = r#"{"categories":[
            {"id":"c","name":"A","slug":"a"},
            {"id":"c","name":"B","slug":"b"}
        ],"products":[]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let json = r#"{"products":[
            {"id":"p","name":"A","description":"","price":"-1.00","category":null}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}

//! Validating adapter for the catalog read API.
//!
//! The catalog emits a loosely-shaped JSON document: optional fields, image
//! entries that are either a bare URL string or an object, float prices,
//! stock counts that have been seen to go negative. [`CatalogProductDoc`]
//! tolerates all of that on deserialization; [`CatalogProductDoc::normalize`]
//! validates it and produces the strict [`Product`] the engine works with.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::catalog::{
    AxisId, CombinationId, OptionId, Product, ProductImage, ProductStatus, VariantCombination,
    VariationAxis, VariationOption,
};
use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};

/// Product document as delivered by the catalog read endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_prices"))]
pub struct CatalogProductDoc {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub regular_price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub track_inventory: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[validate]
    #[serde(default)]
    pub variations: Vec<VariationDoc>,
    #[serde(default)]
    pub variant_combinations: Vec<CombinationDoc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Image entries arrive either as `"https://..."` or as
/// `{ "url": ..., "alt": ..., "position": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageEntry {
    Url(String),
    Object {
        url: String,
        #[serde(default)]
        alt: Option<String>,
        #[serde(default)]
        position: Option<u32>,
    },
}

/// One variation axis with its options.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VariationDoc {
    pub id: u64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1, message = "axis exposed without options"))]
    pub options: Vec<OptionDoc>,
}

// Serialize is needed because the length check on `VariationDoc::options`
// embeds the offending value in the validation error's params.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDoc {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub price_adjustment: f64,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationDoc {
    pub id: u64,
    pub option_ids: Vec<u64>,
    pub price: f64,
    #[serde(default)]
    pub stock: Option<i64>,
}

fn validate_prices(doc: &CatalogProductDoc) -> std::result::Result<(), ValidationError> {
    if doc.regular_price < 0.0 {
        return Err(ValidationError::new("negative_regular_price"));
    }
    if let Some(sale) = doc.sale_price {
        if sale >= doc.regular_price {
            return Err(ValidationError::new("sale_price_not_below_regular"));
        }
    }
    Ok(())
}

impl CatalogProductDoc {
    /// Parse a raw JSON document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| StorefrontError::InvalidCatalog(e.to_string()))
    }

    /// Validate and normalize into the strict domain model. Fails on broken
    /// product-level data (missing name, sale ≥ regular, duplicate option
    /// ids); merely inconsistent combinations are left to the index build,
    /// which skips them as permanent non-matches.
    pub fn normalize(self) -> Result<Product> {
        self.validate()
            .map_err(|e| StorefrontError::InvalidCatalog(e.to_string()))?;

        let currency = self.currency.clone();
        let regular_price = to_money(self.regular_price, &currency)?;
        let sale_price = self.sale_price.map(|p| to_money(p, &currency)).transpose()?;

        let mut axes = Vec::with_capacity(self.variations.len());
        for variation in &self.variations {
            axes.push(normalize_axis(variation, &currency)?);
        }

        let combinations = self
            .variant_combinations
            .iter()
            .map(|c| {
                Ok(VariantCombination {
                    id: CombinationId(c.id),
                    option_ids: c.option_ids.iter().map(|&id| OptionId(id)).collect(),
                    price: to_money(c.price, &currency)?,
                    stock: c.stock.map(clamp_stock),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Bare-string entries fall back to their document index as position,
        // which can collide with an explicitly pinned position; on a tie the
        // explicit entry outranks the implicit one. The sort is stable, so
        // document order settles anything still equal.
        let mut images: Vec<(ProductImage, bool)> = self
            .images
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                ImageEntry::Url(url) => {
                    (ProductImage { url, alt: None, position: index as u32 }, false)
                }
                ImageEntry::Object { url, alt, position } => (
                    ProductImage {
                        url,
                        alt,
                        position: position.unwrap_or(index as u32),
                    },
                    position.is_some(),
                ),
            })
            .collect();
        images.sort_by_key(|(img, explicit)| (img.position, !explicit));
        let images = images.into_iter().map(|(img, _)| img).collect();

        let status = parse_status(self.status.as_deref());
        let now = Utc::now();
        Ok(Product::new(
            self.id,
            self.slug,
            self.name,
            regular_price,
            sale_price,
            self.track_inventory,
            clamp_stock(self.stock_quantity),
            axes,
            combinations,
            images,
            status,
            self.created_at.unwrap_or(now),
            self.updated_at.unwrap_or(now),
        ))
    }
}

fn normalize_axis(variation: &VariationDoc, currency: &str) -> Result<VariationAxis> {
    let mut seen = std::collections::HashSet::new();
    let mut options = Vec::with_capacity(variation.options.len());
    for option in &variation.options {
        if !seen.insert(option.id) {
            return Err(StorefrontError::InvalidCatalog(format!(
                "duplicate option id {} on axis {}",
                option.id, variation.name
            )));
        }
        options.push(VariationOption {
            id: OptionId(option.id),
            axis_id: AxisId(variation.id),
            name: option.name.clone(),
            price_adjustment: to_money(option.price_adjustment, currency)?,
            stock_quantity: option.stock_quantity.map(clamp_stock),
            image_url: option.image_url.clone().filter(|url| !url.is_empty()),
        });
    }
    Ok(VariationAxis {
        id: AxisId(variation.id),
        name: variation.name.clone(),
        options,
    })
}

fn to_money(value: f64, currency: &str) -> Result<Money> {
    let amount = Decimal::from_f64(value).ok_or_else(|| {
        StorefrontError::InvalidCatalog(format!("unrepresentable price {value}"))
    })?;
    Ok(Money::new(amount, currency))
}

/// Negative counts have been observed from manual catalog edits; the storefront
/// floor is zero.
fn clamp_stock(raw: i64) -> u32 {
    if raw < 0 {
        tracing::warn!(raw, "clamping negative stock count to zero");
    }
    raw.clamp(0, u32::MAX as i64) as u32
}

fn parse_status(raw: Option<&str>) -> ProductStatus {
    match raw {
        // The read endpoint serves published products; absent means active.
        None => ProductStatus::Active,
        Some(s) if s.eq_ignore_ascii_case("active") => ProductStatus::Active,
        Some(s) if s.eq_ignore_ascii_case("draft") => ProductStatus::Draft,
        Some(s) if s.eq_ignore_ascii_case("archived") => ProductStatus::Archived,
        Some(other) => {
            tracing::warn!(status = other, "unknown product status, treating as draft");
            ProductStatus::Draft
        }
    }
}

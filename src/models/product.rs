use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::category::Category;
use crate::models::ImageRef;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Reference to an existing category; checked by the rules engine on
    /// create and update, not enforced by the store itself.
    pub category: Uuid,
    pub price: f64,
    pub image: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            category: input.category,
            price: input.price,
            image: input.image,
            description: input.description,
            in_stock: input.in_stock.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: NewProduct) {
        self.name = input.name;
        self.category = input.category;
        self.price = input.price;
        self.image = input.image;
        self.description = input.description;
        if let Some(in_stock) = input.in_stock {
            self.in_stock = in_stock;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub image: Option<ImageRef>,
    pub description: Option<String>,
    pub in_stock: Option<bool>,
}

/// Validated product fields with the category id parsed.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub category: Uuid,
    pub price: f64,
    pub image: ImageRef,
    pub description: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductPayload {
    pub fn validate(self) -> Result<NewProduct, ApiError> {
        let mut errors = Vec::new();

        let name = self.name.unwrap_or_default().trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Product name is required"));
        } else if name.len() > NAME_MAX_LEN {
            errors.push(FieldError::new("name", "Product name cannot exceed 100 characters"));
        }

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::new("category", "Category is required"));
                None
            }
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new("category", "Invalid category ID"));
                    None
                }
            },
        };

        let price = self.price.unwrap_or(-1.0);
        if !(price.is_finite() && price >= 0.0) {
            errors.push(FieldError::new("price", "Price must be a positive number"));
        }

        let image = match self.image {
            Some(image) if image.is_valid() => Some(image),
            _ => {
                errors.push(FieldError::new(
                    "image",
                    "Image must be a valid URL string or array of URL strings",
                ));
                None
            }
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description.as_ref().is_some_and(|d| d.len() > DESCRIPTION_MAX_LEN) {
            errors.push(FieldError::new("description", "Description cannot exceed 500 characters"));
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_errors(errors));
        }

        match (category, image) {
            (Some(category), Some(image)) => Ok(NewProduct {
                name,
                category,
                price,
                image,
                description,
                in_stock: self.in_stock,
            }),
            _ => Err(ApiError::validation_failed("Validation failed")),
        }
    }
}

/// Product as returned by the API: the category reference resolved to a
/// small summary, `null` when it no longer exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub category: Option<CategorySummary>,
    pub price: f64,
    pub image: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

impl ProductView {
    pub fn new(product: Product, category: Option<&Category>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category: category.map(|c| CategorySummary { id: c.id, name: c.name.clone() }),
            price: product.price,
            image: product.image,
            description: product.description,
            in_stock: product.in_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

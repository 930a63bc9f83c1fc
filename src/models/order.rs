use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::{is_valid_email, ImageRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// A denormalized snapshot of a product at order time. Carries no live
/// reference: mutating or deleting a product never affects past orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub image: ImageRef,
    pub description: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub customer_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Public checkout always opens an order as `pending`.
    pub fn new(input: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            items: input.items,
            total: input.total,
            customer_name: input.customer_name,
            email: input.email,
            contact_number: input.contact_number,
            address: input.address,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Option<Vec<CartItem>>,
    pub total: Option<f64>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug)]
pub struct NewOrder {
    pub items: Vec<CartItem>,
    pub total: f64,
    pub customer_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: Option<String>,
}

impl OrderPayload {
    pub fn validate(self) -> Result<NewOrder, ApiError> {
        let mut errors = Vec::new();

        let items = self.items.unwrap_or_default();
        if items.is_empty() {
            errors.push(FieldError::new("items", "Order must have at least one item"));
        }
        for (index, item) in items.iter().enumerate() {
            validate_item(index, item, &mut errors);
        }

        let total = self.total.unwrap_or(-1.0);
        if !(total.is_finite() && total >= 0.0) {
            errors.push(FieldError::new("total", "Total must be a positive number"));
        }

        let customer_name = self.customer_name.unwrap_or_default().trim().to_string();
        if customer_name.is_empty() {
            errors.push(FieldError::new("customerName", "Customer name is required"));
        }

        let email = self.email.unwrap_or_default().trim().to_lowercase();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }

        let contact_number = self.contact_number.unwrap_or_default().trim().to_string();
        if contact_number.is_empty() {
            errors.push(FieldError::new("contactNumber", "Contact number is required"));
        }

        let address = self.address.unwrap_or_default().trim().to_string();
        if address.is_empty() {
            errors.push(FieldError::new("address", "Address is required"));
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_errors(errors));
        }

        Ok(NewOrder { items, total, customer_name, email, contact_number, address })
    }
}

fn validate_item(index: usize, item: &CartItem, errors: &mut Vec<FieldError>) {
    let field = |name: &str| format!("items[{index}].{name}");

    if item.id.is_empty() {
        errors.push(FieldError::new(field("id"), "Item ID is required"));
    }
    if item.name.is_empty() {
        errors.push(FieldError::new(field("name"), "Item name is required"));
    }
    if item.category.is_empty() {
        errors.push(FieldError::new(field("category"), "Item category is required"));
    }
    if !(item.price.is_finite() && item.price >= 0.0) {
        errors.push(FieldError::new(field("price"), "Item price must be a positive number"));
    }
    if item.quantity < 1 {
        errors.push(FieldError::new(field("quantity"), "Item quantity must be at least 1"));
    }
    if !item.image.is_valid() {
        errors.push(FieldError::new(
            field("image"),
            "Image must be a valid URL string or array of URL strings",
        ));
    }
    if item.description.is_empty() {
        errors.push(FieldError::new(field("description"), "Item description is required"));
    }
}

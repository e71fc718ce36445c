use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MutationError;

pub const ID_REQUIRED_MESSAGE: &str = "Product ID is required";

/// Client-supplied field values for one mutation.
///
/// Every field is optional. An absent field means "keep the stored value" when
/// the request is merged into an existing document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MutationRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub active: Option<bool>,
    pub brand: Option<String>,
    pub sku: Option<String>,
}

impl MutationRequest {
    /// Request carrying nothing but an id, as used for deletes.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The client id, ignoring blank strings.
    pub fn provided_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn require_id(&self) -> Result<&str, MutationError> {
        self.provided_id()
            .ok_or_else(|| MutationError::validation(ID_REQUIRED_MESSAGE))
    }

    /// Rejects field values no stored document may carry.
    pub fn validate(&self) -> Result<(), MutationError> {
        if let Some(price) = self.price {
            if !price.is_finite() {
                return Err(MutationError::validation("price must be a finite number"));
            }
            if price < 0.0 {
                return Err(MutationError::validation("price must not be negative"));
            }
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(MutationError::validation("stock must not be negative"));
            }
        }
        Ok(())
    }
}

/// A stored product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub active: bool,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Builds a brand new document under `id`.
    ///
    /// The request's own `id` field is never read here; callers decide whether
    /// a client id is honoured. `active` defaults to `true`.
    pub fn create(id: String, request: &MutationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            category: request.category.clone(),
            price: request.price,
            stock: request.stock,
            active: request.active.unwrap_or(true),
            brand: request.brand.clone(),
            sku: request.sku.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Partial merge: only fields present in `request` overwrite stored values.
    /// `id` and `created_at` are never touched.
    pub fn merge(&mut self, request: &MutationRequest, now: DateTime<Utc>) {
        if let Some(name) = &request.name {
            self.name = Some(name.clone());
        }
        if let Some(description) = &request.description {
            self.description = Some(description.clone());
        }
        if let Some(category) = &request.category {
            self.category = Some(category.clone());
        }
        if let Some(price) = request.price {
            self.price = Some(price);
        }
        if let Some(stock) = request.stock {
            self.stock = Some(stock);
        }
        if let Some(active) = request.active {
            self.active = active;
        }
        if let Some(brand) = &request.brand {
            self.brand = Some(brand.clone());
        }
        if let Some(sku) = &request.sku {
            self.sku = Some(sku.clone());
        }
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

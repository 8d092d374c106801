//! Item form extraction and type coercion.
//!
//! Form inputs arrive as raw strings. Creating an item needs a name, a whole
//! quantity and a price; editing sends only the fields that were filled in.

use crate::net::types::{ItemPatch, NewItem};

/// Rejected form input. Nothing is sent when one of these is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be {expected}, got {value:?}")]
    Invalid { field: &'static str, expected: &'static str, value: String },
}

/// Raw values of the add/edit item form. Empty means "not filled in".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub location: String,
}

impl ItemForm {
    /// Build a create request, coercing quantity and price.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when name, quantity or price is missing or
    /// malformed.
    pub fn to_new_item(&self) -> Result<NewItem, FormError> {
        let name = filled(&self.name).ok_or(FormError::Required { field: "name" })?;
        let quantity = filled(&self.quantity).ok_or(FormError::Required { field: "quantity" })?;
        let price = filled(&self.price).ok_or(FormError::Required { field: "price" })?;
        Ok(NewItem {
            name: name.to_owned(),
            description: filled(&self.description).map(str::to_owned),
            quantity: parse_quantity(quantity)?,
            price: parse_price(price)?,
            location: filled(&self.location).map(str::to_owned),
        })
    }

    /// Build a sparse update; empty fields are left out entirely.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] when a filled-in number is malformed.
    pub fn to_patch(&self) -> Result<ItemPatch, FormError> {
        Ok(ItemPatch {
            name: filled(&self.name).map(str::to_owned),
            description: filled(&self.description).map(str::to_owned),
            quantity: filled(&self.quantity).map(parse_quantity).transpose()?,
            price: filled(&self.price).map(parse_price).transpose()?,
            location: filled(&self.location).map(str::to_owned),
        })
    }
}

fn filled(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Quantity must be a whole number, zero or more.
///
/// # Errors
///
/// Returns [`FormError::Invalid`] otherwise.
pub fn parse_quantity(raw: &str) -> Result<i64, FormError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|q| *q >= 0)
        .ok_or_else(|| FormError::Invalid {
            field: "quantity",
            expected: "a whole number of zero or more",
            value: raw.to_owned(),
        })
}

/// Price must be a finite decimal, zero or more.
///
/// # Errors
///
/// Returns [`FormError::Invalid`] otherwise.
pub fn parse_price(raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| FormError::Invalid {
            field: "price",
            expected: "a decimal of zero or more",
            value: raw.to_owned(),
        })
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

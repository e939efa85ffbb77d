//! Cart models and mutation payload handling.

use crate::domain::error::{Result, StorefrontError};
use crate::domain::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque cart line identifier assigned by the commerce API.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single cart line as known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineId,
    pub merchandise_id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Money,

    /// Stock ceiling reported by the API, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<u32>,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// Copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// A discount code entered against the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    pub applicable: bool,
}

/// Authoritative cart state returned by the commerce API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,

    #[serde(default)]
    pub lines: Vec<CartLine>,

    #[serde(default)]
    pub discount_codes: Vec<DiscountCode>,

    #[serde(default)]
    pub currency_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
}

impl Cart {
    /// Decodes a cart query payload (`{"cart": {...}}` or a bare cart).
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Decode`] if the payload is not a cart.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        let cart_value = payload.get("cart").unwrap_or(payload);
        serde_json::from_value(cart_value.clone())
            .map_err(|e| StorefrontError::Decode(format!("cart payload: {e}")))
    }

    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }
}

/// A user-facing error attached to a rejected mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    pub message: String,
}

/// Response body of a cart line mutation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPayload {
    #[serde(default)]
    pub cart: Option<Cart>,

    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

impl MutationPayload {
    /// Decodes a mutation response.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Decode`] if the payload has the wrong shape.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload.clone())
            .map_err(|e| StorefrontError::Decode(format!("mutation payload: {e}")))
    }

    /// Resolves the mutation to the resulting cart.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Rejected`] when the API returned user errors
    /// - [`StorefrontError::Decode`] when there is neither a cart nor an error
    pub fn into_cart(self) -> Result<Cart> {
        if !self.user_errors.is_empty() {
            let messages: Vec<String> = self.user_errors.into_iter().map(|e| e.message).collect();
            return Err(StorefrontError::Rejected(messages.join("; ")));
        }

        self.cart
            .ok_or_else(|| StorefrontError::Decode("mutation returned no cart".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cart_json() -> serde_json::Value {
        json!({
            "id": "gid://shopify/Cart/1",
            "currency_code": "SAR",
            "lines": [{
                "id": "line-1",
                "merchandise_id": "variant-9",
                "title": "Silk Dress",
                "quantity": 2,
                "unit_price": "450.00"
            }],
            "discount_codes": [{"code": "SPRING", "applicable": true}]
        })
    }

    #[test]
    fn decodes_wrapped_and_bare_carts() {
        let bare = Cart::from_payload(&cart_json()).unwrap();
        let wrapped = Cart::from_payload(&json!({ "cart": cart_json() })).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.lines[0].line_total(), Money::from_major(900));
    }

    #[test]
    fn user_errors_reject_the_mutation() {
        let payload = MutationPayload::from_payload(&json!({
            "cart": cart_json(),
            "userErrors": [{"message": "Only 3 left"}, {"message": "Try again"}]
        }))
        .unwrap();

        match payload.into_cart() {
            Err(StorefrontError::Rejected(msg)) => assert_eq!(msg, "Only 3 left; Try again"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn mutation_without_cart_is_decode_error() {
        let payload = MutationPayload::from_payload(&json!({})).unwrap();
        assert!(matches!(payload.into_cart(), Err(StorefrontError::Decode(_))));
    }
}

//! Shopping cart endpoints and totals.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::{ApiRequest, ApiResult, ClientError, MarketClient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub price: f64,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartItem {
    pub fn cost(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Cart contents with the percentage discount currently applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "crate::api::decimal::option::deserialize")]
    pub discount: Option<f64>,
}

impl Cart {
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::cost).sum()
    }

    /// Discount percentage, 0 when none is applied.
    pub fn discount_percent(&self) -> f64 {
        self.discount.unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        let subtotal = self.subtotal();
        subtotal - subtotal * self.discount_percent() / 100.0
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponResult {
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub discount: f64,
}

impl MarketClient {
    pub async fn cart(&self) -> ApiResult<Cart> {
        self.send_json(ApiRequest::get("/api/cart/")).await
    }

    pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> ApiResult<()> {
        check_quantity(quantity)?;
        let request = ApiRequest::post("/api/cart/add/")
            .json(&json!({ "product_id": product_id, "quantity": quantity }))?;
        self.send_ok(request).await?;
        Ok(())
    }

    pub async fn update_cart_item(&self, item_id: u64, quantity: u32) -> ApiResult<()> {
        check_quantity(quantity)?;
        let request = ApiRequest::put(format!("/api/cart/update/{item_id}/"))
            .json(&json!({ "quantity": quantity }))?;
        self.send_ok(request).await?;
        Ok(())
    }

    pub async fn remove_cart_item(&self, item_id: u64) -> ApiResult<()> {
        self.send_ok(ApiRequest::delete(format!("/api/cart/remove/{item_id}/")))
            .await?;
        Ok(())
    }

    pub async fn apply_coupon(&self, code: &str) -> ApiResult<CouponResult> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::InvalidInput("coupon code must not be blank".into()));
        }
        let request = ApiRequest::post("/api/cart/apply-coupon/").json(&json!({ "code": code }))?;
        self.send_json(request).await
    }
}

fn check_quantity(quantity: u32) -> ApiResult<()> {
    if quantity == 0 {
        return Err(ClientError::InvalidInput("quantity must be at least 1".into()));
    }
    Ok(())
}

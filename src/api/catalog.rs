//! Catalog extras: categories, banners, favorites and product reviews.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::{ApiRequest, ApiResult, ClientError, MarketClient};

/// Highest rating the review form offers.
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    /// Emoji shown next to the name.
    #[serde(default)]
    pub icon: String,
}

/// Home page banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A product the current user marked as a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub product: u64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub product: u64,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: String,
}

/// A review to post. Ratings run from 1 to 5 in steps of 0.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub product: u64,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

impl NewReview {
    fn validate(&self) -> ApiResult<()> {
        if !(1.0..=MAX_RATING).contains(&self.rating) {
            return Err(ClientError::InvalidInput(format!(
                "rating {} is outside 1-{MAX_RATING}",
                self.rating
            )));
        }
        let tenths = self.rating * 10.0;
        if (tenths - tenths.round()).abs() > 1e-9 {
            return Err(ClientError::InvalidInput(format!(
                "rating {} has more than one decimal place",
                self.rating
            )));
        }
        Ok(())
    }
}

/// Mean rating, 0 when there are no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| r.rating).sum::<f64>() / reviews.len() as f64
}

impl MarketClient {
    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get_json("/api/categories/").await
    }

    /// Active banners in display order.
    pub async fn banners(&self) -> ApiResult<Vec<Banner>> {
        let mut banners: Vec<Banner> = self.get_json("/api/banners/").await?;
        banners.retain(|b| b.is_active);
        banners.sort_by_key(|b| b.order);
        Ok(banners)
    }

    pub async fn favorites(&self) -> ApiResult<Vec<Favorite>> {
        self.get_json("/api/favorites/").await
    }

    pub async fn add_favorite(&self, product_id: u64) -> ApiResult<Favorite> {
        self.post_json("/api/favorites/", &json!({ "product": product_id }))
            .await
    }

    /// Remove a favorite by its own id (not the product id).
    pub async fn remove_favorite(&self, favorite_id: u64) -> ApiResult<()> {
        self.delete(&format!("/api/favorites/{favorite_id}/")).await
    }

    pub async fn reviews(&self, product_id: u64) -> ApiResult<Vec<Review>> {
        let request = ApiRequest::get("/api/reviews/").query("product", product_id);
        self.send_json(request).await
    }

    pub async fn add_review(&self, review: &NewReview) -> ApiResult<Review> {
        review.validate()?;
        self.post_json("/api/reviews/", review).await
    }
}

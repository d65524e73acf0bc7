//! Product catalog endpoints.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::{ApiRequest, ApiResult, ClientError, MarketClient};

/// A product listed by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub farmer: String,
    #[serde(default)]
    pub location: String,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub price: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::api::decimal::option::deserialize")]
    pub stock: Option<f64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Popularity,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl ProductSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSort::Popularity => "popularity",
            ProductSort::PriceAsc => "price_asc",
            ProductSort::PriceDesc => "price_desc",
            ProductSort::Newest => "newest",
        }
    }
}

impl FromStr for ProductSort {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "popularity" => Ok(ProductSort::Popularity),
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            "newest" => Ok(ProductSort::Newest),
            other => Err(ClientError::InvalidInput(format!("unknown sort order '{other}'"))),
        }
    }
}

/// Listing filters. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
    pub sort: ProductSort,
}

impl ProductFilter {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("category", self.category.as_deref().filter(|c| !c.is_empty()))
            .query_opt("minPrice", self.min_price)
            .query_opt("maxPrice", self.max_price)
            .query_opt("location", self.location.as_deref().filter(|l| !l.is_empty()))
            .query("sort", self.sort.as_str())
    }
}

impl MarketClient {
    pub async fn products(&self, filter: &ProductFilter) -> ApiResult<Vec<Product>> {
        let request = filter.apply(ApiRequest::get("/api/products/"));
        self.send_json(request).await
    }

    pub async fn product(&self, id: u64) -> ApiResult<Product> {
        self.send_json(ApiRequest::get(format!("/api/products/{id}/")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_skips_unset_fields() {
        let filter = ProductFilter {
            category: Some("fruits".into()),
            max_price: Some(40.0),
            location: Some(String::new()),
            sort: ProductSort::PriceDesc,
            ..Default::default()
        };
        let request = filter.apply(ApiRequest::get("/api/products/"));
        let pairs: Vec<(&str, &str)> = request
            .query_pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("category", "fruits"), ("maxPrice", "40"), ("sort", "price_desc")]
        );
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("price-asc".parse::<ProductSort>().unwrap(), ProductSort::PriceAsc);
        assert_eq!("newest".parse::<ProductSort>().unwrap(), ProductSort::Newest);
        assert!("cheapest".parse::<ProductSort>().is_err());
    }

    #[test]
    fn test_product_from_backend_shape() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Alphonso Mango",
                "farmer": "Patil Farms",
                "location": "Ratnagiri",
                "price": "450.00",
                "unit": "dozen",
                "category": 2,
                "image": "/media/products/mango.jpg",
                "average_rating": 4.5,
                "review_count": 12
            }"#,
        )
        .unwrap();
        assert_eq!(product.price, 450.0);
        assert_eq!(product.unit.as_deref(), Some("dozen"));
        assert_eq!(product.review_count, Some(12));
        assert_eq!(product.stock, None);
    }
}

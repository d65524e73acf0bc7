//! Typed marketplace endpoints.
//!
//! Each submodule adds methods to [`MarketClient`](crate::http::MarketClient)
//! for one area of the backend. All of them go through `send`, so every call
//! gets cookies, the CSRF header and the refresh-and-replay behavior.

pub mod cart;
pub mod catalog;
pub mod farmer;
pub mod notes;
pub mod products;
pub mod session;

pub use cart::{Cart, CartItem, CouponResult};
pub use catalog::{average_rating, Banner, Category, Favorite, NewReview, Review};
pub use farmer::{
    AnalyticsTimeFrame, DateRange, FarmerAnalytics, FarmerProfileUpdate, Order, OrderFilter,
    OrderItem, OrderList, OrderStats, OrderStatus,
};
pub use notes::{NewNote, Note};
pub use products::{Product, ProductFilter, ProductSort};
pub use session::{AuthStatus, LoginRedirect, LogoutAck, UserInfo};

/// Django serializes `DecimalField` as a string; accept either form.
pub(crate) mod decimal {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub mod option {
        use super::Raw;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<Raw>::deserialize(deserializer)? {
                None => Ok(None),
                Some(Raw::Number(n)) => Ok(Some(n)),
                Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
            }
        }
    }

}

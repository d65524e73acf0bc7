//! Farmer dashboard endpoints: orders, analytics, profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::http::{ApiRequest, ApiResult, ClientError, MarketClient};

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders accept no further updates.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClientError::InvalidInput(format!("unknown order status '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: u64,
    pub product_name: String,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub quantity: f64,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(deserialize_with = "crate::api::decimal::deserialize")]
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Case-insensitive match on order number or customer name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.order_number.to_lowercase().contains(&query)
            || self.customer_name.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderStats {
    pub pending: u64,
    pub processing: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub stats: OrderStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Today,
    Week,
    Month,
    All,
}

impl DateRange {
    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::All => "all",
        }
    }
}

impl FromStr for DateRange {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "all" => Ok(DateRange::All),
            other => Err(ClientError::InvalidInput(format!("unknown date range '{other}'"))),
        }
    }
}

/// Order listing filter. `status: None` lists every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsTimeFrame {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl AnalyticsTimeFrame {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyticsTimeFrame::Week => "week",
            AnalyticsTimeFrame::Month => "month",
            AnalyticsTimeFrame::Quarter => "quarter",
            AnalyticsTimeFrame::Year => "year",
        }
    }
}

impl FromStr for AnalyticsTimeFrame {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(AnalyticsTimeFrame::Week),
            "month" => Ok(AnalyticsTimeFrame::Month),
            "quarter" => Ok(AnalyticsTimeFrame::Quarter),
            "year" => Ok(AnalyticsTimeFrame::Year),
            other => Err(ClientError::InvalidInput(format!("unknown time frame '{other}'"))),
        }
    }
}

/// Headline analytics figures. Chart series are kept untyped in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerAnalytics {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub customer_retention: f64,
    #[serde(default)]
    pub growth_rate: f64,
    #[serde(default)]
    pub inventory_turnover: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text fields of the farm profile form. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmerProfileUpdate {
    pub farm_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub certifications: Option<String>,
    pub social_media: Option<Value>,
}

impl FarmerProfileUpdate {
    fn into_form(self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        let fields = [
            ("farm_name", self.farm_name),
            ("description", self.description),
            ("location", self.location),
            ("phone", self.phone),
            ("email", self.email),
            ("certifications", self.certifications),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                form.push((key.to_string(), value));
            }
        }
        if let Some(social) = self.social_media {
            form.push(("social_media".to_string(), social.to_string()));
        }
        form
    }
}

impl MarketClient {
    pub async fn farmer_orders(&self, filter: OrderFilter) -> ApiResult<OrderList> {
        let request = ApiRequest::get("/api/farmer/orders/")
            .query_opt("status", filter.status.map(OrderStatus::as_str))
            .query("date_range", filter.date_range.as_str());
        self.send_json(request).await
    }

    /// Move `order` to `status`. Delivered and cancelled orders are refused
    /// locally.
    pub async fn update_order_status(&self, order: &Order, status: OrderStatus) -> ApiResult<()> {
        if order.status.is_final() {
            return Err(ClientError::InvalidInput(format!(
                "order {} is {} and can no longer change status",
                order.order_number, order.status
            )));
        }
        let request = ApiRequest::put(format!("/api/farmer/orders/{}/status/", order.id))
            .json(&json!({ "status": status }))?;
        self.send_ok(request).await?;
        Ok(())
    }

    /// Look up an order by id across every status and date range.
    pub async fn farmer_order(&self, order_id: u64) -> ApiResult<Order> {
        let list = self
            .farmer_orders(OrderFilter {
                status: None,
                date_range: DateRange::All,
            })
            .await?;
        list.orders
            .into_iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| ClientError::InvalidInput(format!("no order with id {order_id}")))
    }

    pub async fn farmer_analytics(&self, frame: AnalyticsTimeFrame) -> ApiResult<FarmerAnalytics> {
        let request = ApiRequest::get("/api/farmer/analytics/").query("timeFrame", frame.as_str());
        self.send_json(request).await
    }

    pub async fn update_farmer_profile(&self, update: FarmerProfileUpdate) -> ApiResult<()> {
        let form = update.into_form();
        if form.is_empty() {
            return Err(ClientError::InvalidInput("profile update has no fields".into()));
        }
        self.send_ok(ApiRequest::post("/api/farmer/profile/update/").form(form))
            .await?;
        Ok(())
    }
}

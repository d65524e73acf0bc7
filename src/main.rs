//! Command-line client for the Farmer's Marketplace backend.
//!
//! Every subcommand goes through `MarketClient`, so session cookies, the
//! CSRF header and the refresh-and-replay-once behavior apply throughout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use marketplace_client::api::{
    average_rating, AnalyticsTimeFrame, DateRange, FarmerProfileUpdate, NewNote, NewReview,
    OrderFilter, OrderStatus, ProductFilter, ProductSort,
};
use marketplace_client::config::{load_or_default, RefreshPolicy};
use marketplace_client::observability::init_logging;
use marketplace_client::{ApiRequest, ApiResponse, ClientError, MarketClient};

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(about = "CLI for the Farmer's Marketplace API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(short, long)]
    base_url: Option<String>,

    /// Share one token refresh between concurrent rejections.
    #[arg(long)]
    coalesce_refresh: bool,

    /// Fetch a CSRF token before running the command.
    #[arg(long)]
    prime: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print a fresh CSRF token
    Csrf,
    /// Show the logged-in user
    Whoami,
    /// Check whether the session is authenticated
    CheckAuth,
    /// Print the OAuth login URL
    LoginUrl,
    /// Show the logged-in user's profile
    UserProfile,
    /// End the session
    Logout,
    /// List products
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "popularity")]
        sort: ProductSort,
    },
    /// Show one product
    Product { id: u64 },
    /// List product categories
    Categories,
    /// List active home page banners
    Banners,
    /// List favorites
    Favorites,
    /// Mark a product as a favorite
    FavoriteAdd { product_id: u64 },
    /// Remove a favorite by its id
    FavoriteRemove { favorite_id: u64 },
    /// List reviews for a product
    Reviews { product_id: u64 },
    /// Review a product
    ReviewAdd {
        product_id: u64,
        /// 1 to 5, one decimal place
        rating: f64,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Show the cart with totals
    Cart,
    /// Add a product to the cart
    CartAdd {
        product_id: u64,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change the quantity of a cart item
    CartUpdate { item_id: u64, quantity: u32 },
    /// Remove a cart item
    CartRemove { item_id: u64 },
    /// Apply a coupon code
    Coupon { code: String },
    /// List farmer orders
    Orders {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long, default_value = "today")]
        range: DateRange,
        /// Filter by order number or customer name
        #[arg(long)]
        search: Option<String>,
    },
    /// Update an order's status
    OrderStatus { order_id: u64, status: OrderStatus },
    /// Show farmer analytics
    Analytics {
        #[arg(long, default_value = "week")]
        frame: AnalyticsTimeFrame,
    },
    /// Update farm profile text fields
    Profile {
        #[arg(long)]
        farm_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// List notes
    Notes,
    /// Create a note
    NoteAdd {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Delete a note
    NoteDelete { id: u64 },
    /// Send an arbitrary request
    Request {
        method: String,
        path: String,
        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    if cli.coalesce_refresh {
        config.csrf.refresh_policy = RefreshPolicy::Coalesced;
    }

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Logging already initialized: {e}");
    }

    let client = MarketClient::new(config)?;
    if cli.prime {
        client.prime_csrf().await?;
    }

    if let Err(e) = run(&client, cli.command).await {
        tracing::error!(error = %e, class = ?e.class(), "Command failed");
        eprintln!("Error: {e}");
        if let ClientError::Status { body, .. } = &e {
            if !body.is_empty() {
                eprintln!("Response: {body}");
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &MarketClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Csrf => {
            client.prime_csrf().await?;
            print_json(&serde_json::json!({ "csrfToken": client.csrf_token() }))
        }
        Commands::Whoami => print_json(&client.user_info().await?),
        Commands::CheckAuth => print_json(&client.check_auth().await?),
        Commands::LoginUrl => print_json(&client.login_redirect().await?),
        Commands::UserProfile => print_json(&client.user_profile().await?),
        Commands::Logout => print_json(&client.logout().await?),
        Commands::Products {
            category,
            min_price,
            max_price,
            location,
            sort,
        } => {
            let filter = ProductFilter {
                category,
                min_price,
                max_price,
                location,
                sort,
            };
            print_json(&client.products(&filter).await?)
        }
        Commands::Product { id } => print_json(&client.product(id).await?),
        Commands::Categories => print_json(&client.categories().await?),
        Commands::Banners => print_json(&client.banners().await?),
        Commands::Favorites => print_json(&client.favorites().await?),
        Commands::FavoriteAdd { product_id } => print_json(&client.add_favorite(product_id).await?),
        Commands::FavoriteRemove { favorite_id } => {
            client.remove_favorite(favorite_id).await?;
            println!("Removed favorite {favorite_id}");
            Ok(())
        }
        Commands::Reviews { product_id } => {
            let reviews = client.reviews(product_id).await?;
            print_json(&serde_json::json!({
                "reviews": reviews,
                "average_rating": average_rating(&reviews),
            }))
        }
        Commands::ReviewAdd {
            product_id,
            rating,
            comment,
        } => print_json(
            &client
                .add_review(&NewReview {
                    product: product_id,
                    rating,
                    comment,
                })
                .await?,
        ),
        Commands::Cart => {
            let cart = client.cart().await?;
            print_json(&serde_json::json!({
                "items": cart.items,
                "discount": cart.discount_percent(),
                "subtotal": cart.subtotal(),
                "total": cart.total(),
            }))
        }
        Commands::CartAdd {
            product_id,
            quantity,
        } => {
            client.add_to_cart(product_id, quantity).await?;
            println!("Added product {product_id} x{quantity}");
            Ok(())
        }
        Commands::CartUpdate { item_id, quantity } => {
            client.update_cart_item(item_id, quantity).await?;
            println!("Updated item {item_id} to {quantity}");
            Ok(())
        }
        Commands::CartRemove { item_id } => {
            client.remove_cart_item(item_id).await?;
            println!("Removed item {item_id}");
            Ok(())
        }
        Commands::Coupon { code } => print_json(&client.apply_coupon(&code).await?),
        Commands::Orders {
            status,
            range,
            search,
        } => {
            let mut list = client
                .farmer_orders(OrderFilter {
                    status,
                    date_range: range,
                })
                .await?;
            if let Some(query) = search {
                list.orders.retain(|order| order.matches(&query));
            }
            print_json(&list)
        }
        Commands::OrderStatus { order_id, status } => {
            let order = client.farmer_order(order_id).await?;
            client.update_order_status(&order, status).await?;
            println!("Order {order_id} is now {status}");
            Ok(())
        }
        Commands::Analytics { frame } => print_json(&client.farmer_analytics(frame).await?),
        Commands::Profile {
            farm_name,
            description,
            location,
            phone,
            email,
        } => {
            client
                .update_farmer_profile(FarmerProfileUpdate {
                    farm_name,
                    description,
                    location,
                    phone,
                    email,
                    ..Default::default()
                })
                .await?;
            println!("Profile updated");
            Ok(())
        }
        Commands::Notes => print_json(&client.notes().await?),
        Commands::NoteAdd { title, content } => {
            print_json(&client.create_note(&NewNote { title, content }).await?)
        }
        Commands::NoteDelete { id } => {
            client.delete_note(id).await?;
            println!("Deleted note {id}");
            Ok(())
        }
        Commands::Request { method, path, data } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|_| ClientError::InvalidInput(format!("invalid method '{method}'")))?;
            let mut request = ApiRequest::new(method, path);
            if let Some(data) = data {
                let body: Value = serde_json::from_str(&data)
                    .map_err(|e| ClientError::InvalidInput(format!("--data is not JSON: {e}")))?;
                request = request.json(&body)?;
            }
            print_response(client.send(request).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    let text = serde_json::to_string_pretty(value).map_err(ClientError::Encode)?;
    println!("{text}");
    Ok(())
}

/// Print the body of a raw request. A non-2xx status becomes an error so the
/// process exits non-zero.
fn print_response(response: ApiResponse) -> Result<(), ClientError> {
    let response = response.error_for_status()?;
    match response.json::<Value>() {
        Ok(json) => print_json(&json),
        Err(_) => {
            println!("{}", response.text());
            Ok(())
        }
    }
}

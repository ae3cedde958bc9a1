//! Folio CLI - Command line client for the Folio bookstore.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and persist the session
//! folio account login -e reader@example.com -p hunter2
//!
//! # Browse the catalog
//! folio books search --keyword tolkien --page 2
//! folio books top
//!
//! # Build a cart and check out
//! folio cart add 665f1c2e9b1d8c3a5e7f0a13 -q 2
//! folio orders checkout --name "Jane Doe" --street "1 Main St" \
//!     --city Springfield --state IL --zip 62704 --country USA
//! ```
//!
//! # Commands
//!
//! - `account` - Sign in, sign out, inspect the session and profile
//! - `books` - Search and inspect the catalog
//! - `cart` - Manage the locally persisted cart
//! - `orders` - Place and inspect orders
//! - `dashboard` - Admin dashboard reports
//!
//! # Configuration
//!
//! Reads `FOLIO_API_URL` (required), `FOLIO_STATE_FILE`, and `SENTRY_DSN`
//! from the environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use folio_client::{AuthEvent, BookQuery, Client, ClientConfig, ShippingAddress};
use folio_core::CategoryId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Command line client for the Folio bookstore")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, inspect the session and profile
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Search and inspect the catalog
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// Manage the locally persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place and inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin dashboard reports
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in and persist the session locally
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear local session state
    Logout,
    /// Show the signed-in user's profile
    Profile,
    /// Show the stored session, refreshing it if stale
    Session,
}

#[derive(Subcommand)]
enum BooksAction {
    /// Search the catalog
    Search {
        /// Match titles against this text
        #[arg(short, long)]
        keyword: Option<String>,

        /// Filter by category id
        #[arg(short, long)]
        category: Option<String>,

        /// Only bestsellers
        #[arg(long)]
        bestseller: bool,

        /// Only new releases
        #[arg(long)]
        new_release: bool,

        /// Only special offers
        #[arg(long)]
        special_offer: bool,

        /// Result page to fetch (1-based)
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one book
    Show {
        /// Book id
        id: String,
    },
    /// Show the five highest rated books
    Top,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add copies of a book to the cart
    Add {
        /// Book id
        id: String,

        /// Number of copies
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a book from the cart
    Remove {
        /// Book id
        id: String,
    },
    /// Set the quantity of a cart line (0 removes it)
    Set {
        /// Book id
        id: String,

        /// Number of copies
        quantity: u32,
    },
    /// Show the cart with current prices
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Place an order from the current cart
    Checkout {
        /// Recipient name
        #[arg(long)]
        name: String,

        /// Street address
        #[arg(long)]
        street: String,

        /// City
        #[arg(long)]
        city: String,

        /// State or province
        #[arg(long)]
        state: String,

        /// Postal code
        #[arg(long)]
        zip: String,

        /// Country
        #[arg(long)]
        country: String,

        /// Payment method
        #[arg(long, default_value = "PayPal")]
        payment: String,
    },
    /// List the signed-in user's orders
    Mine,
    /// Show one order
    Show {
        /// Order id
        id: String,
    },
}

#[derive(Subcommand)]
enum DashboardAction {
    /// Headline dashboard numbers
    Stats,
    /// Platform-wide statistics (super admin)
    Platform,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Parse arguments first so `--help` works without configuration
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = ClientConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "folio_cli=info,folio_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let client = Client::new(&config);
    watch_auth_events(&client);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &client).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Report session changes that happen mid-command, such as a token
/// refresh or the session being lost while a request was in flight.
fn watch_auth_events(client: &Client) {
    let mut events = client.auth_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                AuthEvent::AuthenticationLost { .. } => {
                    tracing::warn!("Session expired. Run `folio account login` to sign in again");
                }
                AuthEvent::SessionRefreshed { .. } => {
                    tracing::debug!("Session token refreshed");
                }
            }
        }
    });
}

async fn run(cli: Cli, client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(client, &email, &password).await?;
            }
            AccountAction::Register {
                name,
                email,
                password,
            } => {
                commands::account::register(client, &name, &email, &password).await?;
            }
            AccountAction::Logout => commands::account::logout(client).await?,
            AccountAction::Profile => commands::account::profile(client).await?,
            AccountAction::Session => commands::account::session(client).await?,
        },
        Commands::Books { action } => match action {
            BooksAction::Search {
                keyword,
                category,
                bestseller,
                new_release,
                special_offer,
                page,
            } => {
                let query = BookQuery {
                    keyword,
                    category: category.map(CategoryId::new),
                    bestseller,
                    new_release,
                    special_offer,
                    page,
                };
                commands::books::search(client, &query).await?;
            }
            BooksAction::Show { id } => commands::books::show(client, &id).await?,
            BooksAction::Top => commands::books::top(client).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, quantity } => commands::cart::add(client, &id, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(client, &id)?,
            CartAction::Set { id, quantity } => commands::cart::set(client, &id, quantity)?,
            CartAction::Show => commands::cart::show(client).await?,
            CartAction::Clear => commands::cart::clear(client)?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::Checkout {
                name,
                street,
                city,
                state,
                zip,
                country,
                payment,
            } => {
                let address = ShippingAddress {
                    name,
                    street,
                    city,
                    state,
                    zip_code: zip,
                    country,
                };
                commands::orders::checkout(client, address, &payment).await?;
            }
            OrdersAction::Mine => commands::orders::mine(client).await?,
            OrdersAction::Show { id } => commands::orders::show(client, &id).await?,
        },
        Commands::Dashboard { action } => match action {
            DashboardAction::Stats => commands::dashboard::stats(client).await?,
            DashboardAction::Platform => commands::dashboard::platform(client).await?,
        },
    }
    Ok(())
}

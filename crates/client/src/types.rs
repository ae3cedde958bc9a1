//! Wire records for the bookstore backend.
//!
//! Shapes follow the backend's JSON exactly: Mongo-style `_id` fields,
//! camelCase names, and reference fields that arrive either as a bare id
//! or as a populated object depending on the route. Amounts are decimal
//! values carried as JSON numbers.

use chrono::{DateTime, Utc};
use folio_core::{BookFormat, BookId, CategoryId, Email, OrderId, OrderStatus, ReviewId, Role, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// References
// ─────────────────────────────────────────────────────────────────────────────

/// A category reference, populated or not depending on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated {
        #[serde(rename = "_id")]
        id: CategoryId,
        name: String,
    },
    Id(CategoryId),
}

impl CategoryRef {
    #[must_use]
    pub fn id(&self) -> &CategoryId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    /// The category name, when the route populated it.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated { name, .. } => Some(name),
            Self::Id(_) => None,
        }
    }
}

/// A user reference, populated or not depending on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
        name: String,
        email: Option<String>,
    },
    Id(UserId),
}

impl UserRef {
    #[must_use]
    pub fn id(&self) -> &UserId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    /// The user name, when the route populated it.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated { name, .. } => Some(name),
            Self::Id(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// A customer review embedded in a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub name: String,
    pub rating: f64,
    pub comment: String,
    pub user: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    /// Admin who listed the book.
    pub user: Option<UserRef>,
    pub title: String,
    pub author: String,
    pub image: String,
    pub category: CategoryRef,
    pub description: String,
    /// Whether a super admin has approved the listing for sale.
    #[serde(default)]
    pub approved: bool,
    pub approved_by: Option<UserRef>,
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub rating: f64,
    pub num_reviews: u32,
    /// Sale price. See [`Book::original_price`] when a discount applies.
    pub price: Decimal,
    pub count_in_stock: u32,
    pub publisher: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub pages: Option<u32>,
    #[serde(default)]
    pub format: BookFormat,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub is_new_release: bool,
    #[serde(default)]
    pub is_special_offer: bool,
    /// Percentage already taken off [`Book::price`].
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// The list price before the discount was applied, rounded to cents.
    ///
    /// `None` when the book is not discounted.
    #[must_use]
    pub fn original_price(&self) -> Option<Decimal> {
        if self.discount_percentage <= Decimal::ZERO
            || self.discount_percentage >= Decimal::from(100)
        {
            return None;
        }
        let factor = Decimal::ONE - self.discount_percentage / Decimal::from(100);
        Some((self.price / factor).round_dp(2))
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.count_in_stock > 0
    }
}

/// One page of a book search.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub page: u32,
    pub pages: u32,
}

/// Search filters for the book catalog. All filters combine.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    /// Case-insensitive title match.
    pub keyword: Option<String>,
    pub category: Option<CategoryId>,
    pub bestseller: bool,
    pub new_release: bool,
    pub special_offer: bool,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl BookQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if self.bestseller {
            params.push(("bestseller", "true".to_string()));
        }
        if self.new_release {
            params.push(("newRelease", "true".to_string()));
        }
        if self.special_offer {
            params.push(("specialOffer", "true".to_string()));
        }
        if let Some(page) = self.page {
            params.push(("pageNumber", page.to_string()));
        }
        params
    }
}

/// Fields for listing a new book.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: CategoryId,
    pub price: Decimal,
    pub count_in_stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BookFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bestseller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_release: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_special_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub genres: Vec<String>,
}

/// Partial update of an existing book. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_in_stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BookFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bestseller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_release: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_special_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

/// A new review for a book.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewInput {
    /// 1 to 5.
    pub rating: f64,
    pub comment: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

/// A catalog category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub featured: bool,
    pub parent_category: Option<CategoryRef>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<CategoryId>,
}

/// Partial update of an existing category. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<CategoryId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Login or registration payload, converted into a session by the
/// account service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthenticatedUser {
    #[serde(rename = "_id")]
    pub(crate) id: UserId,
    pub(crate) name: String,
    pub(crate) email: Email,
    pub(crate) role: Option<Role>,
    pub(crate) is_admin: Option<bool>,
    pub(crate) token: String,
    pub(crate) refresh_token: Option<String>,
    /// Token lifetime in seconds, when the backend states one.
    pub(crate) expires_in: Option<i64>,
}

/// Response of the token refresh endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenewedToken {
    pub(crate) token: String,
    pub(crate) refresh_token: Option<String>,
    pub(crate) expires_in: Option<i64>,
}

/// The signed-in user's own profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Option<Role>,
    #[serde(default)]
    pub is_admin: bool,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Rotated bearer token after a profile update. Consumed by the
    /// account service, which folds it into the stored session.
    pub(crate) token: Option<String>,
}

/// Partial update of the signed-in user's profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A user account as seen by admins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Option<Role>,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Admin-side update of another user's account.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Only honored when the caller is a super admin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

/// Fields for creating an admin or super admin account.
#[derive(Debug, Clone, Serialize)]
pub struct AdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub book: BookId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price at the time of purchase.
    pub price: Decimal,
    pub quantity: u32,
}

/// Payment processor confirmation attached when an order is paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: Option<String>,
    pub email_address: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user: UserRef,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_result: Option<PaymentResult>,
    pub items_price: Option<Decimal>,
    pub tax_price: Option<Decimal>,
    pub shipping_price: Option<Decimal>,
    pub total_price: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for placing a new order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_price: Option<Decimal>,
    pub total_price: Decimal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

/// A count with a human-readable period-over-period change label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountChange {
    pub count: u64,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueSummary {
    pub total: Decimal,
    pub change: String,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub books: CountChange,
    pub users: CountChange,
    pub orders: CountChange,
    pub revenue: RevenueSummary,
}

/// Revenue in one reporting period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenuePoint {
    pub period: String,
    pub revenue: Decimal,
}

/// Sales attributed to one admin's listings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSales {
    pub admin_id: UserId,
    pub admin_name: String,
    pub admin_email: String,
    pub total_books: u64,
    pub total_sales: u64,
    pub total_revenue: Decimal,
    pub estimated_profit: Decimal,
}

/// Profit breakdown for one reporting period.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfitPoint {
    pub period: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Formatted label such as `"30.00%"`.
    pub margin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovals {
    pub pending_books: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBreakdown {
    pub total_customers: u64,
    pub total_admins: u64,
    pub total_super_admins: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBreakdown {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    /// Formatted label such as `"75.00%"`.
    pub approval_rate: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBreakdown {
    pub total: u64,
    pub paid: u64,
    pub unpaid: u64,
    pub delivered: u64,
    /// Formatted label such as `"60.00%"`.
    pub conversion_rate: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBreakdown {
    pub total_revenue: Decimal,
    pub total_items: u64,
    /// The backend sends this formatted to two decimals, or a bare zero
    /// when there are no paid orders.
    #[serde(deserialize_with = "decimal_from_string_or_number")]
    pub average_order_value: Decimal,
}

/// Platform-wide totals for super admins.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformStats {
    pub users: UserBreakdown,
    pub books: BookBreakdown,
    pub orders: OrderBreakdown,
    pub sales: SalesBreakdown,
}

fn decimal_from_string_or_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Decimal::try_from(value).map_err(serde::de::Error::custom),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

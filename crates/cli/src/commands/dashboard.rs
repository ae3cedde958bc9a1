//! Admin dashboard commands.
//!
//! # Usage
//!
//! ```bash
//! folio dashboard stats
//! folio dashboard platform
//! ```
//!
//! Both require an admin session; `platform` requires super admin.

use folio_client::{ApiError, Client};

/// Show the headline dashboard numbers.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the request fails.
pub async fn stats(client: &Client) -> Result<(), ApiError> {
    let stats = client.dashboard().stats().await?;

    tracing::info!("Books: {} ({})", stats.books.count, stats.books.change);
    tracing::info!("Users: {} ({})", stats.users.count, stats.users.change);
    tracing::info!("Orders: {} ({})", stats.orders.count, stats.orders.change);
    tracing::info!(
        "Revenue: {} ({})",
        stats.revenue.total,
        stats.revenue.change
    );
    Ok(())
}

/// Show the platform-wide statistics.
///
/// # Errors
///
/// Returns an error if the caller is not a super admin or the request
/// fails.
pub async fn platform(client: &Client) -> Result<(), ApiError> {
    let stats = client.dashboard().platform_stats().await?;

    tracing::info!("Users: {}", stats.users.total);
    tracing::info!("  Customers: {}", stats.users.total_customers);
    tracing::info!("  Admins: {}", stats.users.total_admins);
    tracing::info!("  Super admins: {}", stats.users.total_super_admins);

    tracing::info!("Books: {}", stats.books.total);
    tracing::info!("  Approved: {}", stats.books.approved);
    tracing::info!("  Pending: {}", stats.books.pending);
    tracing::info!("  Approval rate: {}", stats.books.approval_rate);

    tracing::info!("Orders: {}", stats.orders.total);
    tracing::info!("  Paid: {}", stats.orders.paid);
    tracing::info!("  Unpaid: {}", stats.orders.unpaid);
    tracing::info!("  Delivered: {}", stats.orders.delivered);
    tracing::info!("  Conversion rate: {}", stats.orders.conversion_rate);

    tracing::info!("Revenue: {}", stats.sales.total_revenue);
    tracing::info!("  Items sold: {}", stats.sales.total_items);
    tracing::info!("  Average order: {}", stats.sales.average_order_value);
    Ok(())
}

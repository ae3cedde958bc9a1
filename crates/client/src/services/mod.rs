//! Typed access to each backend resource group.

mod account;
mod books;
mod categories;
mod dashboard;
mod orders;
mod users;

pub use account::AccountService;
pub use books::BooksService;
pub use categories::CategoriesService;
pub use dashboard::{DashboardService, ReportPeriod};
pub use orders::OrdersService;
pub use users::UsersService;

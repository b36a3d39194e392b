//! Database access layer
//!
//! Free async functions over `&PgPool`, one module per table owner:
//! `products` owns the catalog (products, category, products_category),
//! `orders` owns orders and billing_info, `users` owns users.

pub mod orders;
pub mod products;
pub mod users;

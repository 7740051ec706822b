//! Categories feature.
//!
//! Layered as handlers → service → repository → PostgreSQL. Categories are
//! soft-deleted by default: a `deleted` category stays in the table but is
//! invisible to every endpoint.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/categories` | Create a category |
//! | GET | `/categories` | List categories (paged, filterable) |
//! | GET | `/categories/{id}` | Get category by id |
//! | PATCH | `/categories/{id}` | Partially update a category |
//! | DELETE | `/categories/{id}?hard=` | Soft or hard delete a category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCategoryRepository;
pub use services::CategoryService;

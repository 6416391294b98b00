//! Google Sheets access through the v4 REST API.

mod auth;
mod client;
mod credentials;

pub use auth::{SHEETS_READONLY_SCOPE, TokenProvider};
pub use client::GoogleSheetsClient;
pub use credentials::ServiceAccountKey;

pub mod auth;
pub mod google_sheets;

pub use google_sheets::GoogleSheetsClient;

pub mod admin;
pub mod helpers;
pub mod snippets;
pub mod types;

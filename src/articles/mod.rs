//! Stateless article navigation.
//!
//! Which entry a page shows, and where its links lead, is computed entirely
//! from the request's query parameters. Nothing about a reader's position is
//! kept on the server.

pub mod cursor;
pub mod filter;
pub mod list;
pub mod params;

pub use filter::{ArticleFilter, Direction, EntryOrder};
pub use list::ArticleList;
pub use params::QueryParams;

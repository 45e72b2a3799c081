// Job listings: filtered paging, status tracking, ingest of scraped listings.

pub mod handlers;
pub mod repository;

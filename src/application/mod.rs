//! Application services: the listing controller and the seams it drives.

pub mod document;
pub mod error;
pub mod feed_check;
pub mod listing;
pub mod repos;

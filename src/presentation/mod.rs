//! View models and askama templates for post cards.

pub mod views;

//! Wire types shared by the Sermo API and its clients.

pub mod api;
pub mod models;

//! API request/response models.

pub mod users;

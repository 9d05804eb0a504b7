//! Authentication: password hashing and the request credential extractor.

pub mod current_user;
pub mod password;

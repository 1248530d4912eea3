//! # Yatube Shared
//!
//! Wire types shared by the server and its clients: request forms,
//! page contexts and problem responses.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;

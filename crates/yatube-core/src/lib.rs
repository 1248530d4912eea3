//! # Yatube Core
//!
//! The domain layer of Yatube: entities, ports, pagination and the services
//! that assemble feeds, author posts, attach comments and maintain the follow
//! graph. This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldErrors, RepoError};
pub use pagination::{Page, Paginator};

//! Observability - request IDs carried through tracing spans and responses.

mod request_id;

pub use request_id::{RequestId, RequestIdMiddleware};

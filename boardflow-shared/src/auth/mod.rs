/// Authentication and authorization
///
/// - `token`: verification of the identity service's bearer tokens
/// - `access`: board-scoped role checks used by every mutating operation

pub mod access;
pub mod token;

pub use access::AccessError;
pub use token::{Actor, TokenError};

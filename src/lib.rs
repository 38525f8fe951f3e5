//! repokit: a generic data-access layer for SeaORM-backed services.
//!
//! One repository implementation covers CRUD, pagination, and transaction
//! scoping for any entity; store failures classify into coded domain errors;
//! the response envelope and request context give callers a uniform surface.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod repository;
pub mod response;

pub use context::RequestContext;
pub use error::{error_chain, Error, ErrorCode, Result};
pub use repository::{Entity, GenericRepository, QueryOptions, Repository};
pub use response::{ApiResponse, PageResult};

//! Generic repository over SeaORM: one CRUD/pagination/transaction surface
//! shared by every entity, with no per-entity boilerplate.

pub mod generic;
pub mod options;

pub use generic::GenericRepository;
pub use options::QueryOptions;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseTransaction, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, TryIntoModel,
};

use crate::error::Result;

/// Primary-key value type of an entity.
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Future returned by a transaction closure, borrowing the transaction handle.
pub type TxFuture<'t, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 't>>;

/// Capability marking a SeaORM entity as manageable by the generic repository.
///
/// Pure contract: it binds the entity to its active-model type and exposes a
/// stable storage identifier. Opting in is one line per entity:
///
/// ```ignore
/// impl repokit::repository::Entity for note::Entity {
///     type ActiveModel = note::ActiveModel;
/// }
/// ```
pub trait Entity: EntityTrait + Default {
    type ActiveModel: ActiveModelTrait<Entity = Self>
        + ActiveModelBehavior
        + TryIntoModel<Self::Model>
        + Send
        + 'static;

    /// Stable, non-empty storage location identifier (the table name).
    /// Used in error messages and logging, never in query construction.
    fn storage_name() -> String {
        Self::default().table_name().to_owned()
    }
}

/// The repository capability set, parameterized by an [`Entity`] type.
///
/// All operations are synchronous round-trips to the store; nothing retries
/// and nothing is cached. Cancellation and timeouts belong to the caller's
/// runtime and the store's pool.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity,
    E::Model: IntoActiveModel<<E as Entity>::ActiveModel> + Send + Sync,
{
    /// Repository type produced by [`Repository::with_tx`].
    type Tx<'t>: Repository<E>;

    /// Persist a new entity. Returns the stored row, including any
    /// store-generated identifiers.
    async fn create(&self, entity: <E as Entity>::ActiveModel) -> Result<E::Model>;

    /// Fetch a single entity by id, or by the options' condition when `id`
    /// is `None`.
    ///
    /// A provided id wins: the condition and args are ignored, though
    /// preloads and modifiers still apply. With neither an id nor a usable
    /// condition the call fails with [`ErrorCode::QUERY_PARAM_EMPTY`] before
    /// reaching the store. Zero matching rows yield the configured not-found
    /// error wrapping a [`sea_orm::DbErr::RecordNotFound`] sentinel, so
    /// callers can branch on "does not exist" without string matching.
    ///
    /// [`ErrorCode::QUERY_PARAM_EMPTY`]: crate::error::ErrorCode::QUERY_PARAM_EMPTY
    async fn get(
        &self,
        id: Option<PrimaryKeyOf<E>>,
        opts: Option<&QueryOptions<E>>,
    ) -> Result<E::Model>;

    /// Save an entity by identity: inserts when the primary key is unset,
    /// otherwise updates every field present on the value.
    async fn update(&self, entity: <E as Entity>::ActiveModel) -> Result<E::Model>;

    /// Delete by identity. Deleting an id that does not exist is not an
    /// error.
    async fn delete(&self, id: PrimaryKeyOf<E>) -> Result<()>;

    /// Fetch at most `page_size` rows starting at offset
    /// `(page - 1) * page_size`. `page` is 1-based; `page == 0` is clamped
    /// to the first page. Query options compose as preloads, then
    /// modifiers, then the condition.
    async fn list(
        &self,
        page: u64,
        page_size: u64,
        opts: Option<&QueryOptions<E>>,
    ) -> Result<Vec<E::Model>>;

    /// Total rows matching the options. Preloads are ignored: a joined
    /// relation must not multiply the count.
    async fn count(&self, opts: Option<&QueryOptions<E>>) -> Result<u64>;

    /// Run `f` against a transactional handle. Commits iff `f` returns
    /// `Ok`; otherwise the transaction rolls back and `f`'s error is
    /// returned unchanged.
    ///
    /// Every repository call inside `f` must go through a repository
    /// obtained via [`Repository::with_tx`], or it will target the outer
    /// handle and escape the transaction.
    async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> TxFuture<'t, T> + Send,
        T: Send;

    /// Rebind to a transaction handle, preserving the configured not-found
    /// code. Returns a new repository; the receiver keeps its original
    /// handle.
    fn with_tx<'t>(&self, tx: &'t DatabaseTransaction) -> Self::Tx<'t>;
}

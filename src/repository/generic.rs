use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    IntoActiveModel, PaginatorTrait, QuerySelect, Select, TransactionError, TransactionTrait,
    TryIntoModel,
};

use crate::error::{Error, ErrorCode, Result};
use crate::repository::{Entity, PrimaryKeyOf, QueryOptions, Repository, TxFuture};

/// The one implementation of [`Repository`]: a stateless façade over a
/// borrowed connection handle plus the not-found code it reports.
///
/// Instances are cheap and short-lived; create one per unit of work and drop
/// it. The handle is never swapped after construction — [`Repository::with_tx`]
/// returns a new repository instead of redirecting this one.
pub struct GenericRepository<'c, E, C = DatabaseConnection> {
    conn: &'c C,
    not_found_code: ErrorCode,
    entity: PhantomData<fn() -> E>,
}

impl<E, C> Clone for GenericRepository<'_, E, C> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            not_found_code: self.not_found_code,
            entity: PhantomData,
        }
    }
}

impl<'c, E, C> GenericRepository<'c, E, C>
where
    E: Entity,
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            not_found_code: ErrorCode::NOT_FOUND,
            entity: PhantomData,
        }
    }

    /// Report zero-row reads with `code` instead of the default
    /// [`ErrorCode::NOT_FOUND`].
    pub fn with_not_found_code(self, code: ErrorCode) -> Self {
        Self {
            not_found_code: code,
            ..self
        }
    }

    pub fn not_found_code(&self) -> ErrorCode {
        self.not_found_code
    }

    /// SeaORM reports zero rows as `Ok(None)`, so the store sentinel is
    /// manufactured here and wrapped as the cause: unwrapping the domain
    /// error still yields a `DbErr::RecordNotFound`.
    fn not_found_error(&self) -> Error {
        let name = E::storage_name();
        Error::new(self.not_found_code, format!("{name} not found"))
            .wrap(DbErr::RecordNotFound(name))
    }

    /// Fixed composition order: preloads, then modifiers, then the
    /// condition. Get-by-id skips the condition; count skips preloads.
    fn apply_options(
        select: Select<E>,
        opts: Option<&QueryOptions<E>>,
        with_preloads: bool,
        with_condition: bool,
    ) -> Select<E> {
        let Some(opts) = opts else {
            return select;
        };
        let mut select = select;
        if with_preloads {
            select = opts.apply_preloads(select);
        }
        select = opts.apply_modifiers(select);
        if with_condition {
            select = opts.apply_condition(select);
        }
        select
    }
}

#[async_trait]
impl<'c, E, C> Repository<E> for GenericRepository<'c, E, C>
where
    E: Entity,
    E::Model: IntoActiveModel<<E as Entity>::ActiveModel> + Send + Sync,
    C: ConnectionTrait + TransactionTrait,
{
    type Tx<'t> = GenericRepository<'t, E, DatabaseTransaction>;

    async fn create(&self, entity: <E as Entity>::ActiveModel) -> Result<E::Model> {
        entity.insert(self.conn).await.map_err(Error::from)
    }

    async fn get(
        &self,
        id: Option<PrimaryKeyOf<E>>,
        opts: Option<&QueryOptions<E>>,
    ) -> Result<E::Model> {
        let select = match id {
            Some(id) => Self::apply_options(E::find_by_id(id), opts, true, false),
            None => {
                if !opts.is_some_and(QueryOptions::has_condition) {
                    return Err(Error::query_param_empty());
                }
                Self::apply_options(E::find(), opts, true, true)
            }
        };

        select
            .one(self.conn)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| self.not_found_error())
    }

    async fn update(&self, entity: <E as Entity>::ActiveModel) -> Result<E::Model> {
        entity
            .save(self.conn)
            .await
            .map_err(Error::from)?
            .try_into_model()
            .map_err(Error::from)
    }

    async fn delete(&self, id: PrimaryKeyOf<E>) -> Result<()> {
        E::delete_by_id(id)
            .exec(self.conn)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn list(
        &self,
        page: u64,
        page_size: u64,
        opts: Option<&QueryOptions<E>>,
    ) -> Result<Vec<E::Model>> {
        // Pages are 1-based; 0 clamps to the first page.
        let page = page.max(1);
        let offset = (page - 1) * page_size;

        let select = E::find().offset(offset).limit(page_size);
        let select = Self::apply_options(select, opts, true, true);

        select.all(self.conn).await.map_err(Error::from)
    }

    async fn count(&self, opts: Option<&QueryOptions<E>>) -> Result<u64> {
        let select = Self::apply_options(E::find(), opts, false, true);
        select.count(self.conn).await.map_err(Error::from)
    }

    async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> TxFuture<'t, T> + Send,
        T: Send,
    {
        self.conn
            .transaction::<_, T, Error>(f)
            .await
            .map_err(|err| match err {
                // Begin/commit failures classify like any other store error;
                // the closure's own error comes back verbatim after rollback.
                TransactionError::Connection(db_err) => Error::from(db_err),
                TransactionError::Transaction(err) => err,
            })
    }

    fn with_tx<'t>(&self, tx: &'t DatabaseTransaction) -> Self::Tx<'t> {
        GenericRepository {
            conn: tx,
            not_found_code: self.not_found_code,
            entity: PhantomData,
        }
    }
}

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, TryIntoModel,
};

use yatube_core::error::RepoError;
use yatube_core::ports::BaseRepository;

type EntityOf<A> = <A as ActiveModelTrait>::Entity;
type ModelOf<A> = <EntityOf<A> as EntityTrait>::Model;
type KeyOf<A> = <<EntityOf<A> as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Generic PostgreSQL repository over a SeaORM active model.
pub struct PostgresBaseRepository<A>
where
    A: ActiveModelTrait,
{
    pub(crate) db: DbConn,
    _model: PhantomData<fn() -> A>,
}

impl<A> PostgresBaseRepository<A>
where
    A: ActiveModelTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _model: PhantomData,
        }
    }
}

/// Classify a SeaORM error, surfacing unique/foreign key violations as constraints.
pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err_str),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        _ if err_str.contains("duplicate")
            || err_str.contains("unique")
            || err_str.contains("foreign key") =>
        {
            RepoError::Constraint(err_str)
        }
        _ => RepoError::Query(err_str),
    }
}

#[async_trait]
impl<A, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + TryIntoModel<ModelOf<A>> + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Send + Sync,
    ID: Into<KeyOf<A>> + Send + Sync + 'static,
    T: From<ModelOf<A>> + Into<A> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = <EntityOf<A> as EntityTrait>::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        // Unset primary keys insert, set ones update.
        let active_model: A = entity.into();
        let saved = active_model.save(&self.db).await.map_err(map_db_err)?;

        let model = saved
            .try_into_model()
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(model.into())
    }
}

//! Shared test fixtures: an in-memory sqlite store, two related entities,
//! and seed helpers.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Set};
use uuid::Uuid;

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::note::Entity")]
        Notes,
    }

    impl Related<super::note::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Notes.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl repokit::repository::Entity for Entity {
        type ActiveModel = ActiveModel;
    }
}

pub mod note {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub user_id: Uuid,
        pub title: String,
        pub body: Option<String>,
        pub created_at: TimeDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id"
        )]
        User,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl repokit::repository::Entity for Entity {
        type ActiveModel = ActiveModel;
    }
}

/// Fresh in-memory store with the test schema.
///
/// A single pooled connection: every handle sees the same in-memory
/// database, and tests run statements sequentially anyway.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.expect("sqlite connect");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(user::Entity)))
        .await
        .expect("create users table");
    db.execute(backend.build(&schema.create_table_from_entity(note::Entity)))
        .await
        .expect("create notes table");

    db
}

pub fn now() -> sea_orm::prelude::TimeDateTime {
    let now = time::OffsetDateTime::now_utc();
    time::PrimitiveDateTime::new(now.date(), now.time())
}

pub async fn seed_user(db: &DatabaseConnection, name: &str) -> user::Model {
    use sea_orm::ActiveModelTrait;

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_note(db: &DatabaseConnection, user_id: Uuid, title: &str) -> note::Model {
    use sea_orm::ActiveModelTrait;

    note::ActiveModel {
        user_id: Set(user_id),
        title: Set(title.to_owned()),
        body: Set(None),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed note")
}

//! History entry entity for SeaORM.
//!
//! Entries are immutable once created: the schema has no update path, only
//! insert and whole-row delete.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "history_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    /// Display name of the saving user, captured at append time.
    pub author_name: String,
    /// Kind-specific field map, normalized against the field schema.
    #[sea_orm(column_type = "JsonBinary")]
    pub fields: JsonValue,
    /// Server-assigned; monotonically non-decreasing within a job.
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_delete = "Cascade"
    )]
    Job,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

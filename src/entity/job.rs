//! Job entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Job kind: qc_assembly, teach_assembly, qc_hotpress, laser_hotpress.
    pub kind: String,
    /// Owning engineer's identity-provider id.
    pub owner_id: String,
    /// Denormalized display name for cheap listing.
    pub owner_name: String,
    pub machine: String,
    pub model: String,
    pub part_number: String,
    pub start_date: Date,
    pub deadline: Date,
    pub loan_date: Option<Date>,
    /// Target percentage for QC kinds; NULL means the 97.0 default.
    pub target_percentage: Option<f64>,
    /// Cached output of the progress calculator; rewritten on every history
    /// append or delete, never edited directly.
    pub progress: i32,
    pub last_updated: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::history_entry::Entity")]
    HistoryEntries,
}

impl Related<super::history_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoryEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

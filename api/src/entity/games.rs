//! `games` table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// JSON array of participant names
    #[sea_orm(column_type = "JsonBinary")]
    pub participants: Json,
    /// JSON array of winner objects, oldest first
    #[sea_orm(column_type = "JsonBinary")]
    pub winners: Json,
    pub version: i64,
    pub schema_version: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

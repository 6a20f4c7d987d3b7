use sea_orm::entity::prelude::*;

/// A student's application to a bursary.
/// `stage` holds the pipeline stage name; withdrawal sets `soft_delete` instead.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bursary_id: Uuid,
    pub student_id: Uuid,
    pub stage: String,
    pub remarks: Option<String>,
    pub soft_delete: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bursaries::Entity",
        from = "Column::BursaryId",
        to = "super::bursaries::Column::Id"
    )]
    Bursary,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::bursaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bursary.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

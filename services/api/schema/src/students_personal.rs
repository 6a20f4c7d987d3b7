use sea_orm::entity::prelude::*;

/// Personal section of a student's profile. One row per student.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students_personal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: Uuid,
    pub dob: chrono::NaiveDate,
    pub gender: String,
    pub citizenship: String,
    pub birth_county: String,
    pub birth_sub_county: String,
    pub ward: String,
    pub residence: String,
    pub id_number: Option<String>,
    pub phone: String,
    pub special_need: bool,
    pub special_needs_type: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

/// Institution and bank section of a student's profile. One row per student.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students_institution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: Uuid,
    pub inst_name: String,
    pub inst_type: String,
    pub inst_county: String,
    pub inst_sub_county: String,
    pub principal_name: String,
    pub year_joined: i32,
    pub curr_class_level: String,
    pub adm_no: String,
    pub bank_name: String,
    pub bank_branch: String,
    pub bank_acc_name: String,
    pub bank_acc_no: String,
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

use sea_orm::entity::prelude::*;

/// A parent or guardian listed on a student's profile. A student may have several.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students_guardians")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub phone: String,
    pub phone_alternate: Option<String>,
    pub email: Option<String>,
    pub id_number: String,
    pub kra_pin_no: Option<String>,
    pub passport_no: Option<String>,
    pub alien_no: Option<String>,
    pub occupation: Option<String>,
    pub work_location: Option<String>,
    pub work_phone: Option<String>,
    pub relationship: String,
    pub address: Option<String>,
    pub residence: String,
    pub town: String,
    pub county: String,
    pub sub_county: String,
    pub ward: Option<String>,
    pub voters_card_no: Option<String>,
    pub polling_station: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
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

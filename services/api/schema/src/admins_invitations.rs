use sea_orm::entity::prelude::*;

/// Pending activation for an admin. `token` is the SHA-256 hex of the emailed token.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins_invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub admin_id: Uuid,
    pub expiry: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::system_users::Entity",
        from = "Column::AdminId",
        to = "super::system_users::Column::Id",
        on_delete = "Cascade"
    )]
    Admin,
}

impl Related<super::system_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vendor_assignments::Entity")]
    VendorAssignments,
}

impl Related<super::vendor_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

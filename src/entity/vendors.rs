use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub company_name: String,
    pub contact_email: String,
    pub commission_rate: Decimal,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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

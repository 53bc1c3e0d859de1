use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub platform: String,
    pub external_order_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    pub status: String,
    pub order_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::vendor_assignments::Entity")]
    VendorAssignments,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::vendor_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

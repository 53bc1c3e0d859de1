use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_item_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub vendor_assignment_id: Uuid,
    pub order_item_id: Uuid,
    pub quantity: i32,
    // Snapshot of unit_price * quantity at assignment time; never recomputed.
    pub assigned_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_assignments::Entity",
        from = "Column::VendorAssignmentId",
        to = "super::vendor_assignments::Column::Id"
    )]
    VendorAssignments,
    #[sea_orm(
        belongs_to = "super::order_items::Entity",
        from = "Column::OrderItemId",
        to = "super::order_items::Column::Id"
    )]
    OrderItems,
}

impl Related<super::vendor_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorAssignments.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

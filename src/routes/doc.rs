use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        assignments::{
            AssignItemRequest, AssignmentWithItems, CreateFullAssignmentRequest,
            CreatePartialAssignmentRequest, UpdateAssignmentStatusRequest,
        },
        orders::{IngestItemRequest, IngestOrderRequest, OrderDetails, OrderList, OrderWithItems},
        splitting::{
            ItemAssignmentDetail, OrderItemSummary, OrderSplitting, SplittingAnalytics,
            VendorDistribution,
        },
        vendors::{
            CreateVendorRequest, UpdateVendorRequest, UpdateVendorStatusRequest, VendorList,
        },
    },
    models::{Order, OrderItem, OrderItemAssignment, User, Vendor, VendorAssignment},
    response::{ApiResponse, Meta},
    routes::{assignments, auth, health, orders, params, reports, vendors},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        vendors::create_vendor,
        vendors::list_vendors,
        vendors::get_vendor,
        vendors::update_vendor,
        vendors::update_vendor_status,
        orders::ingest_order,
        orders::list_orders,
        orders::get_order,
        orders::get_order_splitting,
        orders::create_partial_assignment,
        orders::create_full_assignment,
        assignments::remove_item_assignment,
        assignments::update_assignment_status,
        reports::get_splitting_analytics
    ),
    components(
        schemas(
            User,
            Vendor,
            Order,
            OrderItem,
            VendorAssignment,
            OrderItemAssignment,
            CreateVendorRequest,
            UpdateVendorRequest,
            UpdateVendorStatusRequest,
            VendorList,
            IngestOrderRequest,
            IngestItemRequest,
            OrderWithItems,
            OrderDetails,
            OrderList,
            AssignItemRequest,
            CreatePartialAssignmentRequest,
            CreateFullAssignmentRequest,
            UpdateAssignmentStatusRequest,
            AssignmentWithItems,
            ItemAssignmentDetail,
            OrderItemSummary,
            OrderSplitting,
            VendorDistribution,
            SplittingAnalytics,
            params::Pagination,
            params::OrderListQuery,
            params::VendorListQuery,
            params::AnalyticsQuery,
            Meta,
            ApiResponse<Vendor>,
            ApiResponse<VendorList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderDetails>,
            ApiResponse<OrderList>,
            ApiResponse<AssignmentWithItems>,
            ApiResponse<OrderSplitting>,
            ApiResponse<SplittingAnalytics>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Vendors", description = "Vendor registry and approval"),
        (name = "Orders", description = "Order ingestion and lookup"),
        (name = "Assignments", description = "Vendor assignment allocation"),
        (name = "Splitting", description = "Order splitting reports and analytics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct StoreDoc {
    pub id: Uuid,
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<Uuid>,
    pub operating_hours: Option<serde_json::Value>,
    pub website: Option<String>,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct NewStoreDoc {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<Uuid>,
    pub operating_hours: Option<serde_json::Value>,
    pub website: Option<String>,
}

#[derive(ToSchema)]
pub struct StorePatchDoc {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<Uuid>,
    pub operating_hours: Option<serde_json::Value>,
    pub website: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::stores::list,
        crate::routes::stores::get,
        crate::routes::stores::create,
        crate::routes::stores::update,
        crate::routes::stores::delete,
    ),
    components(
        schemas(
            HealthResponse,
            StoreDoc,
            NewStoreDoc,
            StorePatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "stores")
    )
)]
pub struct ApiDoc;

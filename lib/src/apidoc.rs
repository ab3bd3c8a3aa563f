use std::sync::LazyLock;

use utoipa::{
    Modify, OpenApi,
    openapi::{
        Components,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
        server::Server,
    },
};

use crate::{
    models::{
        CompleteUploadRequest, ErrorResponse, GoogleAuthResponse, GoogleLoginRequest,
        PresignFileDescriptor, PresignUploadRequest, PresignUploadResponse, PresignedUploadEntry,
        RefreshAccessRequest, User, WardrobeItem, WardrobeListResponse,
    },
    operations::{self, ACCESS_TOKEN_SCHEME, STORAGE_SERVER_URL, STORAGE_UPLOAD_PATH},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Refy API", version = "1.0.0"),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    tags(
        (name = "Google OAuth", description = "Authentication endpoints using Google OAuth."),
        (name = "Wardrobe", description = "Endpoints for managing wardrobe image uploads and retrieval."),
    ),
    paths(
        operations::google_login,
        operations::get_access,
        operations::presign_upload,
        operations::upload_to_storage,
        operations::complete_upload,
        operations::list_wardrobe_images,
    ),
    components(schemas(
        User,
        GoogleAuthResponse,
        ErrorResponse,
        PresignedUploadEntry,
        PresignUploadResponse,
        WardrobeItem,
        WardrobeListResponse,
        GoogleLoginRequest,
        RefreshAccessRequest,
        PresignUploadRequest,
        PresignFileDescriptor,
        CompleteUploadRequest,
    )),
    modifiers(&ContractAddon),
)]
pub struct ApiDoc;

/// Adds what the derive cannot express: the bearer scheme and the bucket
/// server of the direct upload path.
pub struct ContractAddon;

impl Modify for ContractAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::new);
        components.add_security_scheme(
            ACCESS_TOKEN_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

        if let Some(item) = openapi.paths.paths.get_mut(STORAGE_UPLOAD_PATH) {
            item.servers = Some(vec![Server::new(STORAGE_SERVER_URL)]);
        }
    }
}

static DOCUMENT: LazyLock<utoipa::openapi::OpenApi> = LazyLock::new(ApiDoc::openapi);

/// The contract document, built on first access and shared read-only after.
pub fn document() -> &'static utoipa::openapi::OpenApi {
    &DOCUMENT
}

pub fn document_json() -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(document())
}

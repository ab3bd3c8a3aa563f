// Operations served by the Refy backend and by the storage bucket. This
// workspace only documents them: the functions are markers for
// `#[utoipa::path]` and nothing routes to them.

use crate::models::{
    CompleteUploadRequest, ErrorResponse, GoogleAuthResponse, GoogleLoginRequest, ImageUploadBody,
    PresignUploadRequest, PresignUploadResponse, PresignedUploadQuery, RefreshAccessRequest,
    UploadObjectPath, WardrobeImagesQuery, WardrobeListResponse,
};

pub const GOOGLE_OAUTH_TAG: &str = "Google OAuth";
pub const WARDROBE_TAG: &str = "Wardrobe";
pub const ACCESS_TOKEN_SCHEME: &str = "AccessTokenAuth";

pub const STORAGE_UPLOAD_PATH: &str = "/dev/users/{userId}/uploads/{batchId}/{filename}";
pub const STORAGE_SERVER_URL: &str = "https://aiwardrobe.s3.ap-south-1.amazonaws.com";

#[utoipa::path(
    post,
    path = "/api/v1/auth/google",
    tag = "Google OAuth",
    summary = "Google login",
    description = "Receives a Google ID token, verifies it, and returns the user along with access and refresh tokens in the response body.",
    request_body(content = GoogleLoginRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Successfully authenticated with Google", body = GoogleAuthResponse),
        (status = 400, description = "Missing or invalid idToken", body = ErrorResponse),
    ),
)]
pub fn google_login() {}

#[utoipa::path(
    post,
    path = "/api/v1/auth/get-access",
    tag = "Google OAuth",
    summary = "Get new access token",
    description = "Receives a refresh token in the request body, verifies it, and issues a new access token along with the user.",
    request_body(content = RefreshAccessRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "New access token issued successfully.", body = GoogleAuthResponse),
        (status = 401, description = "Missing or invalid refresh token.", body = ErrorResponse),
    ),
)]
pub fn get_access() {}

#[utoipa::path(
    post,
    path = "/api/v1/wardrobe/upload/presign",
    tag = "Wardrobe",
    summary = "Generate S3 presigned URLs",
    description = "Receives file metadata and returns presigned URLs along with S3 keys. Authentication required via Authorization: Bearer <accessToken> header.",
    security(("AccessTokenAuth" = [])),
    request_body(content = PresignUploadRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Presigned URLs created successfully", body = PresignUploadResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized - Missing or invalid access token in Authorization header", body = ErrorResponse),
    ),
)]
pub fn presign_upload() {}

// Called against the bucket, not the backend. The storage server is attached
// to this path by `ContractAddon`.
#[utoipa::path(
    put,
    path = "/dev/users/{userId}/uploads/{batchId}/{filename}",
    tag = "Wardrobe",
    summary = "Upload image to S3 using presigned URL",
    description = "Uploads a single image file directly to the S3 bucket using a presigned URL. This operation is called on the URL returned by the presign API. Do NOT send Authorization headers; all authentication is contained in the query parameters.",
    params(UploadObjectPath, PresignedUploadQuery),
    request_body(
        content = inline(ImageUploadBody),
        content_type = "image/jpeg",
        description = "Raw image bytes"
    ),
    responses(
        (status = 200, description = "File uploaded successfully to S3."),
    ),
)]
pub fn upload_to_storage() {}

#[utoipa::path(
    post,
    path = "/api/v1/wardrobe/upload/complete",
    tag = "Wardrobe",
    summary = "Complete wardrobe upload and fetch image metadata",
    description = "Takes a list of S3 object keys for uploaded wardrobe images, fetches their metadata from the database, and returns paginated results along with signed URLs for access. Requires Authorization: Bearer <accessToken> header.",
    security(("AccessTokenAuth" = [])),
    request_body(content = CompleteUploadRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Wardrobe uploaded images fetched successfully", body = WardrobeListResponse),
        (status = 400, description = "Bad request (e.g. keys missing or invalid)", body = ErrorResponse),
        (status = 401, description = "Unauthorized - Missing or invalid access token in Authorization header", body = ErrorResponse),
    ),
)]
pub fn complete_upload() {}

#[utoipa::path(
    get,
    path = "/api/v1/wardrobe/images",
    tag = "Wardrobe",
    summary = "Get wardrobe uploaded images",
    description = "Returns paginated wardrobe images for the authenticated user, including signed URLs to access each image. Authentication required via Authorization: Bearer <accessToken> header.",
    security(("AccessTokenAuth" = [])),
    params(WardrobeImagesQuery),
    responses(
        (status = 200, description = "Wardrobe uploaded images fetched successfully", body = WardrobeListResponse),
        (status = 401, description = "Unauthorized - Missing or invalid access token in Authorization header", body = ErrorResponse),
    ),
)]
pub fn list_wardrobe_images() {}

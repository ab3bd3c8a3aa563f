// The documented backend operations live in `refy_contract::operations` and
// are not served. Only pages of the docs server itself are routed here.

use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;

mod landing;

pub use landing::LANDING_PAGE;

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().route("/", get(landing::landing))
}

use actix_web::{HttpResponse, web};

use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::aprendiz::{Aprendiz, UpdateAprendiz};
use crate::service::{aprendiz, scoping};
use crate::store::Store;

/// Profile of the calling trainee
#[utoipa::path(
    get,
    path = "/api/aprendices",
    responses(
        (status = 200, description = "Zero or one aprendiz", body = [Aprendiz])
    ),
    security(("bearer_auth" = [])),
    tag = "Aprendices"
)]
pub async fn list_aprendices(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let aprendices = scoping::aprendiz_propio(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(aprendices))
}

/// Update own profile
#[utoipa::path(
    patch,
    path = "/api/aprendices/{aprendiz_id}",
    params(
        ("aprendiz_id" = u64, Path, description = "ID of the caller's aprendiz record")
    ),
    request_body = UpdateAprendiz,
    responses(
        (status = 200, body = Aprendiz),
        (status = 400, description = "Field errors"),
        (status = 403, description = "Trainees only"),
        (status = 404, description = "Not the caller's record")
    ),
    security(("bearer_auth" = [])),
    tag = "Aprendices"
)]
pub async fn update_aprendiz(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let aprendiz =
        aprendiz::actualizar_aprendiz(store.get_ref(), &auth, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(aprendiz))
}

use actix_web::{HttpResponse, web};

use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::asistencia::Asistencia;
use crate::service::{instructor, scoping};
use crate::store::Store;

/// Attendance of the calling trainee
#[utoipa::path(
    get,
    path = "/api/asistencias",
    responses(
        (status = 200, description = "Own attendance; empty when the account has no aprendiz profile", body = [Asistencia]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Asistencias"
)]
pub async fn list_asistencias(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let asistencias = scoping::asistencias_propias(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(asistencias))
}

/// Correct an attendance row (instructors only)
#[utoipa::path(
    patch,
    path = "/api/asistencias/{asistencia_id}",
    params(
        ("asistencia_id" = u64, Path, description = "ID of the attendance row")
    ),
    request_body(
        content = Object,
        description = "Any of `fecha_asistencia` (YYYY-MM-DD) and `presente`; other keys are ignored",
        example = json!({ "presente": false })
    ),
    responses(
        (status = 200, description = "Updated row", body = Asistencia),
        (status = 400, description = "Field errors"),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "Row not in the instructor's fichas")
    ),
    security(("bearer_auth" = [])),
    tag = "Asistencias"
)]
pub async fn update_asistencia(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let asistencia =
        instructor::actualizar_asistencia(store.get_ref(), &auth, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(asistencia))
}

use actix_web::{HttpResponse, web};

use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::novedad::{CreateNovedad, Novedad, UpdateNovedad};
use crate::service::{aceptacion, aprendiz, scoping};
use crate::store::Store;

/// Novedades visible to the caller
#[utoipa::path(
    get,
    path = "/api/novedades",
    responses(
        (status = 200, description = "Own novedades for trainees, novedades of taught fichas for instructors, empty otherwise", body = [Novedad]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Novedades"
)]
pub async fn list_novedades(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let novedades = scoping::novedades_visibles(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(novedades))
}

/// Report a novedad (trainees only)
#[utoipa::path(
    post,
    path = "/api/novedades",
    request_body = CreateNovedad,
    responses(
        (status = 201, description = "Novedad created", body = Novedad),
        (status = 400, description = "Field errors", body = Object, example = json!({
            "fecha_novedad": ["Fecha con formato erróneo. Use uno de los siguientes formatos en su lugar: YYYY-MM-DD."]
        })),
        (status = 403, description = "Not a trainee or no aprendiz profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Novedades"
)]
pub async fn create_novedad(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let novedad = aprendiz::crear_novedad(store.get_ref(), &auth, &body).await?;
    Ok(HttpResponse::Created().json(novedad))
}

/// Novedades of the fichas taught by the calling instructor
#[utoipa::path(
    get,
    path = "/api/instructor/novedades",
    responses(
        (status = 200, body = [Novedad]),
        (status = 403, description = "Instructors only")
    ),
    security(("bearer_auth" = [])),
    tag = "Novedades"
)]
pub async fn novedades_instructor(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let novedades = scoping::novedades_de_mis_fichas(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(novedades))
}

/// Accept, reject or amend a novedad (instructors only)
#[utoipa::path(
    put,
    path = "/api/novedades/{novedad_id}/aceptacion",
    params(
        ("novedad_id" = u64, Path, description = "ID of the novedad")
    ),
    request_body = UpdateNovedad,
    responses(
        (status = 200, description = "Updated novedad", body = Novedad),
        (status = 400, description = "Invalid or empty payload"),
        (status = 403, description = "Not an instructor", body = Object, example = json!({
            "error": "No tienes permiso para realizar esta acción."
        })),
        (status = 404, description = "Novedad not in the instructor's fichas")
    ),
    security(("bearer_auth" = [])),
    tag = "Novedades"
)]
pub async fn accept_novedad(
    auth: Option<AuthUser>,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    review(auth, store, path.into_inner(), &body).await
}

/// Same as the PUT form; either field may be sent alone
#[utoipa::path(
    patch,
    path = "/api/novedades/{novedad_id}/aceptacion",
    params(
        ("novedad_id" = u64, Path, description = "ID of the novedad")
    ),
    request_body = UpdateNovedad,
    responses(
        (status = 200, description = "Updated novedad", body = Novedad),
        (status = 400, description = "Invalid or empty payload"),
        (status = 403, description = "Not an instructor"),
        (status = 404, description = "Novedad not in the instructor's fichas")
    ),
    security(("bearer_auth" = [])),
    tag = "Novedades"
)]
pub async fn patch_novedad(
    auth: Option<AuthUser>,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    review(auth, store, path.into_inner(), &body).await
}

async fn review(
    auth: Option<AuthUser>,
    store: web::Data<dyn Store>,
    novedad_id: u64,
    body: &[u8],
) -> ApiResult<HttpResponse> {
    let novedad =
        aceptacion::actualizar_novedad(store.get_ref(), auth.as_ref(), novedad_id, body).await?;
    Ok(HttpResponse::Ok().json(novedad))
}

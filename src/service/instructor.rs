//! Read aggregations over an instructor's fichas, plus the instructor's own
//! profile and attendance corrections.

use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    aprendiz::Aprendiz,
    asistencia::{Asistencia, UpdateAsistencia},
    ficha::Ficha,
    instructor::{Instructor, UpdateInstructor},
    parse_object,
};
use crate::service::scoping::{ficha_ids, instructor_propio};
use crate::store::Store;

pub const INSTRUCTOR_NO_ENCONTRADO: &str = "Instructor no encontrado";
pub const FICHA_AJENA: &str = "No tienes permiso para ver los aprendices de esta ficha.";

/// Resolves `id` inside the caller's self-scope; any other instructor is 404.
pub async fn instructor_en_alcance(
    store: &dyn Store,
    user: &AuthUser,
    id: u64,
) -> ApiResult<Instructor> {
    user.require_instructor()?;
    instructor_propio(store, user)
        .await?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| ApiError::not_found(INSTRUCTOR_NO_ENCONTRADO))
}

pub async fn get_fichas(store: &dyn Store, user: &AuthUser, id: u64) -> ApiResult<Vec<Ficha>> {
    let instructor = instructor_en_alcance(store, user, id).await?;
    Ok(store.fichas_of_instructor(instructor.id).await?)
}

/// Aprendices of `ficha_id`, which must be one of the instructor's fichas.
/// The id is compared as text, so `" 100"` or a missing value are refused.
pub async fn lista_aprendices(
    store: &dyn Store,
    user: &AuthUser,
    id: u64,
    ficha_id: Option<&str>,
) -> ApiResult<Vec<Aprendiz>> {
    let instructor = instructor_en_alcance(store, user, id).await?;
    let fichas = ficha_ids(store, instructor.id).await?;

    let ficha = ficha_id
        .and_then(|wanted| fichas.into_iter().find(|f| f.to_string() == wanted))
        .ok_or_else(|| ApiError::forbidden(FICHA_AJENA))?;

    Ok(store.aprendices_in_ficha(ficha).await?)
}

/// Partial update of the instructor row holding the caller's linked document.
/// The body is only read once the caller is known to be an instructor.
pub async fn update_instructor(
    store: &dyn Store,
    user: &AuthUser,
    body: &[u8],
) -> ApiResult<Instructor> {
    user.require_instructor()?;
    let linked = store
        .instructor_by_user(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(INSTRUCTOR_NO_ENCONTRADO))?;
    let instance = store
        .instructor_by_documento(&linked.documento)
        .await?
        .ok_or_else(|| ApiError::not_found(INSTRUCTOR_NO_ENCONTRADO))?;

    let changes = UpdateInstructor::from_payload(&parse_object(body)?)?;
    changes.validate()?;
    let updated = store.update_instructor(instance.id, &changes).await?;
    info!(instructor_id = updated.id, "Instructor profile updated");
    Ok(updated)
}

/// Attendance of every aprendiz in the fichas of the instructor with this
/// document, ficha by ficha. An empty `aprendiz_documento` is no filter.
pub async fn asistencias_de_instructor(
    store: &dyn Store,
    user: &AuthUser,
    documento: &str,
    aprendiz_documento: Option<&str>,
) -> ApiResult<Vec<Asistencia>> {
    user.require_instructor()?;
    let instructor = store
        .instructor_by_documento(documento)
        .await?
        .ok_or_else(|| ApiError::not_found(INSTRUCTOR_NO_ENCONTRADO))?;
    let aprendiz_documento = aprendiz_documento.filter(|d| !d.is_empty());

    let mut asistencias = Vec::new();
    for ficha in ficha_ids(store, instructor.id).await? {
        asistencias.extend(store.asistencias_in_ficha(ficha, aprendiz_documento).await?);
    }
    Ok(asistencias)
}

/// Correction of `fecha_asistencia` / `presente` on a row of the caller's fichas.
pub async fn actualizar_asistencia(
    store: &dyn Store,
    user: &AuthUser,
    asistencia_id: u64,
    body: &[u8],
) -> ApiResult<Asistencia> {
    user.require_instructor()?;
    let fichas = match store.instructor_by_user(user.user_id).await? {
        Some(instructor) => ficha_ids(store, instructor.id).await?,
        None => Vec::new(),
    };
    let actual = store
        .asistencia_in_fichas(asistencia_id, &fichas)
        .await?
        .ok_or_else(|| ApiError::not_found("Asistencia no encontrada"))?;

    let changes = UpdateAsistencia::from_payload(&parse_object(body)?)?;
    if changes.is_empty() {
        return Ok(actual);
    }

    let updated = store.update_asistencia(actual.id, &changes).await?;
    info!(asistencia_id = updated.id, user_id = user.user_id, "Attendance corrected");
    Ok(updated)
}

//! Review of novedades by instructors.

use tracing::{info, instrument};

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    novedad::{Novedad, UpdateNovedad},
    role::Role,
};
use crate::service::scoping::ficha_ids;
use crate::store::Store;

pub const SIN_CREDENCIALES: &str = "Las credenciales de autenticación no se proveyeron.";
pub const SIN_PERMISO: &str = "No tienes permiso para realizar esta acción.";
pub const SIN_CAMBIOS: &str = "Debe enviar al menos uno de los campos: estado, descripcion.";

/// Permission granted on novedad mutation, resolved per request.
#[derive(Debug, PartialEq)]
pub enum NovedadPermission<'a> {
    /// No authenticated principal.
    Denied,
    Instructor(&'a AuthUser),
    /// Authenticated, but nothing beyond read access.
    Default,
}

impl<'a> NovedadPermission<'a> {
    pub fn resolve(user: Option<&'a AuthUser>) -> Self {
        match user {
            None => NovedadPermission::Denied,
            Some(user) => match user.role {
                Role::Instructor => NovedadPermission::Instructor(user),
                Role::Trainee | Role::Other => NovedadPermission::Default,
            },
        }
    }
}

/// Applies an instructor's review to a novedad of one of their fichas.
///
/// The permission is checked before the body is parsed, so a trainee gets 403
/// whatever they send.
#[instrument(name = "actualizar_novedad", skip(store, user, body))]
pub async fn actualizar_novedad(
    store: &dyn Store,
    user: Option<&AuthUser>,
    novedad_id: u64,
    body: &[u8],
) -> ApiResult<Novedad> {
    let instructor_user = match NovedadPermission::resolve(user) {
        NovedadPermission::Denied => return Err(ApiError::forbidden(SIN_CREDENCIALES)),
        NovedadPermission::Default => return Err(ApiError::forbidden(SIN_PERMISO)),
        NovedadPermission::Instructor(user) => user,
    };

    let changes: UpdateNovedad = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("JSON inválido: {}", e)))?;
    changes.validate()?;
    if changes.is_empty() {
        return Err(ApiError::bad_request(SIN_CAMBIOS));
    }

    let fichas = match store.instructor_by_user(instructor_user.user_id).await? {
        Some(instructor) => ficha_ids(store, instructor.id).await?,
        None => Vec::new(),
    };
    let novedad = store
        .novedad_in_fichas(novedad_id, &fichas)
        .await?
        .ok_or_else(|| ApiError::not_found("Novedad no encontrada"))?;

    let updated = store.update_novedad(novedad.id, &changes).await?;
    info!(
        novedad_id = updated.id,
        estado = updated.estado.as_str(),
        user_id = instructor_user.user_id,
        "Novedad reviewed"
    );
    Ok(updated)
}

//! Operations a trainee performs on their own data.

use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    aprendiz::{Aprendiz, UpdateAprendiz},
    novedad::{CreateNovedad, Novedad},
    parse_object,
};
use crate::store::Store;

pub const SIN_PERFIL: &str = "No tienes un perfil de aprendiz asociado.";

pub async fn crear_novedad(
    store: &dyn Store,
    user: &AuthUser,
    body: &[u8],
) -> ApiResult<Novedad> {
    user.require_trainee()?;
    let aprendiz = store
        .aprendiz_by_user(user.user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden(SIN_PERFIL))?;

    let nueva = CreateNovedad::from_payload(&parse_object(body)?)?.validate(aprendiz.id)?;
    let novedad = store.create_novedad(&nueva).await?;
    info!(novedad_id = novedad.id, aprendiz_id = aprendiz.id, "Novedad created");
    Ok(novedad)
}

pub async fn actualizar_aprendiz(
    store: &dyn Store,
    user: &AuthUser,
    id: u64,
    body: &[u8],
) -> ApiResult<Aprendiz> {
    user.require_trainee()?;
    let propio = store
        .aprendiz_by_user(user.user_id)
        .await?
        .filter(|a| a.id == id)
        .ok_or_else(|| ApiError::not_found("Aprendiz no encontrado"))?;

    let changes = UpdateAprendiz::from_payload(&parse_object(body)?)?;
    changes.validate()?;
    Ok(store.update_aprendiz(propio.id, &changes).await?)
}

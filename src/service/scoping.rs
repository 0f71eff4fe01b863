//! Which rows a principal may read.
//!
//! "View own records" paths never fail for lack of a linked Aprendiz or
//! Instructor row: they return an empty list. Only store failures are errors.

use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::{
    aprendiz::Aprendiz, asistencia::Asistencia, instructor::Instructor, novedad::Novedad,
    role::Role,
};
use crate::store::Store;

/// `id_ficha` of every ficha the instructor teaches.
pub async fn ficha_ids(store: &dyn Store, instructor_id: u64) -> ApiResult<Vec<u64>> {
    Ok(store
        .fichas_of_instructor(instructor_id)
        .await?
        .into_iter()
        .map(|f| f.id_ficha)
        .collect())
}

/// Trainees see their own reports; instructors see the reports of every
/// aprendiz in the fichas of the instructor holding their document.
pub async fn novedades_visibles(store: &dyn Store, user: &AuthUser) -> ApiResult<Vec<Novedad>> {
    match user.role {
        Role::Trainee => match store.aprendiz_by_user(user.user_id).await? {
            Some(aprendiz) => Ok(store.novedades_of_aprendiz(aprendiz.id).await?),
            None => Ok(Vec::new()),
        },
        Role::Instructor => match store.instructor_by_documento(&user.document).await? {
            Some(instructor) => {
                let fichas = ficha_ids(store, instructor.id).await?;
                Ok(store.novedades_in_fichas(&fichas).await?)
            }
            None => Ok(Vec::new()),
        },
        Role::Other => Ok(Vec::new()),
    }
}

/// Reports of the fichas taught by the instructor linked to this account.
pub async fn novedades_de_mis_fichas(
    store: &dyn Store,
    user: &AuthUser,
) -> ApiResult<Vec<Novedad>> {
    user.require_instructor()?;
    match store.instructor_by_user(user.user_id).await? {
        Some(instructor) => {
            let fichas = ficha_ids(store, instructor.id).await?;
            Ok(store.novedades_in_fichas(&fichas).await?)
        }
        None => Ok(Vec::new()),
    }
}

pub async fn asistencias_propias(store: &dyn Store, user: &AuthUser) -> ApiResult<Vec<Asistencia>> {
    match store.aprendiz_by_user(user.user_id).await? {
        Some(aprendiz) => Ok(store.asistencias_of_aprendiz(aprendiz.id).await?),
        None => Ok(Vec::new()),
    }
}

pub async fn aprendiz_propio(store: &dyn Store, user: &AuthUser) -> ApiResult<Vec<Aprendiz>> {
    Ok(store.aprendiz_by_user(user.user_id).await?.into_iter().collect())
}

/// The instructor row sharing the document of the account's linked instructor.
pub async fn instructor_propio(store: &dyn Store, user: &AuthUser) -> ApiResult<Vec<Instructor>> {
    let Some(linked) = store.instructor_by_user(user.user_id).await? else {
        return Ok(Vec::new());
    };
    Ok(store
        .instructor_by_documento(&linked.documento)
        .await?
        .into_iter()
        .collect())
}

//! Registration of a single attendance row by an instructor.
//!
//! Steps run in a fixed order and the first failure is returned:
//! instructor identity, ficha, horario, aprendiz payload shape, aprendiz
//! document, enrollment of the aprendiz in the ficha, field validation.

use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    asistencia::{Asistencia, NewAsistencia},
    parse_object,
};
use crate::store::Store;

pub const FICHA_NO_ENCONTRADA: &str = "Ficha no encontrada";
pub const HORARIO_NO_EXISTE: &str = "Horario no existe";
pub const APRENDIZ_NO_EXISTE: &str = "Aprendiz no existe.";
pub const APRENDIZ_MAL_FORMADO: &str =
    "Datos del aprendiz no proporcionados o en un formato incorrecto.";
pub const DOCUMENTO_FALTANTE: &str = "Documento del aprendiz no proporcionado.";
pub const SIN_PERMISO: &str = "No tienes permiso para registrar asistencia para este instructor.";

/// Business ids arrive as JSON numbers or numeric strings.
fn business_id(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `Ok(None)` when the document has a type no aprendiz can match.
fn documento(aprendiz: &Map<String, Value>) -> ApiResult<Option<String>> {
    match aprendiz.get("documento_aprendiz") {
        None | Some(Value::Null) => Err(ApiError::bad_request(DOCUMENTO_FALTANTE)),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Ok(None),
    }
}

#[instrument(name = "registrar_asistencia", skip(store, user, body), fields(user_id = user.user_id))]
pub async fn registrar_asistencia(
    store: &dyn Store,
    user: &AuthUser,
    instructor_id: u64,
    body: &[u8],
) -> ApiResult<Asistencia> {
    // 1. the caller must be an instructor, and the one being acted on
    if !user.is_instructor() {
        info!("Rejected attendance registration by a non-instructor");
        return Err(ApiError::forbidden(SIN_PERMISO));
    }
    let instructor = store
        .instructor(instructor_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Instructor no encontrado"))?;
    if instructor.user_id != user.user_id {
        info!("Rejected attendance registration for another instructor");
        return Err(ApiError::forbidden(SIN_PERMISO));
    }

    let data = parse_object(body)?;

    // 2. ficha
    let ficha = match business_id(data.get("ficha_id")) {
        Some(id) => store.ficha(id).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found(FICHA_NO_ENCONTRADA))?;

    // 3. horario; checked to exist, not recorded on the row
    let _horario = match business_id(data.get("horario_id")) {
        Some(id) => store.horario(id).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found(HORARIO_NO_EXISTE))?;

    // 4. nested aprendiz object, absent counts as empty
    let empty = Map::new();
    let aprendiz_data = match data.get("aprendiz") {
        None => &empty,
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(ApiError::bad_request(APRENDIZ_MAL_FORMADO)),
    };

    // 5. document
    let documento = documento(aprendiz_data)?;

    // 6. the aprendiz must be enrolled in this ficha
    let aprendiz = match documento {
        Some(doc) => store.aprendiz_in_ficha(&doc, ficha.id_ficha).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found(APRENDIZ_NO_EXISTE))?;

    // 7. only aprendiz, fecha_asistencia and presente reach the store
    let nueva = NewAsistencia::validate(
        aprendiz.id,
        data.get("fecha_asistencia"),
        data.get("presente"),
    )?;
    let asistencia = store.create_asistencia(&nueva).await?;

    info!(
        asistencia_id = asistencia.id,
        aprendiz_id = aprendiz.id,
        id_ficha = ficha.id_ficha,
        "Attendance registered"
    );
    Ok(asistencia)
}

pub mod aprendiz;
pub mod asistencia;
pub mod ficha;
pub mod horario;
pub mod instructor;
pub mod novedad;
pub mod role;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

pub(crate) const REQUIRED: &str = "Este campo es requerido.";
const TEXTO_INVALIDO: &str = "Introduzca una cadena de texto válida.";

/// Request bodies are read as a JSON object; field types are checked afterwards
/// so mistakes come back as field errors.
pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(data)) => Ok(data),
        Ok(_) => Err(ApiError::bad_request("El cuerpo debe ser un objeto JSON.")),
        Err(e) => Err(ApiError::bad_request(format!("JSON inválido: {}", e))),
    }
}

/// Optional text field; absent and `null` are both `None`.
pub(crate) fn text_field(
    errors: &mut FieldErrors,
    data: &Map<String, Value>,
    field: &str,
) -> Option<String> {
    match data.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            push_error(errors, field, TEXTO_INVALIDO);
            None
        }
    }
}

pub(crate) fn parse_fecha(value: &Value) -> Result<NaiveDate, &'static str> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or("Fecha con formato erróneo. Use uno de los siguientes formatos en su lugar: YYYY-MM-DD.")
}

pub(crate) fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.entry(field.to_string()).or_default().push(message.to_string());
}

pub(crate) fn check_no_vacio(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if matches!(value, Some(v) if v.trim().is_empty()) {
        push_error(errors, field, "Este campo no puede estar en blanco.");
    }
}

pub(crate) fn check_correo(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    let Some(correo) = value else { return };
    let valido = correo
        .split_once('@')
        .is_some_and(|(usuario, dominio)| !usuario.is_empty() && dominio.contains('.'));
    if !valido {
        push_error(errors, field, "Introduzca una dirección de correo electrónico válida.");
    }
}

pub(crate) fn check_numero_celular(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    let Some(numero) = value else { return };
    if numero.len() > 15 || !numero.chars().all(|c| c.is_ascii_digit()) {
        push_error(errors, field, "Ingrese un número de celular válido (solo dígitos, máximo 15).");
    }
}

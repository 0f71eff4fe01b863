use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::FieldErrors;
use crate::model::{REQUIRED, parse_fecha, push_error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 40,
    "aprendiz": 12,
    "fecha_asistencia": "2023-10-30",
    "presente": true
}))]
pub struct Asistencia {
    #[schema(example = 40)]
    pub id: u64,
    /// Surrogate id of the aprendiz.
    #[schema(example = 12)]
    pub aprendiz: u64,
    #[schema(example = "2023-10-30", format = "date", value_type = String)]
    pub fecha_asistencia: NaiveDate,
    #[schema(example = true)]
    pub presente: bool,
}

/// Validated fields of an attendance row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsistencia {
    pub aprendiz: u64,
    pub fecha_asistencia: NaiveDate,
    pub presente: bool,
}

impl NewAsistencia {
    /// Validates the raw `fecha_asistencia`/`presente` values of a request for an
    /// already resolved aprendiz. Absent keys and JSON `null` are both "missing".
    pub fn validate(
        aprendiz: u64,
        fecha_asistencia: Option<&Value>,
        presente: Option<&Value>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let fecha = required(&mut errors, "fecha_asistencia", fecha_asistencia, parse_fecha);
        let presente = required(&mut errors, "presente", presente, parse_presente);

        match (fecha, presente) {
            (Some(fecha_asistencia), Some(presente)) if errors.is_empty() => Ok(NewAsistencia {
                aprendiz,
                fecha_asistencia,
                presente,
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update accepted on an existing attendance row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateAsistencia {
    pub fecha_asistencia: Option<NaiveDate>,
    pub presente: Option<bool>,
}

impl UpdateAsistencia {
    /// Only `fecha_asistencia` and `presente` may change; `aprendiz` and `id` are
    /// ignored like any other unknown key.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let fecha_asistencia =
            optional(&mut errors, "fecha_asistencia", payload.get("fecha_asistencia"), parse_fecha);
        let presente = optional(&mut errors, "presente", payload.get("presente"), parse_presente);

        if errors.is_empty() {
            Ok(UpdateAsistencia { fecha_asistencia, presente })
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fecha_asistencia.is_none() && self.presente.is_none()
    }
}

fn required<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    parse: fn(&Value) -> Result<T, &'static str>,
) -> Option<T> {
    match value {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(v) => parse(v).map_err(|msg| push_error(errors, field, msg)).ok(),
    }
}

fn optional<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    parse: fn(&Value) -> Result<T, &'static str>,
) -> Option<T> {
    match value {
        None => None,
        Some(Value::Null) => {
            push_error(errors, field, "Este campo no puede ser nulo.");
            None
        }
        Some(v) => parse(v).map_err(|msg| push_error(errors, field, msg)).ok(),
    }
}

fn parse_presente(value: &Value) -> Result<bool, &'static str> {
    const INVALID: &str = "Debe ser un valor booleano válido.";
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(INVALID),
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(INVALID),
        },
        _ => Err(INVALID),
    }
}

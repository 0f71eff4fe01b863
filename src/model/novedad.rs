use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::FieldErrors;
use crate::model::{REQUIRED, check_no_vacio, parse_fecha, push_error, text_field};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum EstadoNovedad {
    #[default]
    Pendiente,
    Aceptada,
    Rechazada,
}

impl EstadoNovedad {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoNovedad::Pendiente => "PENDIENTE",
            EstadoNovedad::Aceptada => "ACEPTADA",
            EstadoNovedad::Rechazada => "RECHAZADA",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "aprendiz": 12,
    "fecha_novedad": "2023-10-30",
    "descripcion": "Cita médica en la mañana",
    "estado": "PENDIENTE"
}))]
pub struct Novedad {
    pub id: u64,
    pub aprendiz: u64,
    #[schema(example = "2023-10-30", format = "date", value_type = String)]
    pub fecha_novedad: NaiveDate,
    pub descripcion: String,
    pub estado: EstadoNovedad,
}

/// Body of a trainee's new report. The aprendiz is taken from the principal.
#[derive(Debug, ToSchema)]
pub struct CreateNovedad {
    #[schema(example = "2023-10-30", format = "date", value_type = String)]
    pub fecha_novedad: Option<NaiveDate>,
    #[schema(example = "Cita médica en la mañana")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNovedad {
    pub aprendiz: u64,
    pub fecha_novedad: NaiveDate,
    pub descripcion: String,
}

impl CreateNovedad {
    /// Reads the report fields, reporting type and date format errors per field.
    /// Missing fields are left to `validate`.
    pub fn from_payload(data: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let fecha_novedad = match data.get("fecha_novedad") {
            None | Some(Value::Null) => None,
            Some(raw) => parse_fecha(raw)
                .map_err(|msg| push_error(&mut errors, "fecha_novedad", msg))
                .ok(),
        };
        let descripcion = text_field(&mut errors, data, "descripcion");

        if errors.is_empty() {
            Ok(CreateNovedad { fecha_novedad, descripcion })
        } else {
            Err(errors)
        }
    }

    pub fn validate(self, aprendiz: u64) -> Result<NewNovedad, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.fecha_novedad.is_none() {
            push_error(&mut errors, "fecha_novedad", REQUIRED);
        }
        match self.descripcion.as_deref() {
            None => push_error(&mut errors, "descripcion", REQUIRED),
            descripcion => check_no_vacio(&mut errors, "descripcion", descripcion),
        }

        match (self.fecha_novedad, self.descripcion) {
            (Some(fecha_novedad), Some(descripcion)) if errors.is_empty() => Ok(NewNovedad {
                aprendiz,
                fecha_novedad,
                descripcion: descripcion.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// What an instructor may change when reviewing a report.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct UpdateNovedad {
    pub estado: Option<EstadoNovedad>,
    pub descripcion: Option<String>,
}

impl UpdateNovedad {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_no_vacio(&mut errors, "descripcion", self.descripcion.as_deref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn is_empty(&self) -> bool {
        self.estado.is_none() && self.descripcion.is_none()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::FieldErrors;
use crate::model::{check_correo, check_no_vacio, check_numero_celular, text_field};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Aprendiz {
    #[schema(example = 12)]
    pub id: u64,
    #[serde(skip)]
    pub user_id: u64,
    #[schema(example = "1001234567")]
    pub documento_aprendiz: String,
    #[schema(example = "Camilo")]
    pub nombres: String,
    #[schema(example = "Rojas")]
    pub apellidos: String,
    #[schema(example = "crojas@soy.sena.edu.co", format = "email")]
    pub correo: String,
    #[schema(example = "3109876543", nullable = true)]
    pub numero_celular: Option<String>,
    /// `id_ficha` of the cohort this aprendiz is enrolled in.
    #[schema(example = 2558104)]
    pub ficha_aprendiz: u64,
}

#[derive(Debug, Default, ToSchema)]
pub struct UpdateAprendiz {
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    #[schema(format = "email")]
    pub correo: Option<String>,
    pub numero_celular: Option<String>,
}

impl UpdateAprendiz {
    /// Picks the editable fields out of a request body; other keys are ignored.
    pub fn from_payload(data: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let update = Self {
            nombres: text_field(&mut errors, data, "nombres"),
            apellidos: text_field(&mut errors, data, "apellidos"),
            correo: text_field(&mut errors, data, "correo"),
            numero_celular: text_field(&mut errors, data, "numero_celular"),
        };
        if errors.is_empty() { Ok(update) } else { Err(errors) }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_no_vacio(&mut errors, "nombres", self.nombres.as_deref());
        check_no_vacio(&mut errors, "apellidos", self.apellidos.as_deref());
        check_correo(&mut errors, "correo", self.correo.as_deref());
        check_numero_celular(&mut errors, "numero_celular", self.numero_celular.as_deref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

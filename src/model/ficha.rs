use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({ "id_ficha": 2558104, "programa": "Análisis y Desarrollo de Software" }))]
pub struct Ficha {
    #[schema(example = 2558104)]
    pub id_ficha: u64,
    #[schema(example = "Análisis y Desarrollo de Software")]
    pub programa: String,
}

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HorarioPorDia {
    pub horario_id: u64,
    pub ficha: u64,
    pub dia: String,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
}

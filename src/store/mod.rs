//! Entity store used by the core.
//!
//! Every relationship is navigated through an explicit method taking the foreign
//! key it filters on; nothing is lazily loaded. Lookups of a single row return
//! `Option` so callers decide between an empty result and an error.

pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{
    aprendiz::{Aprendiz, UpdateAprendiz},
    asistencia::{Asistencia, NewAsistencia, UpdateAsistencia},
    ficha::Ficha,
    horario::HorarioPorDia,
    instructor::{Instructor, UpdateInstructor},
    novedad::{NewNovedad, Novedad, UpdateNovedad},
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn ficha(&self, id_ficha: u64) -> StoreResult<Option<Ficha>>;
    /// Fichas linked to the instructor through `instructor_fichas`, by `id_ficha`.
    async fn fichas_of_instructor(&self, instructor_id: u64) -> StoreResult<Vec<Ficha>>;

    async fn horario(&self, horario_id: u64) -> StoreResult<Option<HorarioPorDia>>;

    async fn instructor(&self, id: u64) -> StoreResult<Option<Instructor>>;
    async fn instructor_by_user(&self, user_id: u64) -> StoreResult<Option<Instructor>>;
    async fn instructor_by_documento(&self, documento: &str) -> StoreResult<Option<Instructor>>;
    async fn update_instructor(&self, id: u64, changes: &UpdateInstructor)
    -> StoreResult<Instructor>;

    async fn aprendiz_by_user(&self, user_id: u64) -> StoreResult<Option<Aprendiz>>;
    /// Compound lookup: the aprendiz must be enrolled in `id_ficha`.
    async fn aprendiz_in_ficha(
        &self,
        documento_aprendiz: &str,
        id_ficha: u64,
    ) -> StoreResult<Option<Aprendiz>>;
    async fn aprendices_in_ficha(&self, id_ficha: u64) -> StoreResult<Vec<Aprendiz>>;
    async fn update_aprendiz(&self, id: u64, changes: &UpdateAprendiz) -> StoreResult<Aprendiz>;

    async fn asistencias_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Asistencia>>;
    /// Attendance of every aprendiz enrolled in `id_ficha`, optionally narrowed to
    /// one aprendiz document.
    async fn asistencias_in_ficha(
        &self,
        id_ficha: u64,
        documento_aprendiz: Option<&str>,
    ) -> StoreResult<Vec<Asistencia>>;
    /// The row `id`, only if its aprendiz is enrolled in one of `fichas`.
    async fn asistencia_in_fichas(&self, id: u64, fichas: &[u64])
    -> StoreResult<Option<Asistencia>>;
    async fn create_asistencia(&self, nueva: &NewAsistencia) -> StoreResult<Asistencia>;
    async fn update_asistencia(&self, id: u64, changes: &UpdateAsistencia)
    -> StoreResult<Asistencia>;

    async fn novedades_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Novedad>>;
    /// Reports of aprendices enrolled in any of `fichas`.
    async fn novedades_in_fichas(&self, fichas: &[u64]) -> StoreResult<Vec<Novedad>>;
    async fn novedad_in_fichas(&self, id: u64, fichas: &[u64]) -> StoreResult<Option<Novedad>>;
    async fn create_novedad(&self, nueva: &NewNovedad) -> StoreResult<Novedad>;
    async fn update_novedad(&self, id: u64, changes: &UpdateNovedad) -> StoreResult<Novedad>;
}

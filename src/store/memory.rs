//! In-memory `Store` for tests, with a small seeded dataset.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::auth::auth::AuthUser;
use crate::error::StoreResult;
use crate::model::{
    aprendiz::{Aprendiz, UpdateAprendiz},
    asistencia::{Asistencia, NewAsistencia, UpdateAsistencia},
    ficha::Ficha,
    horario::HorarioPorDia,
    instructor::{Instructor, UpdateInstructor},
    novedad::{EstadoNovedad, NewNovedad, Novedad, UpdateNovedad},
    role::Role,
};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    fichas: Vec<Ficha>,
    instructors: Vec<Instructor>,
    /// (instructor_id, id_ficha)
    instructor_fichas: Vec<(u64, u64)>,
    aprendices: Vec<Aprendiz>,
    horarios: Vec<HorarioPorDia>,
    asistencias: Vec<Asistencia>,
    novedades: Vec<Novedad>,
}

impl Tables {
    fn ficha_of(&self, aprendiz_id: u64) -> Option<u64> {
        self.aprendices
            .iter()
            .find(|a| a.id == aprendiz_id)
            .map(|a| a.ficha_aprendiz)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn asistencias(&self) -> Vec<Asistencia> {
        self.tables.read().expect("memory store poisoned").asistencias.clone()
    }

    pub fn novedades(&self) -> Vec<Novedad> {
        self.tables.read().expect("memory store poisoned").novedades.clone()
    }

    pub fn instructors(&self) -> Vec<Instructor> {
        self.tables.read().expect("memory store poisoned").instructors.clone()
    }

    pub fn aprendices(&self) -> Vec<Aprendiz> {
        self.tables.read().expect("memory store poisoned").aprendices.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ficha(&self, id_ficha: u64) -> StoreResult<Option<Ficha>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.fichas.iter().find(|f| f.id_ficha == id_ficha).cloned())
    }

    async fn fichas_of_instructor(&self, instructor_id: u64) -> StoreResult<Vec<Ficha>> {
        let t = self.tables.read().expect("memory store poisoned");
        let mut fichas: Vec<Ficha> = t
            .fichas
            .iter()
            .filter(|f| t.instructor_fichas.contains(&(instructor_id, f.id_ficha)))
            .cloned()
            .collect();
        fichas.sort_by_key(|f| f.id_ficha);
        Ok(fichas)
    }

    async fn horario(&self, horario_id: u64) -> StoreResult<Option<HorarioPorDia>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.horarios.iter().find(|h| h.horario_id == horario_id).cloned())
    }

    async fn instructor(&self, id: u64) -> StoreResult<Option<Instructor>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.instructors.iter().find(|i| i.id == id).cloned())
    }

    async fn instructor_by_user(&self, user_id: u64) -> StoreResult<Option<Instructor>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.instructors.iter().find(|i| i.user_id == user_id).cloned())
    }

    async fn instructor_by_documento(&self, documento: &str) -> StoreResult<Option<Instructor>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.instructors.iter().find(|i| i.documento == documento).cloned())
    }

    async fn update_instructor(
        &self,
        id: u64,
        changes: &UpdateInstructor,
    ) -> StoreResult<Instructor> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let instructor = t
            .instructors
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if let Some(v) = &changes.nombres {
            instructor.nombres = v.trim().to_string();
        }
        if let Some(v) = &changes.apellidos {
            instructor.apellidos = v.trim().to_string();
        }
        if let Some(v) = &changes.correo {
            instructor.correo = v.trim().to_string();
        }
        if let Some(v) = &changes.numero_celular {
            instructor.numero_celular = Some(v.trim().to_string());
        }
        Ok(instructor.clone())
    }

    async fn aprendiz_by_user(&self, user_id: u64) -> StoreResult<Option<Aprendiz>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.aprendices.iter().find(|a| a.user_id == user_id).cloned())
    }

    async fn aprendiz_in_ficha(
        &self,
        documento_aprendiz: &str,
        id_ficha: u64,
    ) -> StoreResult<Option<Aprendiz>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.aprendices
            .iter()
            .find(|a| a.documento_aprendiz == documento_aprendiz && a.ficha_aprendiz == id_ficha)
            .cloned())
    }

    async fn aprendices_in_ficha(&self, id_ficha: u64) -> StoreResult<Vec<Aprendiz>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.aprendices
            .iter()
            .filter(|a| a.ficha_aprendiz == id_ficha)
            .cloned()
            .collect())
    }

    async fn update_aprendiz(&self, id: u64, changes: &UpdateAprendiz) -> StoreResult<Aprendiz> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let aprendiz = t
            .aprendices
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if let Some(v) = &changes.nombres {
            aprendiz.nombres = v.trim().to_string();
        }
        if let Some(v) = &changes.apellidos {
            aprendiz.apellidos = v.trim().to_string();
        }
        if let Some(v) = &changes.correo {
            aprendiz.correo = v.trim().to_string();
        }
        if let Some(v) = &changes.numero_celular {
            aprendiz.numero_celular = Some(v.trim().to_string());
        }
        Ok(aprendiz.clone())
    }

    async fn asistencias_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Asistencia>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.asistencias
            .iter()
            .filter(|a| a.aprendiz == aprendiz_id)
            .cloned()
            .collect())
    }

    async fn asistencias_in_ficha(
        &self,
        id_ficha: u64,
        documento_aprendiz: Option<&str>,
    ) -> StoreResult<Vec<Asistencia>> {
        let t = self.tables.read().expect("memory store poisoned");
        let aprendices: Vec<u64> = t
            .aprendices
            .iter()
            .filter(|a| a.ficha_aprendiz == id_ficha)
            .filter(|a| documento_aprendiz.is_none_or(|d| a.documento_aprendiz == d))
            .map(|a| a.id)
            .collect();
        Ok(t.asistencias
            .iter()
            .filter(|a| aprendices.contains(&a.aprendiz))
            .cloned()
            .collect())
    }

    async fn asistencia_in_fichas(
        &self,
        id: u64,
        fichas: &[u64],
    ) -> StoreResult<Option<Asistencia>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.asistencias
            .iter()
            .find(|a| a.id == id && t.ficha_of(a.aprendiz).is_some_and(|f| fichas.contains(&f)))
            .cloned())
    }

    async fn create_asistencia(&self, nueva: &NewAsistencia) -> StoreResult<Asistencia> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let id = t.asistencias.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let asistencia = Asistencia {
            id,
            aprendiz: nueva.aprendiz,
            fecha_asistencia: nueva.fecha_asistencia,
            presente: nueva.presente,
        };
        t.asistencias.push(asistencia.clone());
        Ok(asistencia)
    }

    async fn update_asistencia(
        &self,
        id: u64,
        changes: &UpdateAsistencia,
    ) -> StoreResult<Asistencia> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let asistencia = t
            .asistencias
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if let Some(fecha) = changes.fecha_asistencia {
            asistencia.fecha_asistencia = fecha;
        }
        if let Some(presente) = changes.presente {
            asistencia.presente = presente;
        }
        Ok(asistencia.clone())
    }

    async fn novedades_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Novedad>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.novedades
            .iter()
            .filter(|n| n.aprendiz == aprendiz_id)
            .cloned()
            .collect())
    }

    async fn novedades_in_fichas(&self, fichas: &[u64]) -> StoreResult<Vec<Novedad>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.novedades
            .iter()
            .filter(|n| t.ficha_of(n.aprendiz).is_some_and(|f| fichas.contains(&f)))
            .cloned()
            .collect())
    }

    async fn novedad_in_fichas(&self, id: u64, fichas: &[u64]) -> StoreResult<Option<Novedad>> {
        let t = self.tables.read().expect("memory store poisoned");
        Ok(t.novedades
            .iter()
            .find(|n| n.id == id && t.ficha_of(n.aprendiz).is_some_and(|f| fichas.contains(&f)))
            .cloned())
    }

    async fn create_novedad(&self, nueva: &NewNovedad) -> StoreResult<Novedad> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let id = t.novedades.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let novedad = Novedad {
            id,
            aprendiz: nueva.aprendiz,
            fecha_novedad: nueva.fecha_novedad,
            descripcion: nueva.descripcion.clone(),
            estado: EstadoNovedad::default(),
        };
        t.novedades.push(novedad.clone());
        Ok(novedad)
    }

    async fn update_novedad(&self, id: u64, changes: &UpdateNovedad) -> StoreResult<Novedad> {
        let mut t = self.tables.write().expect("memory store poisoned");
        let novedad = t
            .novedades
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if let Some(estado) = changes.estado {
            novedad.estado = estado;
        }
        if let Some(descripcion) = &changes.descripcion {
            novedad.descripcion = descripcion.trim().to_string();
        }
        Ok(novedad.clone())
    }
}

/// Seeded dataset shared by the service and handler tests.
///
/// - instructor 1 (user 10, doc `I-1`) teaches fichas 100 and 200
/// - instructor 2 (user 20, doc `I-2`) teaches ficha 300
/// - aprendiz 1 (user 101, `A-1`) in 100, aprendiz 2 (user 102, `A-2`) in 200,
///   aprendiz 3 (user 103, `A-3`) in 300
/// - horario 1 belongs to ficha 100, horario 2 to ficha 300
/// - one asistencia each for aprendices 1 and 3, one novedad per aprendiz
pub mod fixture {
    use super::*;

    pub const INSTRUCTOR_1_USER: u64 = 10;
    pub const INSTRUCTOR_2_USER: u64 = 20;
    pub const APRENDIZ_1_USER: u64 = 101;
    pub const APRENDIZ_3_USER: u64 = 103;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
    }

    fn instructor(id: u64, user_id: u64, documento: &str, nombres: &str) -> Instructor {
        Instructor {
            id,
            user_id,
            documento: documento.into(),
            nombres: nombres.into(),
            apellidos: "Pérez".into(),
            correo: format!("{}@sena.edu.co", documento.to_lowercase()),
            numero_celular: None,
        }
    }

    fn aprendiz(id: u64, user_id: u64, documento: &str, ficha: u64) -> Aprendiz {
        Aprendiz {
            id,
            user_id,
            documento_aprendiz: documento.into(),
            nombres: format!("Aprendiz {}", id),
            apellidos: "Rojas".into(),
            correo: format!("{}@soy.sena.edu.co", documento.to_lowercase()),
            numero_celular: Some("3100000000".into()),
            ficha_aprendiz: ficha,
        }
    }

    fn horario(horario_id: u64, ficha: u64) -> HorarioPorDia {
        HorarioPorDia {
            horario_id,
            ficha,
            dia: "LUNES".into(),
            hora_inicio: NaiveTime::from_hms_opt(7, 0, 0).expect("fixture time"),
            hora_fin: NaiveTime::from_hms_opt(13, 0, 0).expect("fixture time"),
        }
    }

    fn novedad(id: u64, aprendiz: u64) -> Novedad {
        Novedad {
            id,
            aprendiz,
            fecha_novedad: date("2023-10-03"),
            descripcion: format!("Novedad del aprendiz {}", aprendiz),
            estado: EstadoNovedad::Pendiente,
        }
    }

    pub fn store() -> MemoryStore {
        let tables = Tables {
            fichas: vec![
                Ficha { id_ficha: 100, programa: "Análisis y Desarrollo de Software".into() },
                Ficha { id_ficha: 200, programa: "Gestión Contable".into() },
                Ficha { id_ficha: 300, programa: "Cocina".into() },
            ],
            instructors: vec![
                instructor(1, INSTRUCTOR_1_USER, "I-1", "Laura"),
                instructor(2, INSTRUCTOR_2_USER, "I-2", "Mario"),
            ],
            instructor_fichas: vec![(1, 100), (1, 200), (2, 300)],
            aprendices: vec![
                aprendiz(1, APRENDIZ_1_USER, "A-1", 100),
                aprendiz(2, 102, "A-2", 200),
                aprendiz(3, APRENDIZ_3_USER, "A-3", 300),
            ],
            horarios: vec![horario(1, 100), horario(2, 300)],
            asistencias: vec![
                Asistencia { id: 1, aprendiz: 1, fecha_asistencia: date("2023-10-02"), presente: true },
                Asistencia { id: 2, aprendiz: 3, fecha_asistencia: date("2023-10-02"), presente: false },
            ],
            novedades: vec![novedad(1, 1), novedad(2, 2), novedad(3, 3)],
        };
        MemoryStore { tables: RwLock::new(tables) }
    }

    pub fn principal(user_id: u64, document: &str, role: Role) -> AuthUser {
        AuthUser {
            user_id,
            username: format!("user{}", user_id),
            document: document.into(),
            role,
        }
    }

    pub fn instructor_1() -> AuthUser {
        principal(INSTRUCTOR_1_USER, "I-1", Role::Instructor)
    }

    pub fn instructor_2() -> AuthUser {
        principal(INSTRUCTOR_2_USER, "I-2", Role::Instructor)
    }

    pub fn aprendiz_1() -> AuthUser {
        principal(APRENDIZ_1_USER, "A-1", Role::Trainee)
    }

    /// A trainee account with no Aprendiz row.
    pub fn trainee_without_record() -> AuthUser {
        principal(999, "A-999", Role::Trainee)
    }
}

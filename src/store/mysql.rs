use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::StoreResult;
use crate::model::{
    aprendiz::{Aprendiz, UpdateAprendiz},
    asistencia::{Asistencia, NewAsistencia, UpdateAsistencia},
    ficha::Ficha,
    horario::HorarioPorDia,
    instructor::{Instructor, UpdateInstructor},
    novedad::{EstadoNovedad, NewNovedad, Novedad, UpdateNovedad},
};
use crate::store::Store;
use crate::utils::db_utils::{SqlUpdate, SqlValue, UpdateSet, execute_update, placeholders};

const INSTRUCTOR_COLUMNS: &str =
    "id, user_id, documento, nombres, apellidos, correo, numero_celular";
const APRENDIZ_COLUMNS: &str =
    "id, user_id, documento_aprendiz, nombres, apellidos, correo, numero_celular, ficha_aprendiz";
const ASISTENCIA_COLUMNS: &str =
    "a.id, a.aprendiz_id AS aprendiz, a.fecha_asistencia, a.presente";
const NOVEDAD_COLUMNS: &str =
    "n.id, n.aprendiz_id AS aprendiz, n.fecha_novedad, n.descripcion, n.estado";

/// `Store` backed by the MySQL schema of the attendance service.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn asistencia(&self, id: u64) -> StoreResult<Option<Asistencia>> {
        let sql = format!("SELECT {} FROM asistencias a WHERE a.id = ?", ASISTENCIA_COLUMNS);
        Ok(sqlx::query_as::<_, Asistencia>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn novedad(&self, id: u64) -> StoreResult<Option<Novedad>> {
        let sql = format!("SELECT {} FROM novedades n WHERE n.id = ?", NOVEDAD_COLUMNS);
        Ok(sqlx::query_as::<_, Novedad>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn aprendiz(&self, id: u64) -> StoreResult<Option<Aprendiz>> {
        let sql = format!("SELECT {} FROM aprendices WHERE id = ?", APRENDIZ_COLUMNS);
        Ok(sqlx::query_as::<_, Aprendiz>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn apply(&self, update: Option<SqlUpdate>) -> StoreResult<()> {
        if let Some(update) = update {
            let rows = execute_update(&self.pool, update).await?;
            debug!(rows, "Partial update applied");
        }
        Ok(())
    }
}

fn text(value: &Option<String>) -> Option<SqlValue> {
    value.as_ref().map(|v| SqlValue::String(v.trim().to_string()))
}

#[async_trait]
impl Store for MySqlStore {
    async fn ficha(&self, id_ficha: u64) -> StoreResult<Option<Ficha>> {
        Ok(
            sqlx::query_as::<_, Ficha>("SELECT id_ficha, programa FROM fichas WHERE id_ficha = ?")
                .bind(id_ficha)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn fichas_of_instructor(&self, instructor_id: u64) -> StoreResult<Vec<Ficha>> {
        Ok(sqlx::query_as::<_, Ficha>(
            r#"
            SELECT f.id_ficha, f.programa
            FROM fichas f
            JOIN instructor_fichas i ON i.ficha_id = f.id_ficha
            WHERE i.instructor_id = ?
            ORDER BY f.id_ficha
            "#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn horario(&self, horario_id: u64) -> StoreResult<Option<HorarioPorDia>> {
        Ok(sqlx::query_as::<_, HorarioPorDia>(
            r#"
            SELECT horario_id, ficha_id AS ficha, dia, hora_inicio, hora_fin
            FROM horarios_por_dia
            WHERE horario_id = ?
            "#,
        )
        .bind(horario_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn instructor(&self, id: u64) -> StoreResult<Option<Instructor>> {
        let sql = format!("SELECT {} FROM instructors WHERE id = ?", INSTRUCTOR_COLUMNS);
        Ok(sqlx::query_as::<_, Instructor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn instructor_by_user(&self, user_id: u64) -> StoreResult<Option<Instructor>> {
        let sql = format!("SELECT {} FROM instructors WHERE user_id = ?", INSTRUCTOR_COLUMNS);
        Ok(sqlx::query_as::<_, Instructor>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn instructor_by_documento(&self, documento: &str) -> StoreResult<Option<Instructor>> {
        let sql = format!("SELECT {} FROM instructors WHERE documento = ?", INSTRUCTOR_COLUMNS);
        Ok(sqlx::query_as::<_, Instructor>(&sql)
            .bind(documento)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_instructor(
        &self,
        id: u64,
        changes: &UpdateInstructor,
    ) -> StoreResult<Instructor> {
        let update = UpdateSet::new()
            .set("nombres", text(&changes.nombres))
            .set("apellidos", text(&changes.apellidos))
            .set("correo", text(&changes.correo))
            .set("numero_celular", text(&changes.numero_celular))
            .build("instructors", "id", id);
        self.apply(update).await?;

        self.instructor(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn aprendiz_by_user(&self, user_id: u64) -> StoreResult<Option<Aprendiz>> {
        let sql = format!("SELECT {} FROM aprendices WHERE user_id = ?", APRENDIZ_COLUMNS);
        Ok(sqlx::query_as::<_, Aprendiz>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn aprendiz_in_ficha(
        &self,
        documento_aprendiz: &str,
        id_ficha: u64,
    ) -> StoreResult<Option<Aprendiz>> {
        let sql = format!(
            "SELECT {} FROM aprendices WHERE documento_aprendiz = ? AND ficha_aprendiz = ?",
            APRENDIZ_COLUMNS
        );
        Ok(sqlx::query_as::<_, Aprendiz>(&sql)
            .bind(documento_aprendiz)
            .bind(id_ficha)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn aprendices_in_ficha(&self, id_ficha: u64) -> StoreResult<Vec<Aprendiz>> {
        let sql = format!(
            "SELECT {} FROM aprendices WHERE ficha_aprendiz = ? ORDER BY apellidos, nombres",
            APRENDIZ_COLUMNS
        );
        Ok(sqlx::query_as::<_, Aprendiz>(&sql)
            .bind(id_ficha)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_aprendiz(&self, id: u64, changes: &UpdateAprendiz) -> StoreResult<Aprendiz> {
        let update = UpdateSet::new()
            .set("nombres", text(&changes.nombres))
            .set("apellidos", text(&changes.apellidos))
            .set("correo", text(&changes.correo))
            .set("numero_celular", text(&changes.numero_celular))
            .build("aprendices", "id", id);
        self.apply(update).await?;

        self.aprendiz(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn asistencias_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Asistencia>> {
        let sql = format!(
            "SELECT {} FROM asistencias a WHERE a.aprendiz_id = ? ORDER BY a.fecha_asistencia, a.id",
            ASISTENCIA_COLUMNS
        );
        Ok(sqlx::query_as::<_, Asistencia>(&sql)
            .bind(aprendiz_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn asistencias_in_ficha(
        &self,
        id_ficha: u64,
        documento_aprendiz: Option<&str>,
    ) -> StoreResult<Vec<Asistencia>> {
        let mut sql = format!(
            r#"
            SELECT {}
            FROM asistencias a
            JOIN aprendices ap ON ap.id = a.aprendiz_id
            WHERE ap.ficha_aprendiz = ?
            "#,
            ASISTENCIA_COLUMNS
        );
        if documento_aprendiz.is_some() {
            sql.push_str(" AND ap.documento_aprendiz = ?");
        }
        sql.push_str(" ORDER BY a.fecha_asistencia, a.id");

        let mut query = sqlx::query_as::<_, Asistencia>(&sql).bind(id_ficha);
        if let Some(documento) = documento_aprendiz {
            query = query.bind(documento);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn asistencia_in_fichas(
        &self,
        id: u64,
        fichas: &[u64],
    ) -> StoreResult<Option<Asistencia>> {
        if fichas.is_empty() {
            return Ok(None);
        }
        let sql = format!(
            r#"
            SELECT {}
            FROM asistencias a
            JOIN aprendices ap ON ap.id = a.aprendiz_id
            WHERE a.id = ? AND ap.ficha_aprendiz IN ({})
            "#,
            ASISTENCIA_COLUMNS,
            placeholders(fichas.len())
        );
        let mut query = sqlx::query_as::<_, Asistencia>(&sql).bind(id);
        for ficha in fichas {
            query = query.bind(*ficha);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn create_asistencia(&self, nueva: &NewAsistencia) -> StoreResult<Asistencia> {
        let result = sqlx::query(
            r#"
            INSERT INTO asistencias (aprendiz_id, fecha_asistencia, presente)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(nueva.aprendiz)
        .bind(nueva.fecha_asistencia)
        .bind(nueva.presente)
        .execute(&self.pool)
        .await?;

        Ok(Asistencia {
            id: result.last_insert_id(),
            aprendiz: nueva.aprendiz,
            fecha_asistencia: nueva.fecha_asistencia,
            presente: nueva.presente,
        })
    }

    async fn update_asistencia(
        &self,
        id: u64,
        changes: &UpdateAsistencia,
    ) -> StoreResult<Asistencia> {
        let update = UpdateSet::new()
            .set("fecha_asistencia", changes.fecha_asistencia.map(SqlValue::Date))
            .set("presente", changes.presente.map(SqlValue::Bool))
            .build("asistencias", "id", id);
        self.apply(update).await?;

        self.asistencia(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn novedades_of_aprendiz(&self, aprendiz_id: u64) -> StoreResult<Vec<Novedad>> {
        let sql = format!(
            "SELECT {} FROM novedades n WHERE n.aprendiz_id = ? ORDER BY n.fecha_novedad, n.id",
            NOVEDAD_COLUMNS
        );
        Ok(sqlx::query_as::<_, Novedad>(&sql)
            .bind(aprendiz_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn novedades_in_fichas(&self, fichas: &[u64]) -> StoreResult<Vec<Novedad>> {
        if fichas.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"
            SELECT {}
            FROM novedades n
            JOIN aprendices ap ON ap.id = n.aprendiz_id
            WHERE ap.ficha_aprendiz IN ({})
            ORDER BY n.fecha_novedad, n.id
            "#,
            NOVEDAD_COLUMNS,
            placeholders(fichas.len())
        );
        let mut query = sqlx::query_as::<_, Novedad>(&sql);
        for ficha in fichas {
            query = query.bind(*ficha);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn novedad_in_fichas(&self, id: u64, fichas: &[u64]) -> StoreResult<Option<Novedad>> {
        if fichas.is_empty() {
            return Ok(None);
        }
        let sql = format!(
            r#"
            SELECT {}
            FROM novedades n
            JOIN aprendices ap ON ap.id = n.aprendiz_id
            WHERE n.id = ? AND ap.ficha_aprendiz IN ({})
            "#,
            NOVEDAD_COLUMNS,
            placeholders(fichas.len())
        );
        let mut query = sqlx::query_as::<_, Novedad>(&sql).bind(id);
        for ficha in fichas {
            query = query.bind(*ficha);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn create_novedad(&self, nueva: &NewNovedad) -> StoreResult<Novedad> {
        let estado = EstadoNovedad::default();
        let result = sqlx::query(
            r#"
            INSERT INTO novedades (aprendiz_id, fecha_novedad, descripcion, estado)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(nueva.aprendiz)
        .bind(nueva.fecha_novedad)
        .bind(&nueva.descripcion)
        .bind(estado.as_str())
        .execute(&self.pool)
        .await?;

        Ok(Novedad {
            id: result.last_insert_id(),
            aprendiz: nueva.aprendiz,
            fecha_novedad: nueva.fecha_novedad,
            descripcion: nueva.descripcion.clone(),
            estado,
        })
    }

    async fn update_novedad(&self, id: u64, changes: &UpdateNovedad) -> StoreResult<Novedad> {
        let update = UpdateSet::new()
            .set("estado", changes.estado.map(|e| SqlValue::String(e.as_str().to_string())))
            .set("descripcion", text(&changes.descripcion))
            .build("novedades", "id", id);
        self.apply(update).await?;

        self.novedad(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }
}

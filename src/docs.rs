use crate::api::instructor::{AsistenciasQuery, ListaAprendicesQuery};
use crate::model::{
    aprendiz::{Aprendiz, UpdateAprendiz},
    asistencia::Asistencia,
    ficha::Ficha,
    instructor::{Instructor, UpdateInstructor},
    novedad::{CreateNovedad, EstadoNovedad, Novedad, UpdateNovedad},
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asistencia API",
        version = "1.0.0",
        description = r#"
## Registro de asistencia

Backend for attendance tracking of training cohorts (**fichas**).

### Key Features
- **Asistencias**: instructors register and correct attendance of the aprendices in their fichas;
  aprendices list their own attendance
- **Novedades**: aprendices report exceptions, instructors of the ficha accept or reject them
- **Instructores**: own profile, taught fichas, aprendices per ficha, attendance across fichas

### Security
Every endpoint requires a **JWT Bearer** access token issued by the account service.
The `user_type` claim (`APRENDIZ` / `INSTRUCTOR`) decides what each caller sees.
Listing endpoints return an empty list when nothing is visible; actions answer 403.
"#,
    ),
    paths(
        crate::api::novedad::list_novedades,
        crate::api::novedad::create_novedad,
        crate::api::novedad::novedades_instructor,
        crate::api::novedad::accept_novedad,
        crate::api::novedad::patch_novedad,

        crate::api::asistencia::list_asistencias,
        crate::api::asistencia::update_asistencia,

        crate::api::aprendiz::list_aprendices,
        crate::api::aprendiz::update_aprendiz,

        crate::api::instructor::list_instructores,
        crate::api::instructor::get_instructor,
        crate::api::instructor::get_fichas,
        crate::api::instructor::lista_aprendices,
        crate::api::instructor::update_instructor,
        crate::api::instructor::registrar_asistencia,
        crate::api::instructor::ver_asistencias
    ),
    components(
        schemas(
            Ficha,
            Instructor,
            UpdateInstructor,
            Aprendiz,
            UpdateAprendiz,
            Asistencia,
            Novedad,
            EstadoNovedad,
            CreateNovedad,
            UpdateNovedad,
            ListaAprendicesQuery,
            AsistenciasQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Asistencias", description = "Attendance records"),
        (name = "Novedades", description = "Attendance exception reports"),
        (name = "Aprendices", description = "Trainee self-service"),
        (name = "Instructores", description = "Instructor views and attendance registration"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

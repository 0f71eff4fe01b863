use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::{
    aprendiz::Aprendiz,
    asistencia::Asistencia,
    ficha::Ficha,
    instructor::{Instructor, UpdateInstructor},
};
use crate::service::{instructor, registro, scoping};
use crate::store::Store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ListaAprendicesQuery {
    /// `id_ficha` of one of the instructor's fichas
    #[schema(example = "2558104")]
    pub ficha_id: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AsistenciasQuery {
    /// Exact document of one aprendiz
    #[schema(example = "1001234567")]
    pub aprendiz_documento: Option<String>,
}

/// The calling instructor's own record
#[utoipa::path(
    get,
    path = "/api/instructores",
    responses(
        (status = 200, description = "Zero or one instructor", body = [Instructor]),
        (status = 403, description = "Instructors only")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn list_instructores(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    auth.require_instructor()?;
    let instructores = scoping::instructor_propio(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(instructores))
}

#[utoipa::path(
    get,
    path = "/api/instructores/{instructor_id}",
    params(("instructor_id" = u64, Path, description = "ID of the caller's instructor record")),
    responses(
        (status = 200, body = Instructor),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "Not the caller's record")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn get_instructor(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let found = instructor::instructor_en_alcance(store.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// Fichas taught by the instructor
#[utoipa::path(
    get,
    path = "/api/instructores/{instructor_id}/get_fichas",
    params(("instructor_id" = u64, Path, description = "ID of the caller's instructor record")),
    responses(
        (status = 200, body = [Ficha]),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "Not the caller's record")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn get_fichas(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let fichas = instructor::get_fichas(store.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(fichas))
}

/// Aprendices of one of the instructor's fichas
#[utoipa::path(
    get,
    path = "/api/instructores/{instructor_id}/lista_aprendices",
    params(
        ("instructor_id" = u64, Path, description = "ID of the caller's instructor record"),
        ListaAprendicesQuery
    ),
    responses(
        (status = 200, body = [Aprendiz]),
        (status = 403, description = "Ficha not taught by this instructor", body = Object, example = json!({
            "error": "No tienes permiso para ver los aprendices de esta ficha."
        })),
        (status = 404, description = "Not the caller's record")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn lista_aprendices(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    query: web::Query<ListaAprendicesQuery>,
) -> ApiResult<HttpResponse> {
    let aprendices = instructor::lista_aprendices(
        store.get_ref(),
        &auth,
        path.into_inner(),
        query.ficha_id.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(aprendices))
}

/// Update the caller's own instructor profile
#[utoipa::path(
    patch,
    path = "/api/instructores/{instructor_id}/update_instructor",
    params(("instructor_id" = u64, Path, description = "Ignored; the caller's record is updated")),
    request_body = UpdateInstructor,
    responses(
        (status = 200, body = Instructor),
        (status = 400, description = "Field errors", body = Object, example = json!({
            "correo": ["Introduzca una dirección de correo electrónico válida."]
        })),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "No instructor record for this account")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn update_instructor(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    _path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let updated = instructor::update_instructor(store.get_ref(), &auth, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Register one attendance event
#[utoipa::path(
    post,
    path = "/api/instructores/{instructor_id}/registrar_asistencia",
    params(("instructor_id" = u64, Path, description = "ID of the caller's instructor record")),
    request_body(
        content = Object,
        description = "Ficha, horario, nested aprendiz and the attendance fields",
        example = json!({
            "ficha_id": 2558104,
            "horario_id": 3,
            "aprendiz": { "documento_aprendiz": "1001234567", "nombres": "Camilo", "apellidos": "Rojas" },
            "fecha_asistencia": "2023-10-30",
            "presente": true
        })
    ),
    responses(
        (status = 201, description = "Attendance created", body = Asistencia),
        (status = 400, description = "Malformed aprendiz data or field errors"),
        (status = 403, description = "Caller is not this instructor", body = Object, example = json!({
            "error": "No tienes permiso para registrar asistencia para este instructor."
        })),
        (status = 404, description = "Ficha, horario or aprendiz (in that ficha) not found", body = Object, example = json!({
            "error": "Aprendiz no existe."
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn registrar_asistencia(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let asistencia =
        registro::registrar_asistencia(store.get_ref(), &auth, path.into_inner(), &body).await?;
    Ok(HttpResponse::Created().json(asistencia))
}

/// Attendance across every ficha of an instructor
#[utoipa::path(
    get,
    path = "/api/instructores/{documento}/asistencias",
    params(
        ("documento" = String, Path, description = "Business document of the instructor"),
        AsistenciasQuery
    ),
    responses(
        (status = 200, body = [Asistencia]),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "No instructor with that document")
    ),
    security(("bearer_auth" = [])),
    tag = "Instructores"
)]
pub async fn ver_asistencias(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    query: web::Query<AsistenciasQuery>,
) -> ApiResult<HttpResponse> {
    let asistencias = instructor::asistencias_de_instructor(
        store.get_ref(),
        &auth,
        &path,
        query.aprendiz_documento.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(asistencias))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{Method, StatusCode};
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::auth::jwt::test_tokens::bearer;
    use crate::config::Config;
    use crate::routes;
    use crate::store::Store;
    use crate::store::memory::fixture;

    macro_rules! test_app {
        ($store:expr) => {{
            let config = Config::for_tests();
            let data: web::Data<dyn Store> = web::Data::from($store as Arc<dyn Store>);
            test::init_service(
                App::new()
                    .app_data(data)
                    .app_data(web::Data::new(config.clone()))
                    .configure(|cfg| routes::configure(cfg, config)),
            )
            .await
        }};
    }

    fn request(method: actix_web::http::Method, uri: &str, auth: &str) -> test::TestRequest {
        test::TestRequest::default()
            .method(method)
            .uri(uri)
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .insert_header(("Authorization", auth.to_string()))
    }

    fn instructor_1() -> String {
        bearer(fixture::INSTRUCTOR_1_USER, "I-1", "INSTRUCTOR")
    }

    #[actix_web::test]
    async fn registration_round_trip() {
        let store = Arc::new(fixture::store());
        let app = test_app!(store.clone());

        let req = request(Method::POST, "/api/instructores/1/registrar_asistencia", &instructor_1())
            .set_json(json!({
                "ficha_id": 100,
                "horario_id": 1,
                "aprendiz": { "documento_aprendiz": "A-1" },
                "fecha_asistencia": "2023-10-30",
                "presente": true
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["aprendiz"], json!(1));
        assert_eq!(body["fecha_asistencia"], json!("2023-10-30"));
        assert_eq!(body["presente"], json!(true));

        let trainee = bearer(fixture::APRENDIZ_1_USER, "A-1", "APRENDIZ");
        let req = request(Method::GET, "/api/asistencias", &trainee).to_request();
        let own: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(own.iter().any(|a| a["id"] == body["id"]));
    }

    #[actix_web::test]
    async fn registration_by_other_instructor_is_forbidden() {
        let store = Arc::new(fixture::store());
        let app = test_app!(store.clone());

        let other = bearer(fixture::INSTRUCTOR_2_USER, "I-2", "INSTRUCTOR");
        let req = request(Method::POST, "/api/instructores/1/registrar_asistencia", &other)
            .set_json(json!({ "ficha_id": 100 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            json!("No tienes permiso para registrar asistencia para este instructor.")
        );
        assert_eq!(store.asistencias().len(), 2);
    }

    #[actix_web::test]
    async fn registration_with_aprendiz_of_other_ficha_is_not_found() {
        let app = test_app!(Arc::new(fixture::store()));
        let req = request(Method::POST, "/api/instructores/1/registrar_asistencia", &instructor_1())
            .set_json(json!({
                "ficha_id": 100,
                "horario_id": 1,
                "aprendiz": { "documento_aprendiz": "A-2" },
                "fecha_asistencia": "2023-10-30",
                "presente": true
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Aprendiz no existe." }));
    }

    #[actix_web::test]
    async fn lista_aprendices_does_not_leak_foreign_ficha() {
        let app = test_app!(Arc::new(fixture::store()));

        let req = request(
            Method::GET,
            "/api/instructores/1/lista_aprendices?ficha_id=300",
            &instructor_1(),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = test::read_body(resp).await;
        assert!(!String::from_utf8_lossy(&body).contains("A-3"));

        let req = request(
            Method::GET,
            "/api/instructores/1/lista_aprendices?ficha_id=100",
            &instructor_1(),
        )
        .to_request();
        let aprendices: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(aprendices.len(), 1);
        assert_eq!(aprendices[0]["documento_aprendiz"], json!("A-1"));
        assert!(aprendices[0].get("user_id").is_none());
    }

    #[actix_web::test]
    async fn novedad_acceptance_by_trainee_is_forbidden() {
        let store = Arc::new(fixture::store());
        let app = test_app!(store.clone());

        let trainee = bearer(fixture::APRENDIZ_1_USER, "A-1", "APRENDIZ");
        let req = request(Method::PATCH, "/api/novedades/1/aceptacion", &trainee)
            .set_payload("definitely not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = request(Method::PUT, "/api/novedades/1/aceptacion", &instructor_1())
            .set_json(json!({ "estado": "ACEPTADA" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["estado"], json!("ACEPTADA"));
    }

    #[actix_web::test]
    async fn novedades_are_scoped_per_role() {
        let app = test_app!(Arc::new(fixture::store()));

        let req = request(Method::GET, "/api/novedades", &instructor_1()).to_request();
        let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let mut ids: Vec<u64> = rows.iter().filter_map(|n| n["id"].as_u64()).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);

        let admin = bearer(1, "ADM", "ADMIN");
        let req = request(Method::GET, "/api/novedades", &admin).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rows: Vec<Value> = test::read_body_json(resp).await;
        assert!(rows.is_empty());
    }

    #[actix_web::test]
    async fn trainee_without_aprendiz_gets_empty_list() {
        let app = test_app!(Arc::new(fixture::store()));
        let req = request(Method::GET, "/api/asistencias", &bearer(999, "A-999", "APRENDIZ"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rows: Vec<Value> = test::read_body_json(resp).await;
        assert!(rows.is_empty());
    }

    #[actix_web::test]
    async fn ver_asistencias_filters_by_aprendiz_document() {
        let app = test_app!(Arc::new(fixture::store()));

        let req = request(
            Method::GET,
            "/api/instructores/I-1/asistencias?aprendiz_documento=A-1",
            &instructor_1(),
        )
        .to_request();
        let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["aprendiz"], json!(1));

        let req = request(Method::GET, "/api/instructores/NADIE/asistencias", &instructor_1())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_or_bad_token_is_unauthorized() {
        let app = test_app!(Arc::new(fixture::store()));

        let req = test::TestRequest::get()
            .uri("/api/novedades")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = request(Method::GET, "/api/novedades", "Bearer not-a-jwt").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn trainee_registration_is_forbidden_for_any_instructor_id() {
        let app = test_app!(Arc::new(fixture::store()));
        let trainee = bearer(fixture::APRENDIZ_1_USER, "A-1", "APRENDIZ");

        for uri in [
            "/api/instructores/1/registrar_asistencia",
            "/api/instructores/42/registrar_asistencia",
        ] {
            let req = request(Method::POST, uri, &trainee)
                .set_json(json!({ "ficha_id": 100 }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }
    }

    #[actix_web::test]
    async fn wrong_field_types_come_back_as_field_errors() {
        let app = test_app!(Arc::new(fixture::store()));

        let req = request(Method::PATCH, "/api/instructores/1/update_instructor", &instructor_1())
            .set_json(json!({ "correo": 123 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["correo"].is_array());

        let trainee = bearer(fixture::APRENDIZ_1_USER, "A-1", "APRENDIZ");
        let req = request(Method::POST, "/api/novedades", &trainee)
            .set_json(json!({ "fecha_novedad": "ayer", "descripcion": "Cita" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["fecha_novedad"].is_array());
    }

    #[actix_web::test]
    async fn role_gate_runs_before_body_parsing() {
        let app = test_app!(Arc::new(fixture::store()));
        let trainee = bearer(fixture::APRENDIZ_1_USER, "A-1", "APRENDIZ");

        let req = request(Method::PATCH, "/api/instructores/1/update_instructor", &trainee)
            .set_payload("definitely not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = request(Method::POST, "/api/novedades", &instructor_1())
            .set_payload("definitely not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

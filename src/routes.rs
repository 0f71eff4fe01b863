use crate::{
    api::{aprendiz, asistencia, instructor, novedad},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Per-IP limiter for the protected scope
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // period and burst are both non-zero here
        .expect("valid rate limiter config");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(build_limiter(config.rate_protected_per_min))
            .service(
                web::scope("/novedades")
                    // /novedades
                    .service(
                        web::resource("")
                            .route(web::get().to(novedad::list_novedades))
                            .route(web::post().to(novedad::create_novedad)),
                    )
                    // /novedades/{id}/aceptacion
                    .service(
                        web::resource("/{id}/aceptacion")
                            .route(web::put().to(novedad::accept_novedad))
                            .route(web::patch().to(novedad::patch_novedad)),
                    ),
            )
            .service(
                web::resource("/instructor/novedades")
                    .route(web::get().to(novedad::novedades_instructor)),
            )
            .service(
                web::scope("/aprendices")
                    .service(web::resource("").route(web::get().to(aprendiz::list_aprendices)))
                    .service(
                        web::resource("/{id}").route(web::patch().to(aprendiz::update_aprendiz)),
                    ),
            )
            .service(
                web::scope("/asistencias")
                    .service(web::resource("").route(web::get().to(asistencia::list_asistencias)))
                    .service(
                        web::resource("/{id}")
                            .route(web::patch().to(asistencia::update_asistencia)),
                    ),
            )
            .service(
                web::scope("/instructores")
                    // /instructores
                    .service(
                        web::resource("").route(web::get().to(instructor::list_instructores)),
                    )
                    // /instructores/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(instructor::get_instructor)),
                    )
                    .service(
                        web::resource("/{id}/get_fichas")
                            .route(web::get().to(instructor::get_fichas)),
                    )
                    .service(
                        web::resource("/{id}/lista_aprendices")
                            .route(web::get().to(instructor::lista_aprendices)),
                    )
                    .service(
                        web::resource("/{id}/update_instructor")
                            .route(web::patch().to(instructor::update_instructor)),
                    )
                    .service(
                        web::resource("/{id}/registrar_asistencia")
                            .route(web::post().to(instructor::registrar_asistencia)),
                    )
                    // /instructores/{documento}/asistencias
                    .service(
                        web::resource("/{documento}/asistencias")
                            .route(web::get().to(instructor::ver_asistencias)),
                    ),
            ),
    );
}

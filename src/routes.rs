use crate::{api::attendance, attendance::AttendanceError, config::Config};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Malformed payloads (bad status variant, unparseable date) get the
    // same {message, statusCode} envelope as every other validation error.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AttendanceError::Validation(err.to_string()).into()),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/bulk
                    .service(
                        web::resource("/bulk")
                            .route(web::put().to(attendance::bulk_update_attendance)),
                    )
                    // /attendance/report (register before /{id})
                    .service(
                        web::resource("/report")
                            .route(web::get().to(attendance::attendance_report)),
                    )
                    // /attendance/{id}
                    .service(web::resource("/{id}").route(web::get().to(attendance::get_attendance))),
            ),
    );
}

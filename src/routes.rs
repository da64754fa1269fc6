use crate::{
    api::{attendance, device, employee},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
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

    // Device actions talk to real hardware and hold a session for the whole
    // request, so they get a tighter limit than the read/config endpoints.
    let action_rate = config.rate_action_per_min;

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
            .service(
                web::scope("/devices")
                    // /devices
                    .service(
                        web::resource("")
                            .route(web::post().to(device::create_device))
                            .route(web::get().to(device::list_devices)),
                    )
                    // operator actions against the physical device
                    .service(
                        web::resource("/{id}/test-connection")
                            .wrap(build_limiter(action_rate))
                            .route(web::post().to(device::test_connection)),
                    )
                    .service(
                        web::resource("/{id}/set-time")
                            .wrap(build_limiter(action_rate))
                            .route(web::post().to(device::set_time)),
                    )
                    .service(
                        web::resource("/{id}/restart")
                            .wrap(build_limiter(action_rate))
                            .route(web::post().to(device::restart_device)),
                    )
                    .service(
                        web::resource("/{id}/clear-attendance")
                            .wrap(build_limiter(action_rate))
                            .route(web::post().to(device::clear_attendance)),
                    )
                    .service(
                        web::resource("/{id}/download")
                            .wrap(build_limiter(action_rate))
                            .route(web::post().to(device::download_attendance)),
                    )
                    // /devices/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(device::get_device))
                            .route(web::put().to(device::update_device))
                            .route(web::delete().to(device::delete_device)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/daily
                    .service(
                        web::resource("/daily").route(web::get().to(attendance::daily_attendance)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee)),
                    ),
            ),
    );
}

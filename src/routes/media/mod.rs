mod carousel;
mod details;
mod discover;
mod latest_trailers;
mod listings;
mod person;
mod search;
mod util;

pub use carousel::*;
pub use details::*;
pub use discover::*;
pub use latest_trailers::*;
pub use listings::*;
pub use person::*;
pub use search::*;
pub use util::*;

use actix_web::{web, Scope};

/// Every proxied resource, mounted under `/api`. Trailing required segments
/// accept the empty string so a missing parameter reaches validation (400)
/// instead of falling through to 404.
pub fn media_source() -> Scope {
    web::scope("/api")
        .service(get_only("/homepage/carousel", get_carousel))
        .service(get_only("/latest-trailers", get_latest_trailers))
        .service(get_only("/trending/{media_type:[^/]*}", get_trending))
        .service(get_only("/popular/{media_type:[^/]*}", get_popular))
        .service(get_only("/top-rated/{media_type:[^/]*}", get_top_rated))
        .service(get_only("/now-playing/{media_type:[^/]*}", get_now_playing))
        .service(get_only(
            "/details/tv/{id:[^/]*}/season/{season_number:[^/]*}",
            get_season_details,
        ))
        .service(get_only(
            "/details/{media_type:[^/]*}/{id:[^/]*}",
            get_details,
        ))
        .service(get_only(
            "/search/{category:[^/]*}/{query:[^/]*}",
            get_search,
        ))
        .service(get_only("/discover/{media_type:[^/]*}", get_discover))
        .service(get_only("/person/{id:[^/]*}", get_person))
}

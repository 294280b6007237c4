use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use filmhub::configuration::get_configuration;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;

pub const TEST_API_KEY: &str = "test-key";
pub const NOT_FOUND_MESSAGE: &str = "The resource you requested could not be found.";

/// Title ids whose detail call fails on the fake provider.
pub const FAILING_DETAIL_IDS: [u64; 2] = [2, 12];

#[derive(Debug, Clone)]
pub struct UpstreamCall {
    pub path: String,
    pub query: HashMap<String, String>,
}

pub type CallLog = web::Data<Mutex<Vec<UpstreamCall>>>;

pub struct TestApp {
    pub address: String,
    pub upstream_calls: CallLog,
}

impl TestApp {
    pub fn calls_to(&self, path: &str) -> Vec<UpstreamCall> {
        self.upstream_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path)
            .cloned()
            .collect()
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "status_code": 34,
        "status_message": NOT_FOUND_MESSAGE
    }))
}

fn summary(id: u64, media_type: &str, backdrop: bool) -> Value {
    let backdrop_path = backdrop.then(|| format!("/backdrop{}.jpg", id));
    json!({
        "id": id,
        "title": format!("{} {}", media_type, id),
        "backdrop_path": backdrop_path,
    })
}

/// Five titles with a backdrop and one without, per media type.
fn trending(media_type: &str) -> Value {
    let offset = if media_type == "tv" { 10 } else { 0 };
    let mut results: Vec<Value> = (1..=5)
        .map(|n| summary(offset + n, media_type, true))
        .collect();
    results.push(summary(offset + 6, media_type, false));
    json!({"page": 1, "results": results, "total_pages": 1, "total_results": 6})
}

/// Echoes every requested sub-resource as an empty result list.
fn detail(id: u64, title: &str, query: &HashMap<String, String>) -> Value {
    let mut body = Map::new();
    body.insert("id".into(), json!(id));
    body.insert("title".into(), json!(title));
    if let Some(append) = query.get("append_to_response") {
        for key in append.split(',') {
            body.insert(key.to_string(), json!({"results": []}));
        }
    }
    Value::Object(body)
}

async fn fake_tmdb(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    calls: CallLog,
) -> HttpResponse {
    let query = query.into_inner();
    let path = req.path().to_string();
    calls.lock().unwrap().push(UpstreamCall {
        path: path.clone(),
        query: query.clone(),
    });

    if query.get("api_key").map(String::as_str) != Some(TEST_API_KEY) {
        return HttpResponse::Unauthorized().json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        }));
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let body = match segments.as_slice() {
        ["trending", media_type, _window] => trending(media_type),
        ["discover", _] => json!({"page": 1, "results": [], "total_pages": 1, "received": query}),
        ["search", _] => {
            let page: u64 = query.get("page").and_then(|page| page.parse().ok()).unwrap_or(1);
            json!({
                "page": page,
                "results": [{"id": page * 10 + 1, "media_type": "movie", "title": format!("{} {}", query["query"], page)}],
                "total_pages": 3,
                "total_results": 3
            })
        }
        [_, "popular" | "now_playing" | "top_rated"] => json!({
            "page": 1,
            "results": (101..=103).map(|id| json!({"id": id, "title": format!("Movie {}", id)})).collect::<Vec<_>>(),
            "total_pages": 1,
            "total_results": 3
        }),
        ["movie", id, "videos"] => {
            let mut videos = vec![json!({"key": format!("teaser{}", id), "type": "Teaser", "site": "YouTube"})];
            if *id != "103" {
                videos.push(json!({"key": format!("yt{}", id), "type": "Trailer", "site": "YouTube"}));
            }
            json!({"id": id, "results": videos})
        }
        ["tv", id, "season", number] => json!({
            "id": id,
            "season_number": number.parse::<u64>().unwrap_or(0),
            "episodes": [],
            "append_to_response": query.get("append_to_response")
        }),
        ["person", "0"] => return not_found(),
        ["person", id] => match id.parse::<u64>() {
            Ok(id) => detail(id, "Person", &query),
            Err(_) => return not_found(),
        },
        ["movie" | "tv", id] => match id.parse::<u64>() {
            Ok(id) if FAILING_DETAIL_IDS.contains(&id) => {
                return HttpResponse::InternalServerError()
                    .json(json!({"status_code": 11, "status_message": "Internal error."}))
            }
            Ok(603) => detail(603, "The Matrix", &query),
            Ok(id) => detail(id, "Some title", &query),
            Err(_) => return not_found(),
        },
        _ => return not_found(),
    };
    HttpResponse::Ok().json(body)
}

fn spawn_fake_tmdb() -> (String, CallLog) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();
    let calls: CallLog = web::Data::new(Mutex::new(Vec::new()));

    let log = calls.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(log.clone())
            .default_service(web::to(fake_tmdb))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let _ = tokio::spawn(server);

    (format!("http://127.0.0.1:{}", port), calls)
}

pub async fn spawn_app() -> TestApp {
    let (upstream_address, upstream_calls) = spawn_fake_tmdb();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();
    let mut configuration =
        get_configuration("configuration").expect("Failed to read configuration file");
    configuration.tmdb.base_url = upstream_address;
    configuration.tmdb.api_key = TEST_API_KEY.to_string();
    configuration.default_region = "US".to_string();
    let server = filmhub::startup::run_server(listener, configuration)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        upstream_calls,
    }
}

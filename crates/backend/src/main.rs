mod assets;
mod graphql;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use graphql::Schema;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(schema: Schema, assets_dir: &Path) -> Router {
    // Static file routers are stateless, merge them before adding app state
    let static_files = Router::new()
        .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
        .nest(
            "/dist",
            cached_static_router(Path::new("dist"), CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(Path::new("dist/assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(serve_index))
        .route("/embed", get(serve_index))
        .with_state(schema)
        .merge(static_files)
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let assets_dir =
        PathBuf::from(std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()));
    let loaded_assets = match assets::Assets::load(&assets_dir) {
        Ok(a) => Arc::new(a),
        Err(e) => {
            tracing::error!(error = %e, "Could not load decliker assets");
            std::process::exit(1);
        }
    };

    let schema = graphql::build_schema(loaded_assets);
    let app = build_app(schema, &assets_dir);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Could not bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running at http://localhost:{}", port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
    }
}

async fn serve_index() -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match std::fs::read_to_string("dist/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html lang="fr">
<head><title>Decliker map</title></head>
<body>
<h1>Decliker map</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the API.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use decliker_shared::models::{Decliker, ProfessionOption};
    use tower::ServiceExt;

    /// Build a test app that serves files from the given temp directories.
    fn test_app(assets_dir: &Path, dist_dir: &Path, dist_assets_dir: &Path) -> Router {
        Router::new()
            .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
            .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
            .nest(
                "/assets",
                cached_static_router(dist_assets_dir, CACHE_IMMUTABLE),
            )
    }

    /// Create a temp dir with a test file and return the dir path.
    fn temp_dir_with_file(file_name: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(file_name), content).unwrap();
        dir
    }

    fn test_schema() -> Schema {
        let assets = assets::Assets::new(
            vec![Decliker {
                id: "1".to_string(),
                name: "Atelier A".to_string(),
                jobs: vec!["plumber".to_string()],
                geometry: geojson::Geometry::new(geojson::Value::Point(vec![2.0, 46.0])),
            }],
            vec![ProfessionOption {
                label: "Plombier".to_string(),
                value: "plumber".to_string(),
            }],
        )
        .unwrap();
        graphql::build_schema(Arc::new(assets))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let assets_dir = temp_dir_with_file("declikers.json", "[]");
        let dist_dir = temp_dir_with_file("index.html", "<html></html>");
        let dist_assets_dir = temp_dir_with_file("app.js", "console.log()");

        let app = test_app(assets_dir.path(), dist_dir.path(), dist_assets_dir.path());
        let resp = get(app, "/static/declikers.json").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_dist_bundles_have_immutable_cache() {
        let assets_dir = temp_dir_with_file("declikers.json", "[]");
        let dist_dir = temp_dir_with_file("app-abc123.js", "bundle()");
        let dist_assets_dir = temp_dir_with_file("style-xyz.css", "body{}");

        let app = test_app(assets_dir.path(), dist_dir.path(), dist_assets_dir.path());
        let bundle = get(app.clone(), "/dist/app-abc123.js").await;
        let style = get(app, "/assets/style-xyz.css").await;

        for resp in [bundle, style] {
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get("cache-control").unwrap(),
                "public, max-age=31536000, immutable"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let assets_dir = temp_dir_with_file("declikers.json", "[]");
        let dist_dir = temp_dir_with_file("index.html", "<html></html>");
        let dist_assets_dir = temp_dir_with_file("app.js", "");

        let app = test_app(assets_dir.path(), dist_dir.path(), dist_assets_dir.path());
        let resp = get(app, "/static/nonexistent.txt").await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_graphql_endpoint_serves_declikers() {
        let assets_dir = tempfile::tempdir().unwrap();
        let app = build_app(test_schema(), assets_dir.path());

        let body = serde_json::json!({ "query": "{ declikers { id name } professions { value } }" });
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/graphql")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["declikers"][0]["name"], "Atelier A");
        assert_eq!(json["data"]["professions"][0]["value"], "plumber");
    }

    #[tokio::test]
    async fn test_embed_route_serves_index() {
        let assets_dir = tempfile::tempdir().unwrap();
        let app = build_app(test_schema(), assets_dir.path());
        let resp = get(app, "/embed").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

use crate::config::ServerSettings;
use crate::dashboard::{Dashboard, Renderer};
use std::convert::Infallible;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{self, Reply, Response};
use warp::Filter;

fn html(status: StatusCode, body: String) -> Response {
    reply::with_status(reply::html(body), status).into_response()
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    error!("render failed: {}", err);
    reply::with_status("internal error", StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

async fn health_check() -> Result<Response, Infallible> {
    Ok(reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "findash"
    }))
    .into_response())
}

async fn upload_page(renderer: Arc<Renderer>) -> Result<Response, Infallible> {
    Ok(match renderer.render_upload() {
        Ok(body) => html(StatusCode::OK, body),
        Err(e) => internal_error(e),
    })
}

/// One upload → one dashboard (or one error message). Nothing survives the
/// request.
async fn process_upload(renderer: Arc<Renderer>, body: Bytes) -> Result<Response, Infallible> {
    let start = Instant::now();
    info!(bytes = body.len(), "processing upload");

    let rendered = match Dashboard::from_csv(&body) {
        Ok(dashboard) => {
            info!(
                periods = dashboard.statement.len(),
                elapsed = ?start.elapsed(),
                "dashboard built"
            );
            renderer
                .render_dashboard(&dashboard)
                .map(|page| html(StatusCode::OK, page))
        }
        Err(e) => {
            warn!(error = %e, "upload rejected");
            renderer
                .render_error(&e)
                .map(|page| html(StatusCode::UNPROCESSABLE_ENTITY, page))
        }
    };

    Ok(rendered.unwrap_or_else(internal_error))
}

/// All routes: `GET /`, `POST /dashboard`, `GET /health`.
pub fn routes(
    renderer: Arc<Renderer>,
    max_upload_bytes: u64,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let with_renderer = warp::any().map(move || Arc::clone(&renderer));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let index = warp::path::end()
        .and(warp::get())
        .and(with_renderer.clone())
        .and_then(upload_page);

    let upload = warp::path("dashboard")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_renderer)
        .and(warp::body::content_length_limit(max_upload_bytes))
        .and(warp::body::bytes())
        .and_then(process_upload);

    health.or(index).unify().or(upload).unify()
}

/// Resolve the configured host, which may be an IP literal or a name such as
/// `localhost`. The first address returned wins.
pub async fn resolve_addr(settings: &ServerSettings) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((settings.host.as_str(), settings.port))
        .await
        .with_context(|| format!("failed to resolve host {}", settings.host))?
        .next()
        .with_context(|| format!("host {} resolved to no addresses", settings.host))
}

/// Serve until the process is stopped.
pub async fn serve(settings: &ServerSettings, renderer: Renderer) -> anyhow::Result<()> {
    let addr = resolve_addr(settings).await?;

    info!("Server starting on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    warp::serve(routes(Arc::new(renderer), settings.max_upload_bytes))
        .run(addr)
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardSettings;

    fn app() -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
        let renderer = Renderer::new(DashboardSettings::default()).unwrap();
        routes(Arc::new(renderer), 1024)
    }

    fn text(res: &warp::http::Response<Bytes>) -> String {
        String::from_utf8_lossy(res.body()).into_owned()
    }

    #[tokio::test]
    async fn test_health_check() {
        let res = warp::test::request().path("/health").reply(&app()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(text(&res).contains("healthy"));
    }

    #[tokio::test]
    async fn index_shows_upload_prompt() {
        let res = warp::test::request().path("/").reply(&app()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(text(&res).contains("Please upload a CSV file"));
    }

    #[tokio::test]
    async fn valid_upload_renders_dashboard() {
        let csv = "Particulars,2022,2023\n\
                   Total Revenue,100,120\n\
                   Tax Expense,10,12\n\
                   Profit Before Tax,30,36\n\
                   Profit After Tax,20,24\n\
                   Balance at the end of the year,5,9\n";
        let res = warp::test::request()
            .method("POST")
            .path("/dashboard")
            .body(csv)
            .reply(&app())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = text(&res);
        assert!(body.contains("Key Metrics"));
        assert!(body.contains("Net Profit Margin Over Years"));
    }

    #[tokio::test]
    async fn bad_upload_renders_single_error() {
        let res = warp::test::request()
            .method("POST")
            .path("/dashboard")
            .body("Item,2022\nRevenue,1\n")
            .reply(&app())
            .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = text(&res);
        assert_eq!(
            body.matches("An error occurred while processing the file").count(),
            1
        );
        assert!(body.contains("required attribute rows not found"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let res = warp::test::request()
            .method("POST")
            .path("/dashboard")
            .body(vec![b'a'; 2048])
            .reply(&app())
            .await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    fn server_settings(host: &str) -> ServerSettings {
        ServerSettings {
            host: host.to_string(),
            port: 8181,
            ..ServerSettings::default()
        }
    }

    #[tokio::test]
    async fn resolves_ip_literal_host() {
        let addr = resolve_addr(&server_settings("0.0.0.0")).await.unwrap();
        assert_eq!(addr, "0.0.0.0:8181".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn resolves_localhost_by_name() {
        let addr = resolve_addr(&server_settings("localhost")).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8181);
    }
}

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::storage::InMemoryStorage;
use crate::{routes, RenderSiteError, Site};

#[derive(Error, Debug)]
pub enum ServeSiteError {
    #[error("async IO error: {0}")]
    AsyncIo(#[from] tokio::io::Error),

    #[error("failed to render site: {0}")]
    Render(#[from] RenderSiteError),
}

type ResponseBody = BoxBody<Bytes, hyper::Error>;

impl Site {
    /// Renders the site into memory and serves it on localhost.
    ///
    /// The search page is rendered per request from the `q` query parameter.
    pub async fn serve(self, port: u16) -> Result<(), ServeSiteError> {
        let storage = InMemoryStorage::default();
        self.render_to(&storage, &Utc::now().fixed_offset())?;

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr).await?;

        info!("serving {} routes at http://{addr}", storage.len());

        let site = Arc::new(self);

        loop {
            let (stream, _) = listener.accept().await?;

            let io = TokioIo::new(stream);
            let site = site.clone();
            let storage = storage.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let site = site.clone();
                    let storage = storage.clone();

                    async move { Ok::<_, Infallible>(handle_request(req, &site, &storage)) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("error serving connection: {err:?}");
                }
            });
        }
    }
}

fn handle_request<B>(req: Request<B>, site: &Site, storage: &InMemoryStorage) -> Response<ResponseBody> {
    let path = req.uri().path();
    debug!(method = %req.method(), path, "request");

    if req.method() != Method::GET {
        return status(StatusCode::METHOD_NOT_ALLOWED);
    }

    if path.trim_end_matches('/') == routes::SEARCH.trim_end_matches('/') {
        let query = req.uri().query().and_then(search_query).unwrap_or_default();

        return match site.render_search_page(&query) {
            Ok(rendered) => content(rendered, "text/html; charset=utf-8"),
            Err(err) => {
                error!("failed to render search page: {err}");
                status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };
    }

    match storage.get(path) {
        Ok(Some(body)) => content(body, &content_type(path)),
        Ok(None) => status(StatusCode::NOT_FOUND),
        Err(err) => {
            error!("failed to read content for {path}: {err}");
            status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Returns the value of the `q` parameter in a query string.
fn search_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "q")
        .map(|(_, value)| value.into_owned())
}

fn content_type(path: &str) -> String {
    match mime_guess::from_path(path).first() {
        Some(mime) if mime.type_() == mime_guess::mime::TEXT => {
            format!("{}; charset=utf-8", mime.essence_str())
        }
        Some(mime) => mime.essence_str().to_string(),
        None => "text/html; charset=utf-8".to_string(),
    }
}

fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

fn full<T: Into<Bytes>>(chunk: T) -> ResponseBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

fn content(body: String, content_type: &str) -> Response<ResponseBody> {
    let mut response = Response::new(full(body));

    if let Ok(value) = HeaderValue::from_str(content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }

    response
}

fn status(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(empty());
    *response.status_mut() = status;
    response
}

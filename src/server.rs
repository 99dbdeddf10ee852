//! The HTTP surface of the dashboards.
//!
//! One page at `/`. The filtered dashboard also answers control changes at
//! `html::UPDATE_PATH`. Every other path is a 404. Each connection is served on its own task;
//! the only state they share is the read-only `App`.

use crate::app::{App, FilteredApp};
use crate::error::Re;
use crate::html::UPDATE_PATH;
use anyhow::Context;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// A bound listener and the app it serves.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    app: Arc<App>,
}

impl Server {
    /// Binds `addr`. Port 0 picks a free port; see `local_addr`.
    pub async fn bind(addr: SocketAddr, app: App) -> Re<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Unable to listen on {addr}"))?;
        Ok(Self {
            listener,
            app: Arc::new(app),
        })
    }

    pub fn local_addr(&self) -> Re<SocketAddr> {
        self.listener
            .local_addr()
            .context("Unable to read the listening address")
    }

    /// Accepts connections until `shutdown` completes.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Re<()> {
        info!("Dashboard listening on http://{}", self.local_addr()?);
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down the dashboard server");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("Failed to accept a connection: {e}");
                            continue;
                        }
                    };
                    debug!("Accepted connection from {peer}");
                    let app = self.app.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let app = app.clone();
                            async move { Ok::<_, Infallible>(route(&app, req).await) }
                        });
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            debug!("Connection from {peer} ended with an error: {e}");
                        }
                    });
                }
            }
        }
    }
}

async fn route(app: &App, req: Request<Incoming>) -> Response<String> {
    debug!("{} {}", req.method(), req.uri());
    if req.method() != Method::GET {
        return respond(StatusCode::METHOD_NOT_ALLOWED, TEXT, "Method Not Allowed");
    }
    match (app, req.uri().path()) {
        (App::Filtered(app), "/") => respond(StatusCode::OK, HTML, app.page()),
        (App::Combo(app), "/") => respond(StatusCode::OK, HTML, app.page()),
        (App::Filtered(app), UPDATE_PATH) => update(app, req.uri().query().unwrap_or("")).await,
        _ => respond(StatusCode::NOT_FOUND, TEXT, "Not Found"),
    }
}

async fn update(app: &FilteredApp, query: &str) -> Response<String> {
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    match app.update(pairs).await {
        Ok(json) => respond(StatusCode::OK, JSON, json),
        Err(e) => {
            warn!("Rejected a dashboard update: {e:#}");
            respond(StatusCode::BAD_REQUEST, TEXT, format!("{e:#}"))
        }
    }
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<String>,
) -> Response<String> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

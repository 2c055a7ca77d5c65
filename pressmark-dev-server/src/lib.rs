use axum::{
    Router,
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use std::{
    io,
    net::{AddrParseError, SocketAddr},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(
        "Output directory '{}' does not exist. Generate the site first using 'pressmark generate'.",
        .0.display()
    )]
    MissingRoot(PathBuf),
    #[error("invalid port '{port}'")]
    InvalidPort {
        port: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid listen address '{addr}'")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error")]
    Io(#[from] io::Error),
}

/// Parse a port given as text, e.g. from a settings file.
pub fn parse_port(port: &str) -> Result<u16, ServeError> {
    port.trim().parse().map_err(|source| ServeError::InvalidPort {
        port: port.to_string(),
        source,
    })
}

/// Configuration for the static file server
#[derive(Debug, Clone)]
pub struct StaticServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Directory to serve
    pub root: PathBuf,
    /// Auto-open browser
    pub open: bool,
}

impl Default for StaticServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            root: PathBuf::from("output"),
            open: false,
        }
    }
}

impl StaticServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, ServeError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|source| ServeError::InvalidAddress { addr, source })
    }
}

/// A read-only HTTP server for a directory of generated pages
pub struct StaticServer {
    config: StaticServerConfig,
}

impl StaticServer {
    pub fn new(config: StaticServerConfig) -> Self {
        Self { config }
    }

    /// Bind the listener and serve until the process is stopped
    pub async fn run(self) -> Result<(), ServeError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    pub async fn bind(&self) -> Result<TcpListener, ServeError> {
        if !self.config.root.is_dir() {
            return Err(ServeError::MissingRoot(self.config.root.clone()));
        }

        let addr = self.config.addr()?;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServeError::Bind { addr, source })
    }

    pub async fn serve(self, listener: TcpListener) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        let url = format!("http://{addr}");

        info!(root = %self.config.root.display(), %addr, "serving");
        println!("Serving files from '{}' on {}", self.config.root.display(), url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, router(&self.config.root)).await?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    root: PathBuf,
    files: ServeDir,
}

/// Routes every request to a file under `root`. Directories are answered
/// with their `index.html` when present and with a plain listing otherwise.
pub fn router(root: &Path) -> Router {
    let state = AppState {
        root: root.to_path_buf(),
        files: ServeDir::new(root),
    };

    Router::new()
        .fallback(serve_path)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn serve_path(State(state): State<AppState>, request: Request) -> Response {
    if let Some(dir) = listable_dir(&state.root, request.uri().path()) {
        return match render_listing(&dir) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                warn!(dir = %dir.display(), "failed to list directory: {}", e);
                axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    match state.files.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

// Only paths ending in `/` are listed; ServeDir redirects the rest.
fn listable_dir(root: &Path, uri_path: &str) -> Option<PathBuf> {
    if !uri_path.ends_with('/') {
        return None;
    }

    let mut dir = root.to_path_buf();
    for segment in uri_path.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment == "." || segment.contains('\\') || segment.contains('%') {
            return None;
        }
        dir.push(segment);
    }

    (dir.is_dir() && !dir.join("index.html").is_file()).then_some(dir)
}

fn render_listing(dir: &Path) -> io::Result<String> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let mut html = String::from("<!DOCTYPE html>\n<meta charset=\"UTF-8\">\n<pre>\n");
    for name in names {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            html_escape::encode_double_quoted_attribute(&name),
            html_escape::encode_text(&name)
        ));
    }
    html.push_str("</pre>\n");

    Ok(html)
}

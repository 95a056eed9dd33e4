//! Development server with live reload support.
//!
//! A lightweight HTTP server for local preview, built on `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - Directory listing with a plain HTML page
//! - File watching and auto-rebuild (via the `watch` module)
//! - Browser reload notifications (via the `reload` module)
//! - Graceful shutdown on Ctrl+C
//!
//! Requests are answered on the main thread while the watcher runs on its
//! own thread; the only shared resource is the output tree, read here and
//! rewritten by the generator. A request racing a rebuild may observe the
//! tree mid-rewrite. That is accepted for a development tool rather than
//! solved with locking.

use crate::{
    config::SiteConfig,
    log,
    reload::ReloadHub,
    resolve::{ResolvedTarget, resolve},
    watch::RebuildLoop,
};
use anyhow::{Context, Result, anyhow, bail};
use std::{
    borrow::Cow,
    fs,
    io::{Cursor, Read},
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Directory listing HTML template (embedded at compile time)
const DIRECTORY_TEMPLATE: &str = include_str!("embed/serve/directory.html");

/// Bodies stream in chunks of this size instead of loading whole files.
const CHUNK_SIZE: usize = 64 * 1024;

/// Body of every 404 response.
const NOT_FOUND_BODY: &str = "Not Found";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Immutable state one serving session needs per request.
struct ServeContext {
    /// Root of the built site; read-only from the server's perspective.
    root: PathBuf,
    /// Reload channel port, when live reload is enabled.
    reload_port: Option<u16>,
    /// Log each request line.
    debug: bool,
}

/// Start the development server.
///
/// Startup order matters for clean failure: the output root is checked
/// first, then the reload channel binds, then the watcher registers (both
/// fatal on failure), and only then does the HTTP listener bind. The caller
/// has already run the initial build, so output is fresh before the first
/// request. Blocks until Ctrl+C.
pub fn serve_site(config: &'static SiteConfig) -> Result<()> {
    let output = config.output_dir();
    if !output.is_dir() {
        bail!(
            "Output directory `{}` does not exist; run `sitekit build` first",
            output.display()
        );
    }

    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;
    let addr = SocketAddr::new(interface, config.serve.port);

    let reload = if config.serve.live_reload {
        let ws_port = config
            .serve
            .port
            .checked_add(1)
            .context("No port left for the reload channel")?;
        Some(ReloadHub::bind(SocketAddr::new(interface, ws_port))?)
    } else {
        None
    };

    if config.serve.watch {
        // Register watches now so a missing content directory fails startup
        let rebuild_loop = RebuildLoop::new(config)?;
        let reload_for_watch = reload.clone();
        thread::spawn(move || {
            if let Err(err) = rebuild_loop.run(config, reload_for_watch) {
                log!("watch"; "{err}");
            }
        });
    }

    let server = Server::http(addr).map_err(|err| anyhow!("Failed to bind {addr}: {err}"))?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{addr}");

    let ctx = ServeContext {
        root: output,
        reload_port: reload.as_ref().map(|hub| hub.port()),
        debug: config.serve.debug,
    };

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(err) = handle_request(request, &ctx) {
            log!("serve"; "request error: {err}");
        }
    }

    Ok(())
}

// ============================================================================
// Request Handling
// ============================================================================

/// Answer a single HTTP request from the output tree.
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    // Decode URL-encoded characters (e.g., %20 → space)
    let url_path = urlencoding::decode(request.url())
        .map(Cow::into_owned)
        .unwrap_or_default();

    // Strip query string (e.g., ?t=123456) before resolving path
    let path_without_query = url_path.split('?').next().unwrap_or(&url_path);
    let request_path = path_without_query.trim_matches('/').to_owned();

    let target = resolve(&request_path, &ctx.root);
    if ctx.debug {
        log!("serve"; "{} /{request_path} -> {}", request.method(), target.status());
    }

    respond(request, target, &request_path, ctx)
}

/// Map a resolved target onto an HTTP response.
fn respond(
    request: Request,
    target: ResolvedTarget,
    request_path: &str,
    ctx: &ServeContext,
) -> Result<()> {
    match target {
        ResolvedTarget::NotFound => serve_not_found(request),
        ResolvedTarget::File { path, mime } => serve_file(request, &path, mime),
        ResolvedTarget::Index { path } => serve_file(request, &path, "text/html; charset=utf-8"),
        ResolvedTarget::Listing { entries, .. } => {
            let listing = render_listing(request_path, &entries, ctx.reload_port);
            serve_html(request, listing)
        }
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Serve a file, streamed in fixed-size chunks.
fn serve_file(request: Request, path: &Path, content_type: &str) -> Result<()> {
    let file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len() as usize;

    let response = Response::new(
        StatusCode(200),
        vec![Header::from_bytes("Content-Type", content_type).unwrap()],
        ChunkedReader::new(file),
        Some(len),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Serve generated HTML content.
fn serve_html(request: Request, content: String) -> Result<()> {
    let response = Response::from_string(content)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new(NOT_FOUND_BODY),
        Some(NOT_FOUND_BODY.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Chunked Streaming
// ============================================================================

/// Wraps a reader so no single `read` hands out more than [`CHUNK_SIZE`]
/// bytes. The body is a forward-only stream; the bytes delivered are
/// identical to the underlying file regardless of chunking.
struct ChunkedReader<R> {
    inner: R,
}

impl<R: Read> ChunkedReader<R> {
    const fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Read for ChunkedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let cap = buf.len().min(CHUNK_SIZE);
        self.inner.read(&mut buf[..cap])
    }
}

// ============================================================================
// Directory Listing
// ============================================================================

/// Render the HTML listing page for a directory without an index.
///
/// One hyperlink per direct child, in the (sorted) order the resolver
/// produced. The page title shows the directory's path relative to the
/// output root. Names are HTML-escaped in markup and percent-encoded in
/// hrefs so odd file names cannot break the page.
fn render_listing(request_path: &str, entries: &[String], reload_port: Option<u16>) -> String {
    let base = encode_path(request_path);
    let links = entries
        .iter()
        .map(|name| {
            let href = if base.is_empty() {
                format!("/{}", urlencoding::encode(name))
            } else {
                format!("/{base}/{}", urlencoding::encode(name))
            };
            format!(r#"        <li><a href="{href}">{}</a></li>"#, escape_html(name))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let reload_script = reload_port.map(ReloadHub::client_script).unwrap_or_default();

    DIRECTORY_TEMPLATE
        .replace("{path}", &escape_html(request_path))
        .replace("{entries}", &links)
        .replace("{reload}", &reload_script)
}

/// Escape the characters with meaning in HTML text and attribute values.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode each segment of a slash-separated path, keeping the
/// separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Tests
// ============================================================================

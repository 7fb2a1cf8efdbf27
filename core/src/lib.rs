//! Generic async HTTP client that decodes JSON responses into caller types.
//!
//! # Overview
//! `RequestExecutor::execute::<T>(url, method)` parses the URL, sends one
//! request, waits for the complete response under a timeout (12 seconds by
//! default) and decodes the body into `T`. Every failure is reported as one
//! of five `ErrorKind` values.
//!
//! # Design
//! - The executor is stateless between calls; it holds only a transport and
//!   an `ExecutorConfig`.
//! - `Transport` is the only I/O seam. `ReqwestTransport` is the default;
//!   tests substitute scripted transports.
//! - No retries, caching, headers, or request bodies.
//!
//! ```no_run
//! use fetch_core::{HttpMethod, RequestExecutor};
//!
//! #[derive(serde::Deserialize)]
//! struct Widget {
//!     id: i64,
//!     name: String,
//! }
//!
//! # async fn run() -> Result<(), fetch_core::ErrorKind> {
//! let executor = RequestExecutor::new();
//! let widget: Widget = executor
//!     .execute("http://localhost:3000/widgets/7", HttpMethod::Get)
//!     .await?;
//! println!("{} {}", widget.id, widget.name);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::RequestExecutor;
pub use config::{ExecutorConfig, DEFAULT_TIMEOUT};
pub use error::{ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, UnknownMethod};
pub use transport::{ReqwestTransport, Transport};

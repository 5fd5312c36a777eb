//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Wraps every request in an `INFO` span named `request` with the method, URI and
/// HTTP version attached.
///
/// One event is emitted when a request arrives and one when its response leaves,
/// the latter carrying the status and the latency in whole milliseconds. Redirects
/// and shorten calls therefore show up as a pair of lines:
///
/// ```text
/// INFO request{method=GET uri=/aB3dE9 version=HTTP/1.1}: started processing request
/// INFO request{method=GET uri=/aB3dE9 version=HTTP/1.1}: finished processing request latency=0 ms status=302
/// ```
///
/// 5xx responses are classified as failures and additionally logged at `ERROR`.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

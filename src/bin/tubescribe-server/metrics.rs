use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::core::Collector;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts as PromOpts,
    Registry, TextEncoder,
};
use tubescribe::server::TranscriptOutcome;

/// Routes that are polled by infrastructure and would drown out real traffic.
const UNTRACKED_ROUTES: [&str; 2] = ["/metrics", "/healthz"];

struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: HistogramVec,
    in_flight: IntGauge,
    transcripts: IntCounterVec,
    fallbacks: IntCounter,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

fn register<C>(registry: &Registry, collector: C) -> C
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .expect("metrics must register");
    collector
}

fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            PromOpts::new(
                "tubescribe_http_requests_total",
                "HTTP requests served, by route and status.",
            ),
            &["route", "status"],
        )
        .expect("metrics definition must be valid");

        // Transcript fetches are dominated by YouTube round trips, up to the 60s fetch bound.
        let latency = HistogramVec::new(
            HistogramOpts::new(
                "tubescribe_http_request_duration_seconds",
                "HTTP request latency in seconds, by route.",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["route"],
        )
        .expect("metrics definition must be valid");

        let in_flight = IntGauge::new(
            "tubescribe_http_in_flight_requests",
            "HTTP requests currently being served.",
        )
        .expect("metrics definition must be valid");

        let transcripts = IntCounterVec::new(
            PromOpts::new(
                "tubescribe_transcripts_total",
                "Transcript requests by outcome: ok, or the error kind that ended them.",
            ),
            &["outcome"],
        )
        .expect("metrics definition must be valid");

        let fallbacks = IntCounter::new(
            "tubescribe_transcript_fallbacks_total",
            "Transcripts served in another language because the requested one was missing.",
        )
        .expect("metrics definition must be valid");

        Metrics {
            requests: register(&registry, requests),
            latency: register(&registry, latency),
            in_flight: register(&registry, in_flight),
            transcripts: register(&registry, transcripts),
            fallbacks: register(&registry, fallbacks),
            registry,
        }
    })
}

pub fn init() {
    let _ = metrics();
}

pub async fn prometheus_metrics() -> Response {
    let families = metrics().registry.gather();
    let mut buf = Vec::new();
    if TextEncoder::new().encode(&families, &mut buf).is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to encode metrics",
        )
            .into_response();
    }

    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
        )],
        buf,
    )
        .into_response()
}

fn record_outcome(outcome: TranscriptOutcome) {
    let m = metrics();
    m.transcripts.with_label_values(&[outcome.label()]).inc();
    if let TranscriptOutcome::Served { fell_back: true } = outcome {
        m.fallbacks.inc();
    }
}

pub async fn track_http_metrics(req: Request<Body>, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", |path| path.as_str())
        .to_owned();

    if UNTRACKED_ROUTES.contains(&route.as_str()) {
        return next.run(req).await;
    }

    let m = metrics();
    let start = Instant::now();
    m.in_flight.inc();
    let response = next.run(req).await;
    m.in_flight.dec();

    let status = response.status().as_u16().to_string();
    m.requests
        .with_label_values(&[route.as_str(), status.as_str()])
        .inc();
    m.latency
        .with_label_values(&[route.as_str()])
        .observe(start.elapsed().as_secs_f64());

    if let Some(outcome) = response.extensions().get::<TranscriptOutcome>() {
        record_outcome(*outcome);
    }

    response
}

#[cfg(test)]
mod tests {
    use tubescribe::ErrorKind;

    use super::*;

    #[test]
    fn outcomes_feed_transcript_counters() {
        let fallbacks_before = metrics().fallbacks.get();
        let blocked_before = metrics()
            .transcripts
            .with_label_values(&["blocked"])
            .get();

        record_outcome(TranscriptOutcome::Served { fell_back: true });
        record_outcome(TranscriptOutcome::Served { fell_back: false });
        record_outcome(TranscriptOutcome::Failed(ErrorKind::Blocked));

        assert_eq!(metrics().fallbacks.get(), fallbacks_before + 1);
        assert_eq!(
            metrics()
                .transcripts
                .with_label_values(&["blocked"])
                .get(),
            blocked_before + 1
        );
    }

    #[tokio::test]
    async fn exposes_registered_metrics() {
        init();
        record_outcome(TranscriptOutcome::Served { fell_back: false });

        let response = prometheus_metrics().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("metrics body");
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains(r#"tubescribe_transcripts_total{outcome="ok"}"#));
        assert!(text.contains("tubescribe_transcript_fallbacks_total"));
    }
}

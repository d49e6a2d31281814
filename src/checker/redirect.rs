// src/checker/redirect.rs
// =============================================================================
// Performs one redirect check: a single GET to the source URL, with redirect
// following switched off, and a comparison of what came back against the
// expectation.
//
// The order of the checks matters for which error is reported:
// 1. transport failure (no response at all)
// 2. target URL does not parse
// 3. status code differs
// 4. no / unusable Location header
// 5. resolved Location differs from the target
//
// Rust concepts:
// - The ? operator: Each step returns early with its own CheckError
// - From<Result<..>>: The only way to build a CheckOutcome
// - Clone on Client: reqwest clients are reference-counted handles
// =============================================================================

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::destination::{first_difference, resolve_location};
use super::error::{CheckError, ErrorKind};

/// Outcome of checking one source/target/status triple.
///
/// `matched` is true exactly when there is no error, which is why the only
/// way to build one is from a `Result`.
#[derive(Debug)]
pub struct CheckOutcome {
    matched: bool,
    error: Option<CheckError>,
}

impl CheckOutcome {
    /// True when both the status code and the destination matched
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// The reason the check failed, if it did
    pub fn error(&self) -> Option<&CheckError> {
        self.error.as_ref()
    }

    /// Payload-free classification of this outcome (`None` means matched)
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(CheckError::kind)
    }
}

impl From<Result<(), CheckError>> for CheckOutcome {
    fn from(result: Result<(), CheckError>) -> Self {
        match result {
            Ok(()) => CheckOutcome {
                matched: true,
                error: None,
            },
            Err(error) => CheckOutcome {
                matched: false,
                error: Some(error),
            },
        }
    }
}

/// Issues no-follow redirect checks.
///
/// Cloning is cheap and every clone shares the same connection pool, so one
/// checker can be handed to every worker.
#[derive(Debug, Clone)]
pub struct RedirectChecker {
    client: Client,
}

impl RedirectChecker {
    /// Builds a checker whose client never follows redirects.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            // Any 3xx is the response we want to inspect, not a hop to take.
            // The default policy follows up to 10 hops and would hand us the
            // final page instead, with its status and no Location header.
            .redirect(Policy::none())
            .user_agent(concat!("dns-checker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Checks that GET `source` answers `expected_status` with a Location
    /// that resolves to exactly `target`.
    ///
    /// Sends exactly one request and never retries.
    pub async fn check(&self, source: &str, target: &str, expected_status: u16) -> CheckOutcome {
        let result = self.verify(source, target, expected_status).await;

        match &result {
            Ok(()) => debug!(source, target, "redirect matched"),
            Err(e) => debug!(source, target, error = %e, "redirect did not match"),
        }

        CheckOutcome::from(result)
    }

    async fn verify(&self, source: &str, target: &str, expected_status: u16) -> Result<(), CheckError> {
        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(CheckError::transport)?;

        // The body is never read; `response` is dropped on every return path
        // below, which releases the connection.
        let expected = Url::parse(target).map_err(|source| CheckError::TargetParse {
            input: target.to_string(),
            source,
        })?;

        let actual_status = response.status().as_u16();
        if actual_status != expected_status {
            return Err(CheckError::StatusCode {
                actual: actual_status,
            });
        }

        // A matching status with no Location at all is still a failure
        let location = response
            .headers()
            .get(LOCATION)
            .ok_or(CheckError::MissingLocation)?;
        // Relative Locations resolve against the URL that was actually requested
        let destination = resolve_location(response.url(), location)?;

        if let Some(component) = first_difference(&destination, &expected) {
            return Err(CheckError::Destination {
                actual: destination,
                component,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::destination::UrlComponent;
    use crate::checker::error::TransportKind;
    use crate::test_support::raw_redirect_server;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Mock server with the four canonical routes
    async fn redirect_server() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "http://dest.example/"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/wrong-status"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/wrong-dest"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "http://other.example/"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/no-redirect"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        server
    }

    fn checker() -> RedirectChecker {
        RedirectChecker::new().unwrap()
    }

    #[tokio::test]
    async fn test_matching_redirect() {
        let server = redirect_server().await;
        let source = format!("{}/good", server.uri());

        let outcome = checker().check(&source, "http://dest.example/", 301).await;

        assert!(outcome.matched());
        assert!(outcome.error().is_none());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_status_code() {
        let server = redirect_server().await;
        let source = format!("{}/wrong-status", server.uri());

        let outcome = checker().check(&source, "http://dest.example/", 301).await;

        assert!(!outcome.matched());
        assert!(matches!(outcome.error(), Some(CheckError::StatusCode { actual: 404 })));
    }

    #[tokio::test]
    async fn test_wrong_destination() {
        let server = redirect_server().await;
        let source = format!("{}/wrong-dest", server.uri());

        let outcome = checker().check(&source, "http://dest.example/", 301).await;

        assert!(!outcome.matched());
        match outcome.error() {
            Some(CheckError::Destination { actual, component }) => {
                assert_eq!(actual.as_str(), "http://other.example/");
                assert_eq!(*component, UrlComponent::Host);
            }
            other => panic!("expected a destination error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_matches_but_no_location() {
        let server = redirect_server().await;
        let source = format!("{}/no-redirect", server.uri());

        let outcome = checker().check(&source, &source, 200).await;

        assert!(!outcome.matched());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::MissingLocation));
    }

    #[tokio::test]
    async fn test_redirect_is_never_followed() {
        let server = MockServer::start().await;

        // The redirect points back at the same server; following it would hit /landing
        Mock::given(method("GET"))
            .and(path("/hop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let source = format!("{}/hop", server.uri());
        let target = format!("{}/landing", server.uri());
        let outcome = checker().check(&source, &target, 302).await;

        assert!(outcome.matched(), "{:?}", outcome.error());
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_relative_location_resolves_against_request_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old/page"))
            .respond_with(ResponseTemplate::new(308).insert_header("Location", "../new/page?b=2&a=1"))
            .mount(&server)
            .await;

        let source = format!("{}/old/page", server.uri());

        let ok = checker()
            .check(&source, &format!("{}/new/page?b=2&a=1", server.uri()), 308)
            .await;
        assert!(ok.matched(), "{:?}", ok.error());

        // Same parameters, different order
        let reordered = checker()
            .check(&source, &format!("{}/new/page?a=1&b=2", server.uri()), 308)
            .await;
        match reordered.error() {
            Some(CheckError::Destination { component, .. }) => assert_eq!(*component, UrlComponent::Query),
            other => panic!("expected a query mismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_location_checked_even_for_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/odd"))
            .respond_with(ResponseTemplate::new(200).insert_header("Location", "http://dest.example/"))
            .mount(&server)
            .await;

        let source = format!("{}/odd", server.uri());
        let outcome = checker().check(&source, "http://dest.example/", 200).await;

        assert!(outcome.matched(), "{:?}", outcome.error());
    }

    #[tokio::test]
    async fn test_raw_utf8_location_matches_target() {
        // Location sent as raw UTF-8 bytes, not percent-encoded
        let (uri, stats) = raw_redirect_server("http://dest.example/café".as_bytes(), Duration::ZERO).await;
        let source = format!("{}/vanity", uri);

        let outcome = checker().check(&source, "http://dest.example/café", 301).await;
        assert!(outcome.matched(), "{:?}", outcome.error());

        // The percent-encoded spelling of the same target is the same URL
        let encoded = checker().check(&source, "http://dest.example/caf%C3%A9", 301).await;
        assert!(encoded.matched(), "{:?}", encoded.error());

        assert_eq!(stats.served(), 2);
    }

    #[tokio::test]
    async fn test_invalid_source_is_a_transport_error() {
        let outcome = checker().check("not-an-url", "https://dest.example/", 301).await;

        assert!(!outcome.matched());
        match outcome.error() {
            Some(CheckError::Transport { kind, .. }) => assert_eq!(*kind, TransportKind::InvalidSource),
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        // Grab a free port, then close the listener so nothing answers there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = format!("http://127.0.0.1:{}/gone", port);

        let outcome = checker().check(&source, "http://dest.example/", 301).await;

        assert_eq!(outcome.error_kind(), Some(ErrorKind::Transport));
    }

    #[tokio::test]
    async fn test_invalid_target_is_reported() {
        let server = redirect_server().await;
        let source = format!("{}/good", server.uri());

        let outcome = checker().check(&source, ":not-an-url", 301).await;

        assert!(!outcome.matched());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::TargetParse));
    }

    #[tokio::test]
    async fn test_same_job_twice_gives_same_classification() {
        let server = redirect_server().await;
        let checker = checker();

        for route in ["/good", "/wrong-status", "/wrong-dest", "/no-redirect"] {
            let source = format!("{}{}", server.uri(), route);
            let first = checker.check(&source, "http://dest.example/", 301).await;
            let second = checker.check(&source, "http://dest.example/", 301).await;
            assert_eq!(first.matched(), second.matched(), "{}", route);
            assert_eq!(first.error_kind(), second.error_kind(), "{}", route);
        }

        assert_eq!(server.received_requests().await.unwrap().len(), 8);
    }
}

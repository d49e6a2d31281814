// src/checker/error.rs
// =============================================================================
// Every way a single redirect check can fail.
//
// None of these abort the run: each one is recorded in the Job's result and
// the pool moves on to the next Job.
// =============================================================================

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use url::Url;

use super::destination::UrlComponent;

/// Why a check did not match.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The request never produced a response (DNS, connect, bad source URL...)
    #[error("transport ({kind}): {source}")]
    Transport {
        kind: TransportKind,
        #[source]
        source: reqwest::Error,
    },

    /// The expected target is not a valid absolute URL
    #[error("parse {input:?}: {source}")]
    TargetParse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// The server answered with a different status code
    #[error("status code: {actual}")]
    StatusCode { actual: u16 },

    /// Status matched but there is no destination to compare
    #[error("no Location header in response")]
    MissingLocation,

    /// The Location header is present but cannot be turned into a URL
    #[error("invalid Location header {value:?}")]
    InvalidLocation { value: String },

    /// The redirect points somewhere else
    #[error("destination: {actual} ({component} differs)")]
    Destination {
        actual: Url,
        component: UrlComponent,
    },
}

impl CheckError {
    // Wraps a reqwest failure, sorting it into a coarse category first
    pub(crate) fn transport(source: reqwest::Error) -> Self {
        let kind = TransportKind::of(&source);
        CheckError::Transport { kind, source }
    }

    /// The category of this error, without its payload.
    ///
    /// Handy for comparing outcomes: two runs of the same Job against an
    /// unchanged server produce the same kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Transport { .. } => ErrorKind::Transport,
            CheckError::TargetParse { .. } => ErrorKind::TargetParse,
            CheckError::StatusCode { .. } => ErrorKind::StatusCode,
            CheckError::MissingLocation => ErrorKind::MissingLocation,
            CheckError::InvalidLocation { .. } => ErrorKind::InvalidLocation,
            CheckError::Destination { .. } => ErrorKind::Destination,
        }
    }
}

/// Payload-free mirror of [`CheckError`], used in reports and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    TargetParse,
    StatusCode,
    MissingLocation,
    InvalidLocation,
    Destination,
}

/// Rough reason a request failed before any response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The source string could not be turned into a request (bad URL, bad scheme)
    InvalidSource,
    /// Hostname did not resolve
    Dns,
    /// Host resolved but the connection failed
    Connect,
    /// Anything else reqwest reports
    Other,
}

impl TransportKind {
    // reqwest only exposes a few predicates, so DNS failures are recognised
    // by walking the error chain and looking at the messages.
    fn of(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            return TransportKind::InvalidSource;
        }

        if error.is_connect() {
            let mut cause: Option<&dyn std::error::Error> = Some(error);
            while let Some(err) = cause {
                if err.to_string().to_lowercase().contains("dns") {
                    return TransportKind::Dns;
                }
                cause = err.source();
            }
            return TransportKind::Connect;
        }

        TransportKind::Other
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportKind::InvalidSource => "invalid source",
            TransportKind::Dns => "dns",
            TransportKind::Connect => "connect",
            TransportKind::Other => "other",
        };
        f.write_str(label)
    }
}

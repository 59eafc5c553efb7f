use http::StatusCode;

use pve_login::error::{ResponseError, TicketError};

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors of the base client and the typed helpers.
///
/// Dispatching through a [`Resource`](crate::Resource) adds no errors of its own: anything
/// returned from an API call comes from the [`HttpApiClient`](crate::HttpApiClient)
/// implementation, while error *statuses* are passed back inside the
/// [`ApiResult`](crate::ApiResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API call returned an error status.
    #[error("api error (status = {0}): {1}")]
    Api(StatusCode, String),

    /// The API returned something we could not make sense of.
    #[error("bad api response: {0}")]
    BadApi(String, #[source] Option<Source>),

    /// No authentication was available, or the server rejected it.
    #[error("not authenticated")]
    Unauthorized,

    /// The ticket call failed or returned unusable data.
    #[error(transparent)]
    Ticket(#[from] ResponseError),

    /// The request could not be performed.
    #[error("http request failed: {0}")]
    Transport(#[source] Source),

    /// Building a request or decoding a response failed.
    #[error("{0}: {1}")]
    Internal(&'static str, #[source] Source),

    /// A path template could not be expanded.
    #[error("invalid path: {0}")]
    Path(String),

    /// A task id could not be parsed.
    #[error("unable to parse UPID {0:?}")]
    BadUpid(String),

    /// An API token string is not of the form `user@realm!tokenid=secret`.
    #[error("invalid api token {0:?}")]
    BadToken(String),
}

impl Error {
    pub(crate) fn api<T: std::fmt::Display>(status: StatusCode, msg: T) -> Self {
        Error::Api(status, msg.to_string())
    }

    pub(crate) fn bad_api<T, E>(msg: T, err: E) -> Self
    where
        T: std::fmt::Display,
        E: Into<Source>,
    {
        Error::BadApi(msg.to_string(), Some(err.into()))
    }

    pub(crate) fn internal<E>(context: &'static str, err: E) -> Self
    where
        E: Into<Source>,
    {
        Error::Internal(context, err.into())
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl From<TicketError> for Error {
    fn from(err: TicketError) -> Self {
        Error::Ticket(ResponseError::Ticket(err))
    }
}

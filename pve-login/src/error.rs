//! Error types.

use std::fmt;

/// The ticket string could not be parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TicketError;

impl std::error::Error for TicketError {}

impl fmt::Display for TicketError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid ticket")
    }
}

/// The response of the `/access/ticket` call was not usable.
#[derive(Debug)]
pub enum ResponseError {
    /// The body was not the expected JSON.
    Json(serde_json::Error),

    /// The body was valid JSON, but its content was wrong or incomplete.
    Msg(&'static str),

    /// The returned ticket could not be parsed.
    Ticket(TicketError),

    /// The server asked for a second factor, but the login did not carry one.
    SecondFactorRequired,
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResponseError::Json(err) => Some(err),
            ResponseError::Ticket(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResponseError::Json(err) => write!(f, "bad ticket response: {err}"),
            ResponseError::Msg(msg) => write!(f, "bad ticket response: {msg}"),
            ResponseError::Ticket(err) => write!(f, "failed to parse ticket in response: {err}"),
            ResponseError::SecondFactorRequired => {
                f.write_str("login requires a second factor, retry with an otp value")
            }
        }
    }
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        ResponseError::Json(err)
    }
}

impl From<&'static str> for ResponseError {
    fn from(msg: &'static str) -> Self {
        ResponseError::Msg(msg)
    }
}

impl From<TicketError> for ResponseError {
    fn from(err: TicketError) -> Self {
        ResponseError::Ticket(err)
    }
}

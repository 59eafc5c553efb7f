//! Parameter and response types of `POST /api2/json/access/ticket`.

use serde::{Deserialize, Serialize};

/// The JSON body sent to the ticket call.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateTicket {
    /// User name, with or without the `@realm` suffix.
    pub username: String,

    /// The secret password. This can also be a still valid ticket.
    pub password: String,

    /// Realm, if it is not already part of `username`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,

    /// One-time password for two-factor authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// The `data` member of a successful ticket call.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTicketResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "CSRFPreventionToken")]
    pub csrfprevention_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustername: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,

    /// The full userid including the realm.
    pub username: String,

    /// Set by older servers when a second factor is still required.
    #[serde(default, deserialize_with = "crate::parse::deserialize_bool")]
    #[serde(rename = "NeedTFA")]
    pub need_tfa: Option<bool>,
}

#[derive(Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
}

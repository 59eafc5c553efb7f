//! Client for the Proxmox VE REST API.
//!
//! The API is exposed as a tree of resource handles mirroring the REST paths, rooted at
//! [`PveClient`]:
//!
//! ```no_run
//! # fn main() -> Result<(), pve_client::Error> {
//! use pve_client::api::qemu::StartQemu;
//! use pve_client::{Client, PveClient};
//!
//! let client = Client::new("https://pve.example.com:8006");
//! client.login("root@pam", "secret")?;
//!
//! let pve = PveClient::new(client);
//! let result = pve
//!     .nodes()
//!     .node("pve1")
//!     .qemu()
//!     .vm(100)
//!     .status()
//!     .start(StartQemu::default())?;
//!
//! if result.is_success_status_code() {
//!     let upid: String = result.into_data()?;
//!     pve.wait_for_task_to_finish(&upid, None, None)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every operation performs exactly one call through an [`HttpApiClient`] and hands back its
//! [`ApiResult`] unmodified. [`Client`] is the blocking HTTP implementation of that trait.

use http::Method;

mod error;
pub use error::Error;

mod params;
pub use params::{add_indexed_parameter, ParamValue, Parameters};

mod api_path_builder;
pub use api_path_builder::{encode_segment, ApiPathBuilder};

mod response;
pub use response::ApiResult;

mod auth;
pub use auth::{ApiToken, AuthenticationKind};

mod client;
pub use client::{Client, Options, ResponseType, TlsOptions};

mod resource;
pub use resource::{Endpoint, Resource};

pub mod tasks;

pub mod api;
pub use api::PveClient;

pub use pve_login::{Authentication, Login, Ticket, Validity};

/// The transport every resource handle dispatches through.
///
/// `path` is relative to the API root (`/nodes/pve1/qemu`), the implementation adds the
/// `/api2/<format>` prefix and host. Implementations decide how `params` travel: the base
/// [`Client`] puts them into the query string for `GET`/`DELETE` and into a JSON body for
/// `POST`/`PUT`.
pub trait HttpApiClient {
    /// Perform one *authenticated* call.
    fn request(&self, method: Method, path: &str, params: &Parameters)
        -> Result<ApiResult, Error>;

    /// `GET`
    fn get(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
        self.request(Method::GET, path, params)
    }

    /// `POST`
    fn create(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
        self.request(Method::POST, path, params)
    }

    /// `PUT`
    fn set(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
        self.request(Method::PUT, path, params)
    }

    /// `DELETE`
    fn delete(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
        self.request(Method::DELETE, path, params)
    }
}

macro_rules! forward_http_api_client {
    ($($ty:ty),+ $(,)?) => {$(
        impl<C> HttpApiClient for $ty
        where
            C: HttpApiClient + ?Sized,
        {
            fn request(
                &self,
                method: Method,
                path: &str,
                params: &Parameters,
            ) -> Result<ApiResult, Error> {
                C::request(self, method, path, params)
            }

            fn get(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
                C::get(self, path, params)
            }

            fn create(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
                C::create(self, path, params)
            }

            fn set(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
                C::set(self, path, params)
            }

            fn delete(&self, path: &str, params: &Parameters) -> Result<ApiResult, Error> {
                C::delete(self, path, params)
            }
        }
    )+};
}

forward_http_api_client!(&C, std::sync::Arc<C>, std::rc::Rc<C>, Box<C>);

//! Typed handles for the Proxmox VE API tree.
//!
//! Handles are cheap views borrowing the client, created on access. Each method performs a
//! single call and returns the [`ApiResult`] untouched.

use std::fmt::Display;

use serde::Serialize;

use crate::{ApiResult, Endpoint, Error, HttpApiClient, Parameters, Resource};

#[macro_use]
mod macros;

pub mod cluster;
pub mod lxc;
pub mod nodes;
pub mod pools;
pub mod qemu;
pub mod snapshot;
pub mod storage;

mod types;
pub use types::*;

/// Conversion of a typed parameter struct into the [`Parameters`] sent with a call.
///
/// `None` members are omitted.
pub trait ApiParams: Serialize {
    fn to_parameters(&self) -> Result<Parameters, Error> {
        Parameters::from_serialize(self)
    }
}

impl ApiParams for Parameters {
    fn to_parameters(&self) -> Result<Parameters, Error> {
        Ok(self.clone())
    }
}

/// The root of the API tree.
pub struct PveClient<C> {
    client: C,
}

impl<C> PveClient<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Access the underlying client, for instance to log in or change the response type.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C> PveClient<C>
where
    C: HttpApiClient,
{
    /// A generic handle on an arbitrary, already encoded path.
    pub fn resource(&self, path: impl Into<String>) -> Resource<'_, C> {
        Resource::new(&self.client, path)
    }

    /// Call an [`Endpoint`] with its bound identifiers.
    pub fn call(
        &self,
        endpoint: &Endpoint,
        bound: &[&dyn Display],
        params: &Parameters,
    ) -> Result<ApiResult, Error> {
        endpoint.call(&self.client, bound, params)
    }

    /// `GET /version`
    pub fn version(&self) -> Result<ApiResult, Error> {
        self.resource("/version").get(&Parameters::new())
    }

    pub fn cluster(&self) -> cluster::Cluster<'_, C> {
        cluster::Cluster::new(self.resource("/cluster"))
    }

    pub fn nodes(&self) -> nodes::Nodes<'_, C> {
        nodes::Nodes::new(self.resource("/nodes"))
    }

    /// The cluster wide storage configuration.
    pub fn storage(&self) -> storage::StorageList<'_, C> {
        storage::StorageList::new(self.resource("/storage"))
    }

    pub fn pools(&self) -> pools::Pools<'_, C> {
        pools::Pools::new(self.resource("/pools"))
    }
}

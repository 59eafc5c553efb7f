//! `/cluster`

use crate::api::ClusterResourceKind;
use crate::{ApiResult, Error, HttpApiClient, Parameters};

handle!(
    /// `/cluster`
    Cluster
);

impl<C> Cluster<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /cluster`
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `GET /cluster/resources`, optionally limited to one kind of resource.
    pub fn resources(&self, ty: Option<ClusterResourceKind>) -> Result<ApiResult, Error> {
        self.resource
            .child("resources")
            .get(&Parameters::new().maybe_arg("type", ty))
    }

    /// `GET /cluster/status`
    pub fn status(&self) -> Result<ApiResult, Error> {
        self.resource.child("status").get(&Parameters::new())
    }

    /// `GET /cluster/nextid`: the next free vmid, or whether `vmid` is free.
    pub fn nextid(&self, vmid: Option<u32>) -> Result<ApiResult, Error> {
        self.resource
            .child("nextid")
            .get(&Parameters::new().maybe_arg("vmid", vmid))
    }

    /// `GET /cluster/tasks`: recent tasks of the whole cluster.
    pub fn tasks(&self) -> Result<ApiResult, Error> {
        self.resource.child("tasks").get(&Parameters::new())
    }

    /// `GET /cluster/log`
    pub fn log(&self, max: Option<u64>) -> Result<ApiResult, Error> {
        self.resource
            .child("log")
            .get(&Parameters::new().maybe_arg("max", max))
    }
}

//! Guest snapshots, shared by QEMU and LXC (`.../{vmid}/snapshot`).

use serde::Serialize;

use crate::api::ApiParams;
use crate::{ApiResult, Error, HttpApiClient, Parameters};

/// `POST .../snapshot`
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateSnapshot {
    /// The name of the snapshot.
    pub snapname: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Save the VM RAM contents (QEMU only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmstate: Option<bool>,
}

impl CreateSnapshot {
    pub fn new(snapname: impl Into<String>) -> Self {
        Self {
            snapname: snapname.into(),
            ..Default::default()
        }
    }
}

/// `POST .../snapshot/{snapname}/rollback`
#[derive(Clone, Debug, Default, Serialize)]
pub struct RollbackSnapshot {
    /// Start the guest after a successful rollback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<bool>,
}

api_params!(CreateSnapshot, RollbackSnapshot);

handle!(
    /// `.../{vmid}/snapshot`
    Snapshots
);

impl<'c, C> Snapshots<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../snapshot`
    pub fn list(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `POST .../snapshot`, returns a task id.
    pub fn create(&self, params: CreateSnapshot) -> Result<ApiResult, Error> {
        self.resource.create(&params.to_parameters()?)
    }

    pub fn snapshot(&self, snapname: &str) -> Snapshot<'c, C> {
        Snapshot::new(self.resource.child(snapname))
    }
}

handle!(
    /// `.../{vmid}/snapshot/{snapname}`
    Snapshot
);

impl<C> Snapshot<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../snapshot/{snapname}`
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `DELETE .../snapshot/{snapname}`, returns a task id.
    ///
    /// With `force` the snapshot is removed from the config even if removing disk snapshots
    /// fails.
    pub fn delete(&self, force: Option<bool>) -> Result<ApiResult, Error> {
        self.resource
            .delete(&Parameters::new().maybe_arg("force", force))
    }

    /// `POST .../snapshot/{snapname}/rollback`, returns a task id.
    pub fn rollback(&self, params: RollbackSnapshot) -> Result<ApiResult, Error> {
        self.resource
            .child("rollback")
            .create(&params.to_parameters()?)
    }

    /// `GET .../snapshot/{snapname}/config`
    pub fn config(&self) -> Result<ApiResult, Error> {
        self.resource.child("config").get(&Parameters::new())
    }

    /// `PUT .../snapshot/{snapname}/config`
    pub fn update_config(&self, description: Option<&str>) -> Result<ApiResult, Error> {
        self.resource
            .child("config")
            .set(&Parameters::new().maybe_arg("description", description))
    }
}

//! `/nodes`

use serde::Serialize;

use crate::api::lxc::LxcList;
use crate::api::qemu::QemuList;
use crate::api::storage::NodeStorageList;
use crate::api::{ApiParams, NodeCommand};
use crate::{ApiResult, Error, HttpApiClient, Parameters};

handle!(
    /// `/nodes`
    Nodes
);

impl<'c, C> Nodes<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes`, the cluster node index.
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    pub fn node(&self, node: &str) -> Node<'c, C> {
        Node::new(self.resource.child(node))
    }
}

handle!(
    /// `/nodes/{node}`
    Node
);

impl<'c, C> Node<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}`
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `GET /nodes/{node}/status`
    pub fn status(&self) -> Result<ApiResult, Error> {
        self.resource.child("status").get(&Parameters::new())
    }

    /// `POST /nodes/{node}/status`: reboot or shut down the node.
    pub fn status_command(&self, command: NodeCommand) -> Result<ApiResult, Error> {
        self.resource
            .child("status")
            .create(&Parameters::new().arg("command", command))
    }

    /// `GET /nodes/{node}/version`
    pub fn version(&self) -> Result<ApiResult, Error> {
        self.resource.child("version").get(&Parameters::new())
    }

    pub fn qemu(&self) -> QemuList<'c, C> {
        QemuList::new(self.resource.child("qemu"))
    }

    pub fn lxc(&self) -> LxcList<'c, C> {
        LxcList::new(self.resource.child("lxc"))
    }

    pub fn tasks(&self) -> Tasks<'c, C> {
        Tasks::new(self.resource.child("tasks"))
    }

    pub fn storage(&self) -> NodeStorageList<'c, C> {
        NodeStorageList::new(self.resource.child("storage"))
    }
}

/// `GET /nodes/{node}/tasks`
#[derive(Clone, Debug, Default, Serialize)]
pub struct ListTasks {
    /// Only list tasks with a status of ERROR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<bool>,

    /// Only list this amount of tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Only list tasks since this UNIX epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,

    /// List tasks beginning from this offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    /// List of task states that should be returned, `ok`, `error`, `warning` or `unknown`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statusfilter: Option<String>,

    /// Only list tasks of this type (e.g., vzstart, vzdump).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typefilter: Option<String>,

    /// Only list tasks until this UNIX epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub userfilter: Option<String>,

    /// Only list tasks for this VM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmid: Option<u32>,
}

api_params!(ListTasks);

handle!(
    /// `/nodes/{node}/tasks`
    Tasks
);

impl<'c, C> Tasks<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    pub fn list(&self, params: ListTasks) -> Result<ApiResult, Error> {
        self.resource.get(&params.to_parameters()?)
    }

    pub fn task(&self, upid: &str) -> Task<'c, C> {
        Task::new(self.resource.child(upid))
    }
}

handle!(
    /// `/nodes/{node}/tasks/{upid}`
    Task
);

impl<C> Task<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `DELETE /nodes/{node}/tasks/{upid}`: stop the task.
    pub fn stop(&self) -> Result<ApiResult, Error> {
        self.resource.delete(&Parameters::new())
    }

    /// `GET .../status`
    pub fn status(&self) -> Result<ApiResult, Error> {
        self.resource.child("status").get(&Parameters::new())
    }

    /// `GET .../log`, `limit` lines beginning at line `start`.
    pub fn log(&self, start: Option<u64>, limit: Option<u64>) -> Result<ApiResult, Error> {
        self.resource.child("log").get(
            &Parameters::new()
                .maybe_arg("start", start)
                .maybe_arg("limit", limit),
        )
    }
}

use serde::{Deserialize, Serialize};

/// `GET /version`
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VersionResponse {
    /// The current Proxmox VE point release in `x.y` format.
    pub release: String,

    /// The short git revision from which this version was built.
    pub repoid: String,

    /// The full pve-manager package version of this node.
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<String>,
}

/// Filter for `GET /cluster/resources`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterResourceKind {
    Vm,
    Storage,
    Node,
    Sdn,
}

/// Time frame of RRD data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RrdTimeframe {
    Hour,
    Day,
    Week,
    Month,
    Year,
    Decade,
}

/// RRD consolidation function.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RrdCf {
    Average,
    Max,
}

/// `POST /nodes/{node}/status`
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCommand {
    Reboot,
    Shutdown,
}

param_enum!(ClusterResourceKind, RrdTimeframe, RrdCf, NodeCommand);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamValue;

    #[test]
    fn wire_names() {
        assert_eq!(ClusterResourceKind::Vm.to_string(), "vm");
        assert_eq!(RrdCf::Average.to_string(), "AVERAGE");
        assert_eq!("decade".parse::<RrdTimeframe>().unwrap(), RrdTimeframe::Decade);
        assert_eq!(
            ParamValue::from(NodeCommand::Shutdown),
            ParamValue::Str("shutdown".into())
        );
    }
}

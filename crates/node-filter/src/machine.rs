//! Machine records and their filterable attributes.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::WORKLOAD_PREFIX;
use crate::search::AttributeResolver;
use crate::types::AttributeValue;

/// Status code of a deployed machine.
pub const STATUS_DEPLOYED: u32 = 6;
/// Status code of a machine being deployed.
pub const STATUS_DEPLOYING: u32 = 9;

/// Reference to a related model, such as a zone or a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub id: i64,
    pub name: String,
}

impl ModelRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A machine as listed by the console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Machine {
    pub system_id: String,
    pub hostname: String,
    pub fqdn: String,
    pub domain: Option<ModelRef>,
    pub status: String,
    pub status_code: u32,
    pub owner: String,
    pub tags: Vec<String>,
    pub fabrics: Vec<String>,
    pub zone: Option<ModelRef>,
    pub pool: Option<ModelRef>,
    pub pod: Option<ModelRef>,
    pub cpu_count: u32,
    pub memory: f64,
    pub storage: f64,
    pub pxe_mac: String,
    pub extra_macs: Vec<String>,
    pub power_state: String,
    pub power_type: String,
    pub osystem: String,
    pub distro_series: String,
    pub architecture: String,
    pub description: String,
    pub workload_annotations: BTreeMap<String, String>,
}

impl Machine {
    /// `osystem/distro_series`, only while the machine is deployed or deploying.
    pub fn release(&self) -> Option<String> {
        matches!(self.status_code, STATUS_DEPLOYED | STATUS_DEPLOYING)
            .then(|| format!("{}/{}", self.osystem, self.distro_series))
    }
}

/// Fields scanned by free-text terms, besides derived and workload keys.
const SCANNED_FIELDS: &[&str] = &[
    "system_id",
    "hostname",
    "fqdn",
    "domain",
    "status",
    "status_code",
    "owner",
    "tags",
    "fabrics",
    "zone",
    "pool",
    "pod",
    "cpu_count",
    "memory",
    "storage",
    "pxe_mac",
    "extra_macs",
    "power_state",
    "power_type",
    "osystem",
    "distro_series",
    "architecture",
    "description",
    "release",
];

/// Resolves machine fields and the console's derived attributes.
///
/// Besides the raw fields this exposes `cpu`/`cores`, `ram`, `mac`, `power`,
/// `pod-id`, `release`, the names of `zone`/`pool`/`domain`/`pod`, and one
/// `workload-<key>` attribute per workload annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineResolver;

impl MachineResolver {
    fn workload_key(attribute: &str) -> Option<&str> {
        attribute.strip_prefix(WORKLOAD_PREFIX)?.strip_prefix('-')
    }
}

fn model_name(model: Option<&ModelRef>) -> Option<AttributeValue<'_>> {
    model.map(|model| AttributeValue::from(model.name.as_str()))
}

impl AttributeResolver<Machine> for MachineResolver {
    fn record_id<'r>(&self, record: &'r Machine) -> Option<Cow<'r, str>> {
        Some(Cow::Borrowed(record.system_id.as_str()))
    }

    fn resolve<'r>(&self, record: &'r Machine, attribute: &str) -> Option<AttributeValue<'r>> {
        let text = |value: &'r String| Some(AttributeValue::from(value.as_str()));
        match attribute {
            "system_id" => text(&record.system_id),
            "hostname" => text(&record.hostname),
            "fqdn" => text(&record.fqdn),
            "status" => text(&record.status),
            "owner" => text(&record.owner),
            "pxe_mac" => text(&record.pxe_mac),
            "power_state" | "power" => text(&record.power_state),
            "power_type" => text(&record.power_type),
            "osystem" => text(&record.osystem),
            "distro_series" => text(&record.distro_series),
            "architecture" => text(&record.architecture),
            "description" => text(&record.description),
            "status_code" => Some(AttributeValue::from(record.status_code)),
            "cpu_count" | "cpu" | "cores" => Some(AttributeValue::from(record.cpu_count)),
            "memory" | "ram" => Some(AttributeValue::from(record.memory)),
            "storage" => Some(AttributeValue::from(record.storage)),
            "tags" => Some(AttributeValue::text_list(&record.tags)),
            "fabrics" => Some(AttributeValue::text_list(&record.fabrics)),
            "extra_macs" => Some(AttributeValue::text_list(&record.extra_macs)),
            "mac" => {
                let macs = std::iter::once(&record.pxe_mac)
                    .chain(&record.extra_macs)
                    .map(|mac| AttributeValue::from(mac.as_str()))
                    .collect();
                Some(AttributeValue::List(macs))
            }
            "zone" => model_name(record.zone.as_ref()),
            "pool" => model_name(record.pool.as_ref()),
            "domain" => model_name(record.domain.as_ref()),
            "pod" => model_name(record.pod.as_ref()),
            "pod-id" => record.pod.as_ref().map(|pod| AttributeValue::Int(pod.id)),
            "release" => record.release().map(AttributeValue::from),
            _ => {
                let key = Self::workload_key(attribute)?;
                record
                    .workload_annotations
                    .get(key)
                    .map(|value| AttributeValue::from(value.as_str()))
            }
        }
    }

    fn attribute_names<'r>(&self, record: &'r Machine) -> Vec<Cow<'r, str>> {
        let mut names: Vec<Cow<'r, str>> =
            SCANNED_FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect();
        names.extend(
            record
                .workload_annotations
                .keys()
                .map(|key| Cow::Owned(format!("{WORKLOAD_PREFIX}-{key}"))),
        );
        names
    }
}

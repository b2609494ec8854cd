// Dashboard pies: device OS family, application type, connector status.
// The three lists are fetched concurrently; each failure only empties its own pie.

use crate::api_client::ApiClient;
use crate::models::{Application, Breakdown, Breakdowns, CategoryCount, Device, Edge, OsFamily};
use futures_util::future::join3;
use tracing::{instrument, warn};

pub const ONLINE: &str = "Online";
pub const OFFLINE: &str = "Offline";

/// Edge `online` value meaning connected; anything else counts as offline.
const EDGE_ONLINE: u64 = 1;

const LINUX_MARKERS: &[&str] = &[
    "linux", "ubuntu", "debian", "centos", "fedora", "rhel", "red hat", "alpine", "suse",
    "rocky", "openwrt",
];

const APPLICATION_TYPE_LABELS: &[(&str, &str)] = &[
    ("web", "Web"),
    ("tcp", "TCP"),
    ("udp", "UDP"),
    ("ssh", "SSH"),
    ("rdp", "RDP"),
    ("database", "Database"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("redis", "Redis"),
    ("mongodb", "MongoDB"),
];

pub fn classify_os(os: &str) -> OsFamily {
    let os = os.to_lowercase();
    if LINUX_MARKERS.iter().any(|m| os.contains(m)) {
        OsFamily::Linux
    } else if os.contains("darwin") || os.contains("mac") {
        OsFamily::MacOs
    } else if os.contains("windows") {
        OsFamily::Windows
    } else {
        OsFamily::Other
    }
}

/// Display label for an application type; unmapped types are upper-cased.
pub fn application_type_label(application_type: &str) -> String {
    let t = application_type.trim();
    if t.is_empty() {
        return "UNKNOWN".to_string();
    }
    let lower = t.to_lowercase();
    APPLICATION_TYPE_LABELS
        .iter()
        .find(|(k, _)| *k == lower)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| t.to_uppercase())
}

pub fn device_breakdown(devices: &[Device]) -> Breakdown {
    tally(devices.iter().map(|d| classify_os(&d.os).label().to_string()))
}

pub fn application_breakdown(applications: &[Application]) -> Breakdown {
    tally(
        applications
            .iter()
            .map(|a| application_type_label(&a.application_type)),
    )
}

/// Online/offline counts. No connectors at all yields an empty breakdown, not a 0/0 pie.
pub fn connector_breakdown(edges: &[Edge]) -> Breakdown {
    let online = edges.iter().filter(|e| e.online == EDGE_ONLINE).count() as u64;
    let offline = edges.len() as u64 - online;
    if online == 0 && offline == 0 {
        return Breakdown::default();
    }
    Breakdown {
        total: online + offline,
        series: vec![
            CategoryCount {
                category: ONLINE.to_string(),
                count: online,
            },
            CategoryCount {
                category: OFFLINE.to_string(),
                count: offline,
            },
        ],
    }
}

/// Fetches devices, applications and edges in parallel and reduces each independently.
#[instrument(skip(api), fields(operation = "load_breakdowns"))]
pub async fn load_breakdowns(api: &ApiClient) -> Breakdowns {
    let (devices, applications, edges) =
        join3(api.list_devices(), api.list_applications(), api.list_edges()).await;

    let devices = match devices {
        Ok(d) => device_breakdown(&d),
        Err(e) => {
            warn!(error = %e, operation = "list_devices", "device breakdown unavailable");
            Breakdown::default()
        }
    };
    let applications = match applications {
        Ok(a) => application_breakdown(&a),
        Err(e) => {
            warn!(error = %e, operation = "list_applications", "application breakdown unavailable");
            Breakdown::default()
        }
    };
    let connectors = match edges {
        Ok(e) => connector_breakdown(&e),
        Err(e) => {
            warn!(error = %e, operation = "list_edges", "connector breakdown unavailable");
            Breakdown::default()
        }
    };

    tracing::debug!(
        devices = devices.total,
        applications = applications.total,
        connectors = connectors.total,
        "breakdowns loaded"
    );
    Breakdowns {
        devices,
        applications,
        connectors,
    }
}

/// Counts labels, keeping first-seen order.
fn tally(labels: impl Iterator<Item = String>) -> Breakdown {
    let mut series: Vec<CategoryCount> = Vec::new();
    let mut total = 0;
    for label in labels {
        total += 1;
        match series.iter_mut().find(|c| c.category == label) {
            Some(c) => c.count += 1,
            None => series.push(CategoryCount {
                category: label,
                count: 1,
            }),
        }
    }
    Breakdown { total, series }
}

//! Front-end route table
//!
//! Declarative mapping from URL path pattern to the view rendered for it. The
//! host router owns matching and lazy loading; this table is data only.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub view: &'static str,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: "/",
        name: "login",
        view: "LoginView",
    },
    RouteEntry {
        path: "/about",
        name: "about",
        view: "AboutView",
    },
    RouteEntry {
        path: "/hsm",
        name: "hsmgroupsummary",
        view: "HsmGroupSummaryView",
    },
    RouteEntry {
        path: "/hsm/:hsm",
        name: "hsmgroupdetails",
        view: "HsmGroupDetailsView",
    },
    RouteEntry {
        path: "/hsm/:hsm/hardware",
        name: "hsmgrouphardware",
        view: "HsmGroupHardwareView",
    },
    RouteEntry {
        path: "/console/:xname",
        name: "console",
        view: "ConsoleView",
    },
    RouteEntry {
        path: "/cfssessions",
        name: "listcfssessions",
        view: "ListCfsSessionsView",
    },
    RouteEntry {
        path: "/cfssession/:cfssession/logs",
        name: "cfssessionlogs",
        view: "CfsSessionLogsView",
    },
];

pub fn find_route(name: &str) -> Option<&'static RouteEntry> {
    ROUTES.iter().find(|route| route.name == name)
}

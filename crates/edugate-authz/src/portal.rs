//! Portals and the resolution of the portal a request targets.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Header a front-end sets to say which portal it is calling from.
pub const PORTAL_HEADER: &str = "x-portal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Portal {
    Platform,
    School,
    Teacher,
    Family,
}

/// Where the targeted portal was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalSource {
    Header,
    Path,
    Default,
}

const PORTAL_ALIASES: &[(&str, Portal)] = &[
    ("platform", Portal::Platform),
    ("plateforme", Portal::Platform),
    ("admin", Portal::Platform),
    ("internal", Portal::Platform),
    ("school", Portal::School),
    ("ecole", Portal::School),
    ("école", Portal::School),
    ("staff", Portal::School),
    ("teacher", Portal::Teacher),
    ("enseignant", Portal::Teacher),
    ("family", Portal::Family),
    ("famille", Portal::Family),
    ("parent", Portal::Family),
    ("student", Portal::Family),
    ("eleve", Portal::Family),
];

impl Portal {
    pub const ALL: [Portal; 4] = [
        Portal::Platform,
        Portal::School,
        Portal::Teacher,
        Portal::Family,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Portal::Platform => "platform",
            Portal::School => "school",
            Portal::Teacher => "teacher",
            Portal::Family => "family",
        }
    }

    pub fn from_alias(value: &str) -> Option<Portal> {
        let key = value.trim().to_lowercase();
        PORTAL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, portal)| *portal)
    }

    /// Infer a portal from whole path segments.
    ///
    /// Only singular portal segments match, so a `/students` resource path
    /// does not pull a request into the family portal.
    pub fn sniff_path(path: &str) -> Option<Portal> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| match segment.to_lowercase().as_str() {
                "platform" | "admin" => Some(Portal::Platform),
                "teacher" => Some(Portal::Teacher),
                "parent" | "student" | "family" => Some(Portal::Family),
                _ => None,
            })
    }

    /// Resolve the portal a request targets: explicit header, then path, then school.
    pub fn targeted(headers: &HeaderMap, path: &str) -> (Portal, PortalSource) {
        let header = headers
            .get(PORTAL_HEADER)
            .and_then(|value| value.to_str().ok());

        if let Some(raw) = header {
            match Portal::from_alias(raw) {
                Some(portal) => return (portal, PortalSource::Header),
                None => tracing::debug!(header = raw, "Unrecognized portal header, sniffing path"),
            }
        }

        match Portal::sniff_path(path) {
            Some(portal) => (portal, PortalSource::Path),
            None => (Portal::School, PortalSource::Default),
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_portal(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(PORTAL_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_header_wins_over_path() {
        let headers = headers_with_portal("Teacher");
        assert_eq!(
            Portal::targeted(&headers, "/api/parent/report-cards"),
            (Portal::Teacher, PortalSource::Header)
        );
    }

    #[test]
    fn test_header_aliases() {
        for (alias, expected) in [
            ("plateforme", Portal::Platform),
            ("ECOLE", Portal::School),
            ("famille", Portal::Family),
            ("student", Portal::Family),
        ] {
            assert_eq!(Portal::from_alias(alias), Some(expected), "{alias}");
        }
    }

    #[test]
    fn test_unknown_header_falls_back_to_path() {
        let headers = headers_with_portal("backoffice");
        assert_eq!(
            Portal::targeted(&headers, "/api/teacher/exams"),
            (Portal::Teacher, PortalSource::Path)
        );
    }

    #[test]
    fn test_path_sniffing() {
        assert_eq!(Portal::sniff_path("/api/admin/tenants"), Some(Portal::Platform));
        assert_eq!(Portal::sniff_path("/platform/health"), Some(Portal::Platform));
        assert_eq!(Portal::sniff_path("/api/teacher/grades"), Some(Portal::Teacher));
        assert_eq!(Portal::sniff_path("/api/parent/children"), Some(Portal::Family));
        assert_eq!(Portal::sniff_path("/api/student/timetable"), Some(Portal::Family));
    }

    #[test]
    fn test_resource_paths_do_not_sniff() {
        assert_eq!(Portal::sniff_path("/api/students"), None);
        assert_eq!(Portal::sniff_path("/api/teachers/42"), None);
    }

    #[test]
    fn test_default_is_school() {
        assert_eq!(
            Portal::targeted(&HeaderMap::new(), "/api/exams/12"),
            (Portal::School, PortalSource::Default)
        );
    }
}

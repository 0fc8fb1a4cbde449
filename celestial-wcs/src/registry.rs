//! Table of the projections this crate can construct, keyed by FITS code.

use std::fmt::Write;

use crate::error::{WcsError, WcsResult};
use crate::spherical::{Projection, ProjectionFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub family: ProjectionFamily,
}

pub const PROJECTIONS: &[ProjectionInfo] = &[
    ProjectionInfo {
        code: "AZP",
        name: "zenithal/azimuthal perspective",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "TAN",
        name: "gnomonic",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "STG",
        name: "stereographic",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "SIN",
        name: "orthographic/synthesis",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "ARC",
        name: "zenithal/azimuthal equidistant",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "ZEA",
        name: "zenithal/azimuthal equal area",
        family: ProjectionFamily::Zenithal,
    },
    ProjectionInfo {
        code: "CEA",
        name: "cylindrical equal area",
        family: ProjectionFamily::Cylindrical,
    },
    ProjectionInfo {
        code: "CAR",
        name: "plate carree",
        family: ProjectionFamily::Cylindrical,
    },
    ProjectionInfo {
        code: "MER",
        name: "Mercator",
        family: ProjectionFamily::Cylindrical,
    },
];

/// Case-insensitive lookup by three-letter code.
pub fn lookup(code: &str) -> Option<&'static ProjectionInfo> {
    let code = code.trim();
    PROJECTIONS
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code))
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// Projection with default parameters for a registered code.
pub fn create(code: &str) -> WcsResult<Projection> {
    let info = lookup(code).ok_or_else(|| WcsError::unsupported_projection(code))?;
    Projection::from_code(info.code)
}

/// One line per registered projection, `CODE: name`.
pub fn list() -> String {
    let mut out = String::new();
    for info in PROJECTIONS {
        let _ = writeln!(out, "{}: {}", info.code, info.name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_constructs() {
        for info in PROJECTIONS {
            let projection = create(info.code).unwrap();
            assert_eq!(projection.code(), info.code);
            assert_eq!(projection.family(), info.family);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("tan").map(|i| i.name), Some("gnomonic"));
        assert!(is_supported(" CAR "));
        assert!(!is_supported("AIT"));
        assert!(matches!(
            create("HPX"),
            Err(WcsError::UnsupportedProjection { .. })
        ));
    }

    #[test]
    fn test_list() {
        let text = list();
        assert_eq!(text.lines().count(), PROJECTIONS.len());
        assert!(text.contains("STG: stereographic"));
    }
}

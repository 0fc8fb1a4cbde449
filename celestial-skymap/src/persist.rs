//! FITS layout of a sky map.
//!
//! One primary HDU of `BITPIX = -64` values, plane after plane.
//!
//! | Geometry | Axes | Scheme keywords |
//! |----------|------|-----------------|
//! | HEALPix | `npix`, `nmaps` | `PIXTYPE`, `ORDERING`, `NSIDE`, `FIRSTPIX`, `LASTPIX`, `COORDSYS` |
//! | WCS | `nx`, `ny`, `nmaps` | `CTYPEi`, `CRVALi`, `CRPIXi`, `CDELTi`, `PV2_m`, `LONPOLE`, `LATPOLE` |
//!
//! Both carry `EXTNAME = 'SKYMAP'` and `NMAPS`.

use std::io::{BufWriter, ErrorKind};
use std::path::Path;

use celestial_coords::CoordSystem;
use celestial_images::{FitsError, FitsReader, FitsWriter, Header, Keyword, PrimaryImage};
use celestial_wcs::{KeywordProvider, WcsBuilder, WcsKeyword, WcsKeywordValue};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{SkymapError, SkymapResult};
use crate::healpix::HealpixOrdering;
use crate::projection::{SkyProjection, WcsGrid};
use crate::skymap::Skymap;

pub const EXTNAME: &str = "SKYMAP";

/// Read-only view of a FITS header for WCS reconstruction.
struct HeaderKeywords<'a>(&'a Header);

impl KeywordProvider for HeaderKeywords<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get_string(key).map(str::to_string)
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.0.get_real(key)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.0.get_integer(key)
    }
}

pub(crate) fn write(map: &Skymap, path: &Path, overwrite: bool) -> SkymapResult<()> {
    if !overwrite && path.exists() {
        warn!(path = %path.display(), "refusing to overwrite existing sky map");
        return Err(SkymapError::FileExists {
            path: path.to_path_buf(),
        });
    }

    let (dimensions, keywords) = layout(map);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    FitsWriter::new(BufWriter::new(temp.as_file_mut())).write_primary_image(
        map.pixels(),
        &dimensions,
        &keywords,
    )?;
    temp.as_file().sync_all()?;

    let persisted = if overwrite {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };
    persisted.map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists => SkymapError::FileExists {
            path: path.to_path_buf(),
        },
        _ => SkymapError::Io(e.error),
    })?;

    debug!(
        path = %path.display(),
        projection = %map.projection(),
        nmaps = map.nmaps(),
        "saved sky map"
    );
    Ok(())
}

/// Axis lengths and scheme keywords for `map`.
fn layout(map: &Skymap) -> (Vec<usize>, Vec<Keyword>) {
    let mut keywords = vec![Keyword::string("EXTNAME", EXTNAME)];

    let dimensions = match map.projection() {
        SkyProjection::Healpix { system, grid } => {
            keywords.push(Keyword::string("PIXTYPE", "HEALPIX"));
            keywords.push(Keyword::string("ORDERING", grid.ordering().name()));
            keywords.push(Keyword::integer("NSIDE", grid.nside() as i64));
            keywords.push(Keyword::integer("FIRSTPIX", 0));
            keywords.push(Keyword::integer("LASTPIX", grid.npix() as i64 - 1));
            keywords.push(Keyword::string("COORDSYS", system.coordsys_letter()));
            vec![map.npix(), map.nmaps()]
        }
        SkyProjection::Wcs(grid) => {
            keywords.extend(grid.wcs().to_keywords().into_iter().map(to_fits_keyword));
            vec![grid.nx(), grid.ny(), map.nmaps()]
        }
    };

    keywords.push(Keyword::integer("NMAPS", map.nmaps() as i64).with_comment("number of maps"));
    (dimensions, keywords)
}

fn to_fits_keyword(keyword: WcsKeyword) -> Keyword {
    match keyword.value {
        WcsKeywordValue::Real(v) => Keyword::real(keyword.name, v),
        WcsKeywordValue::Integer(v) => Keyword::integer(keyword.name, v),
        WcsKeywordValue::String(v) => Keyword::string(keyword.name, v),
    }
}

pub(crate) fn read(path: &Path) -> SkymapResult<Skymap> {
    let image = FitsReader::open(path)
        .and_then(|mut reader| reader.read_primary())
        .map_err(|e| read_error(path, e))?;

    let is_healpix = image
        .header
        .get_string("PIXTYPE")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("HEALPIX"));
    let (projection, nmaps) = if is_healpix {
        healpix_layout(&image)?
    } else {
        wcs_layout(&image)?
    };

    if let Some(declared) = image.header.get_integer("NMAPS") {
        if declared != nmaps as i64 {
            return Err(SkymapError::format(format!(
                "NMAPS = {} but the data holds {} maps",
                declared, nmaps
            )));
        }
    }

    debug!(
        path = %path.display(),
        %projection,
        nmaps,
        "loaded sky map"
    );
    Skymap::from_parts(projection, nmaps, image.data)
}

/// Structural problems in the file are format errors; the OS error of a
/// failed read is passed through.
fn read_error(path: &Path, error: FitsError) -> SkymapError {
    match error {
        FitsError::Io(e) => SkymapError::Io(e),
        FitsError::UnexpectedEof => {
            SkymapError::format(format!("{} ends before its data block", path.display()))
        }
        other => SkymapError::format(format!("{}: {}", path.display(), other)),
    }
}

fn healpix_layout(image: &PrimaryImage) -> SkymapResult<(SkyProjection, usize)> {
    let header = &image.header;
    let nside = header
        .get_integer("NSIDE")
        .ok_or_else(|| SkymapError::format("HEALPix map without NSIDE"))?;
    let ordering = match header.get_string("ORDERING") {
        Some(name) => HealpixOrdering::from_name(name)
            .map_err(|_| SkymapError::format(format!("unknown ORDERING '{}'", name)))?,
        None => return Err(SkymapError::format("HEALPix map without ORDERING")),
    };
    let system = match header.get_string("COORDSYS") {
        Some(name) => CoordSystem::from_name(name)
            .map_err(|_| SkymapError::format(format!("unknown COORDSYS '{}'", name)))?,
        None => {
            warn!("HEALPix map without COORDSYS, assuming equatorial");
            CoordSystem::Equatorial
        }
    };

    let nside = u64::try_from(nside)
        .map_err(|_| SkymapError::format(format!("invalid NSIDE {}", nside)))?;
    let projection = SkyProjection::healpix(system, nside, ordering)
        .map_err(|e| SkymapError::format(e.to_string()))?;
    let npix = projection.npix();

    let nmaps = match image.dimensions.as_slice() {
        [n] if *n == npix => 1,
        [n, nmaps] if *n == npix => *nmaps,
        dims => {
            return Err(SkymapError::format(format!(
                "image axes {:?} do not match {} HEALPix pixels",
                dims, npix
            )))
        }
    };

    let firstpix = header.get_integer("FIRSTPIX").unwrap_or(0);
    let lastpix = header.get_integer("LASTPIX").unwrap_or(npix as i64 - 1);
    if firstpix != 0 || lastpix != npix as i64 - 1 {
        return Err(SkymapError::format(format!(
            "partial HEALPix maps are not supported (pixels {}..={})",
            firstpix, lastpix
        )));
    }

    Ok((projection, nmaps))
}

fn wcs_layout(image: &PrimaryImage) -> SkymapResult<(SkyProjection, usize)> {
    let wcs = WcsBuilder::from_header(&HeaderKeywords(&image.header))
        .and_then(WcsBuilder::build)
        .map_err(|e| SkymapError::format(format!("no usable sky pixelization: {}", e)))?;

    let (nx, ny, nmaps) = match image.dimensions.as_slice() {
        [nx, ny] => (*nx, *ny, 1),
        [nx, ny, nmaps] => (*nx, *ny, *nmaps),
        dims => {
            return Err(SkymapError::format(format!(
                "expected 2 or 3 image axes for a WCS map, got {:?}",
                dims
            )))
        }
    };

    let grid = WcsGrid::new(wcs, nx, ny).map_err(|e| SkymapError::format(e.to_string()))?;
    Ok((SkyProjection::Wcs(grid), nmaps))
}

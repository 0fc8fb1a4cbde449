use std::collections::BTreeMap;

use celestial_coords::{CoordSystem, SkyDir};
use celestial_core::Angle;

use crate::coordinate::{CelestialCoord, PixelCoord};
use crate::error::{WcsError, WcsResult};
use crate::header::KeywordProvider;
use crate::linear::LinearTransform;
use crate::spherical::{Projection, SphericalRotation};

/// A complete two-axis celestial WCS: linear transform, projection and
/// spherical rotation, tied to a coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    linear: LinearTransform,
    projection: Projection,
    rotation: SphericalRotation,
    system: CoordSystem,
    crval_deg: (f64, f64),
    lonpole: Option<f64>,
    latpole: Option<f64>,
}

impl Wcs {
    pub fn pixel_to_celestial(&self, pixel: PixelCoord) -> WcsResult<CelestialCoord> {
        let intermediate = self.linear.pixel_to_intermediate(pixel);
        let native = self.projection.deproject(intermediate)?;
        Ok(self.rotation.native_to_celestial(native))
    }

    pub fn celestial_to_pixel(&self, celestial: CelestialCoord) -> WcsResult<PixelCoord> {
        let native = self.rotation.celestial_to_native(celestial);
        let intermediate = self.projection.project(native)?;
        Ok(self.linear.intermediate_to_pixel(intermediate))
    }

    /// Direction at a pixel position, in this WCS's frame.
    pub fn pixel_to_sky(&self, pixel: PixelCoord) -> WcsResult<SkyDir> {
        let celestial = self.pixel_to_celestial(pixel)?;
        Ok(SkyDir::from_lon_lat(
            self.system,
            celestial.alpha(),
            celestial.delta(),
        )?)
    }

    /// Pixel position of a direction given in any frame.
    pub fn sky_to_pixel(&self, dir: &SkyDir) -> WcsResult<PixelCoord> {
        let (lon, lat) = dir.lon_lat(self.system);
        self.celestial_to_pixel(CelestialCoord::new(lon, lat))
    }

    pub fn pix2world(&self, x: f64, y: f64) -> WcsResult<(f64, f64)> {
        let c = self.pixel_to_celestial(PixelCoord::new(x, y))?;
        Ok((c.alpha().degrees(), c.delta().degrees()))
    }

    pub fn world2pix(&self, lon: f64, lat: f64) -> WcsResult<(f64, f64)> {
        let p = self.celestial_to_pixel(CelestialCoord::from_degrees(lon, lat))?;
        Ok((p.x(), p.y()))
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn system(&self) -> CoordSystem {
        self.system
    }

    #[inline]
    pub fn crpix(&self) -> [f64; 2] {
        self.linear.crpix()
    }

    #[inline]
    pub fn crval(&self) -> (f64, f64) {
        self.crval_deg
    }

    #[inline]
    pub fn cdelt(&self) -> Option<[f64; 2]> {
        self.linear.cdelt()
    }

    #[inline]
    pub fn lonpole(&self) -> Option<f64> {
        self.lonpole
    }

    #[inline]
    pub fn latpole(&self) -> Option<f64> {
        self.latpole
    }

    #[inline]
    pub fn linear(&self) -> &LinearTransform {
        &self.linear
    }

    #[inline]
    pub fn rotation(&self) -> &SphericalRotation {
        &self.rotation
    }

    /// Header keywords describing this WCS, in writing order.
    ///
    /// CDELT is written for axis-aligned grids and the CD matrix otherwise.
    /// LONPOLE and LATPOLE appear only when they were given explicitly, and
    /// PV2_m only for parameters that differ from their defaults.
    pub fn to_keywords(&self) -> Vec<WcsKeyword> {
        let (lon_prefix, lat_prefix) = self.system.ctype_prefixes();
        let code = self.projection.code();
        let crpix = self.linear.crpix();

        let mut keywords = vec![
            WcsKeyword::string("CTYPE1", format_ctype(lon_prefix, code)),
            WcsKeyword::string("CTYPE2", format_ctype(lat_prefix, code)),
            WcsKeyword::real("CRVAL1", self.crval_deg.0),
            WcsKeyword::real("CRVAL2", self.crval_deg.1),
            WcsKeyword::real("CRPIX1", crpix[0]),
            WcsKeyword::real("CRPIX2", crpix[1]),
        ];

        match self.linear.cdelt() {
            Some(cdelt) => {
                keywords.push(WcsKeyword::real("CDELT1", cdelt[0]));
                keywords.push(WcsKeyword::real("CDELT2", cdelt[1]));
            }
            None => {
                let cd = self.linear.cd_matrix();
                for (i, row) in cd.iter().enumerate() {
                    for (j, value) in row.iter().enumerate() {
                        keywords.push(WcsKeyword::real(format!("CD{}_{}", i + 1, j + 1), *value));
                    }
                }
            }
        }

        if let Some(lonpole) = self.lonpole {
            keywords.push(WcsKeyword::real("LONPOLE", lonpole));
        }
        if let Some(latpole) = self.latpole {
            keywords.push(WcsKeyword::real("LATPOLE", latpole));
        }
        for (index, value) in self.projection.pv_params() {
            keywords.push(WcsKeyword::real(format!("PV2_{}", index), value));
        }

        keywords
    }
}

fn format_ctype(prefix: &str, proj_code: &str) -> String {
    format!("{:-<5}{}", prefix, proj_code)
}

#[derive(Debug, Clone, PartialEq)]
pub enum WcsKeywordValue {
    Real(f64),
    Integer(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WcsKeyword {
    pub name: String,
    pub value: WcsKeywordValue,
}

impl WcsKeyword {
    pub fn real(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: WcsKeywordValue::Real(value),
        }
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: WcsKeywordValue::Integer(value),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: WcsKeywordValue::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum MatrixSpec {
    #[default]
    None,
    Cd([[f64; 2]; 2]),
    PcCdelt {
        pc: [[f64; 2]; 2],
        cdelt: [f64; 2],
    },
}

#[derive(Debug, Clone, Default)]
pub struct WcsBuilder {
    crpix: Option<[f64; 2]>,
    crval: Option<[f64; 2]>,
    matrix: MatrixSpec,
    projection: Option<Projection>,
    proj_code: Option<String>,
    lonpole: Option<f64>,
    latpole: Option<f64>,
    pv_params: BTreeMap<u32, f64>,
    system: Option<CoordSystem>,
}

impl WcsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crpix(mut self, x: f64, y: f64) -> Self {
        self.crpix = Some([x, y]);
        self
    }

    pub fn crval(mut self, lon: f64, lat: f64) -> Self {
        self.crval = Some([lon, lat]);
        self
    }

    pub fn cdelt(self, cdelt1: f64, cdelt2: f64) -> Self {
        self.pc_cdelt([[1.0, 0.0], [0.0, 1.0]], [cdelt1, cdelt2])
    }

    pub fn cd_matrix(mut self, cd: [[f64; 2]; 2]) -> Self {
        self.matrix = MatrixSpec::Cd(cd);
        self
    }

    pub fn pc_cdelt(mut self, pc: [[f64; 2]; 2], cdelt: [f64; 2]) -> Self {
        self.matrix = MatrixSpec::PcCdelt { pc, cdelt };
        self
    }

    pub fn projection(mut self, proj: Projection) -> Self {
        self.projection = Some(proj);
        self
    }

    pub fn proj_code(mut self, code: impl Into<String>) -> Self {
        self.proj_code = Some(code.into());
        self
    }

    /// Latitude-axis projection parameter PV2_`index`.
    pub fn pv(mut self, index: u32, value: f64) -> Self {
        self.pv_params.insert(index, value);
        self
    }

    pub fn lonpole(mut self, lonpole: f64) -> Self {
        self.lonpole = Some(lonpole);
        self
    }

    pub fn latpole(mut self, latpole: f64) -> Self {
        self.latpole = Some(latpole);
        self
    }

    pub fn system(mut self, system: CoordSystem) -> Self {
        self.system = Some(system);
        self
    }

    pub fn from_header(header: &impl KeywordProvider) -> WcsResult<Self> {
        let ctype1 = header.require_string("CTYPE1")?;
        let ctype2 = header.require_string("CTYPE2")?;

        let (prefix1, code1) = parse_ctype(&ctype1)?;
        let (prefix2, code2) = parse_ctype(&ctype2)?;

        if code1 != code2 {
            return Err(WcsError::invalid_keyword(
                "CTYPE1/CTYPE2",
                format!("mismatched projection codes: '{}' vs '{}'", code1, code2),
            ));
        }

        let system = CoordSystem::from_ctype_prefix(prefix1)
            .ok_or_else(|| {
                WcsError::invalid_keyword("CTYPE1", format!("unsupported axis '{}'", prefix1))
            })?;
        if system.ctype_prefixes() != (prefix1, prefix2) {
            return Err(WcsError::invalid_keyword(
                "CTYPE1/CTYPE2",
                format!("axes '{}' and '{}' do not form a celestial pair", prefix1, prefix2),
            ));
        }

        let mut builder = Self::new()
            .crpix(header.require_float("CRPIX1")?, header.require_float("CRPIX2")?)
            .crval(header.require_float("CRVAL1")?, header.require_float("CRVAL2")?)
            .system(system)
            .proj_code(code1);
        builder.matrix = parse_matrix(header)?;
        builder.lonpole = header.get_float("LONPOLE");
        builder.latpole = header.get_float("LATPOLE");
        builder.pv_params = parse_pv_params(header);

        Ok(builder)
    }

    pub fn validate(&self) -> WcsResult<()> {
        if self.crpix.is_none() {
            return Err(WcsError::missing_keyword("CRPIX"));
        }
        if self.crval.is_none() {
            return Err(WcsError::missing_keyword("CRVAL"));
        }
        if self.matrix == MatrixSpec::None {
            return Err(WcsError::missing_keyword("CD or CDELT"));
        }
        if self.projection.is_none() && self.proj_code.is_none() {
            return Err(WcsError::missing_keyword("projection code"));
        }
        Ok(())
    }

    pub fn build(self) -> WcsResult<Wcs> {
        self.validate()?;
        let crpix = self.crpix.ok_or_else(|| WcsError::missing_keyword("CRPIX"))?;
        let crval = self.crval.ok_or_else(|| WcsError::missing_keyword("CRVAL"))?;

        if !crval[0].is_finite() || !crval[1].is_finite() || crval[1].abs() > 90.0 {
            return Err(WcsError::invalid_parameter(format!(
                "CRVAL ({}, {}) is not a valid sky position",
                crval[0], crval[1]
            )));
        }

        let linear = match self.matrix {
            MatrixSpec::Cd(cd) => LinearTransform::from_cd(crpix, cd)?,
            MatrixSpec::PcCdelt { pc, cdelt } => {
                if cdelt[0] == 0.0 || cdelt[1] == 0.0 {
                    return Err(WcsError::invalid_parameter("CDELT must be non-zero"));
                }
                LinearTransform::from_pc_cdelt(crpix, pc, cdelt)?
            }
            MatrixSpec::None => return Err(WcsError::missing_keyword("CD or CDELT")),
        };

        let mut projection = match (self.projection, &self.proj_code) {
            (Some(proj), _) => proj,
            (None, Some(code)) => Projection::from_code(code)?,
            (None, None) => return Err(WcsError::missing_keyword("projection code")),
        };
        for (&index, &value) in &self.pv_params {
            projection = projection.with_pv(index, value)?;
        }

        let (_, theta_0) = projection.native_reference();
        let rotation = SphericalRotation::from_crval(
            Angle::from_degrees(crval[0]),
            Angle::from_degrees(crval[1]),
            Angle::from_degrees(theta_0),
            self.lonpole.map(Angle::from_degrees),
            self.latpole.map(Angle::from_degrees),
        )?;

        Ok(Wcs {
            linear,
            projection,
            rotation,
            system: self.system.unwrap_or_default(),
            crval_deg: (crval[0], crval[1]),
            lonpole: self.lonpole,
            latpole: self.latpole,
        })
    }
}

/// Splits `RA---TAN` into (`RA`, `TAN`).
fn parse_ctype(ctype: &str) -> WcsResult<(&str, &str)> {
    let trimmed = ctype.trim();
    let dash_pos = trimmed.rfind('-').ok_or_else(|| {
        WcsError::invalid_keyword("CTYPE", format!("no projection code in '{}'", ctype))
    })?;
    let prefix = trimmed[..dash_pos].trim_end_matches('-');
    let code = &trimmed[dash_pos + 1..];
    if prefix.is_empty() || code.is_empty() {
        return Err(WcsError::invalid_keyword(
            "CTYPE",
            format!("malformed axis type '{}'", ctype),
        ));
    }
    Ok((prefix, code))
}

fn parse_matrix(header: &impl KeywordProvider) -> WcsResult<MatrixSpec> {
    let cd: Vec<Option<f64>> = ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]
        .iter()
        .map(|key| header.get_float(key))
        .collect();

    if cd.iter().any(Option::is_some) {
        let at = |i: usize| cd[i].unwrap_or(0.0);
        return Ok(MatrixSpec::Cd([[at(0), at(1)], [at(2), at(3)]]));
    }

    if let (Some(c1), Some(c2)) = (header.get_float("CDELT1"), header.get_float("CDELT2")) {
        let pc = [
            [
                header.get_float("PC1_1").unwrap_or(1.0),
                header.get_float("PC1_2").unwrap_or(0.0),
            ],
            [
                header.get_float("PC2_1").unwrap_or(0.0),
                header.get_float("PC2_2").unwrap_or(1.0),
            ],
        ];
        return Ok(MatrixSpec::PcCdelt {
            pc,
            cdelt: [c1, c2],
        });
    }

    Err(WcsError::missing_keyword("CD1_1 or CDELT1"))
}

fn parse_pv_params(header: &impl KeywordProvider) -> BTreeMap<u32, f64> {
    (0..=20u32)
        .filter_map(|index| {
            header
                .get_float(&format!("PV2_{}", index))
                .map(|value| (index, value))
        })
        .collect()
}

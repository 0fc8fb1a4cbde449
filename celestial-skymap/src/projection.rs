//! Pixelization schemes a [`Skymap`](crate::Skymap) can be laid out on.

use std::fmt;

use celestial_coords::{CoordSystem, SkyDir};
use celestial_wcs::{PixelCoord, Wcs};

use crate::error::{SkymapError, SkymapResult};
use crate::healpix::{HealpixGrid, HealpixOrdering};
use crate::pixel::SkyPixel;

/// A WCS projection over a finite `nx` × `ny` grid. Pixel `(ix, iy)` has
/// index `ix + iy * nx`.
#[derive(Debug, Clone, PartialEq)]
pub struct WcsGrid {
    wcs: Wcs,
    nx: usize,
    ny: usize,
}

impl WcsGrid {
    pub fn new(wcs: Wcs, nx: usize, ny: usize) -> SkymapResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(SkymapError::invalid_parameter(format!(
                "grid dimensions must be positive, got {} x {}",
                nx, ny
            )));
        }
        nx.checked_mul(ny).ok_or_else(|| {
            SkymapError::invalid_parameter(format!("grid {} x {} is too large", nx, ny))
        })?;
        Ok(Self { wcs, nx, ny })
    }

    #[inline]
    pub fn wcs(&self) -> &Wcs {
        &self.wcs
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }
}

/// Closed set of supported pixelizations, each tied to a sky frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyProjection {
    Healpix {
        system: CoordSystem,
        grid: HealpixGrid,
    },
    Wcs(WcsGrid),
}

impl SkyProjection {
    pub fn healpix(
        system: CoordSystem,
        nside: u64,
        ordering: HealpixOrdering,
    ) -> SkymapResult<Self> {
        let grid = HealpixGrid::from_nside(nside, ordering)?;
        usize::try_from(grid.npix()).map_err(|_| {
            SkymapError::invalid_parameter(format!("nside {} is too large to address", nside))
        })?;
        Ok(Self::Healpix { system, grid })
    }

    /// WCS projection over an `nx` × `ny` grid; the frame is the WCS's own.
    pub fn wcs(wcs: Wcs, nx: usize, ny: usize) -> SkymapResult<Self> {
        Ok(Self::Wcs(WcsGrid::new(wcs, nx, ny)?))
    }

    pub fn system(&self) -> CoordSystem {
        match self {
            Self::Healpix { system, .. } => *system,
            Self::Wcs(grid) => grid.wcs.system(),
        }
    }

    /// `HPX` for HEALPix, otherwise the three-letter WCS code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Healpix { .. } => "HPX",
            Self::Wcs(grid) => grid.wcs.projection().code(),
        }
    }

    pub fn healpix_grid(&self) -> Option<&HealpixGrid> {
        match self {
            Self::Healpix { grid, .. } => Some(grid),
            Self::Wcs(_) => None,
        }
    }

    pub fn wcs_grid(&self) -> Option<&WcsGrid> {
        match self {
            Self::Healpix { .. } => None,
            Self::Wcs(grid) => Some(grid),
        }
    }

    pub fn npix(&self) -> usize {
        match self {
            Self::Healpix { grid, .. } => grid.npix() as usize,
            Self::Wcs(grid) => grid.nx * grid.ny,
        }
    }

    /// Pixels along the first axis; every HEALPix pixel sits on it.
    pub fn nx(&self) -> usize {
        match self {
            Self::Healpix { .. } => self.npix(),
            Self::Wcs(grid) => grid.nx,
        }
    }

    pub fn ny(&self) -> usize {
        match self {
            Self::Healpix { .. } => 1,
            Self::Wcs(grid) => grid.ny,
        }
    }

    /// Direction of the centre of `pixel`.
    pub fn pix2dir(&self, pixel: usize) -> SkymapResult<SkyDir> {
        self.check_pixel(pixel)?;
        match self {
            Self::Healpix { system, grid } => grid.pix2dir(pixel as u64, *system),
            Self::Wcs(_) => self.xy2dir(self.index_to_xy(pixel)?),
        }
    }

    /// Pixel containing `dir`.
    ///
    /// # Errors
    ///
    /// [`SkymapError::OutsideField`] when the direction cannot be projected
    /// or falls off the grid. HEALPix covers the whole sphere and never fails.
    pub fn dir2pix(&self, dir: &SkyDir) -> SkymapResult<usize> {
        match self {
            Self::Healpix { system, grid } => Ok(grid.dir2pix(dir, *system) as usize),
            Self::Wcs(_) => self.xy_to_index(self.dir2xy(dir)?),
        }
    }

    /// Direction at a continuous zero-based pixel position.
    pub fn xy2dir(&self, pixel: SkyPixel) -> SkymapResult<SkyDir> {
        match self {
            Self::Healpix { .. } => self.pix2dir(self.xy_to_index(pixel)?),
            Self::Wcs(grid) => Ok(grid
                .wcs
                .pixel_to_sky(PixelCoord::new(pixel.x() + 1.0, pixel.y() + 1.0))?),
        }
    }

    /// Continuous zero-based pixel position of `dir`. The position may lie
    /// off the grid; only projection failures are errors.
    pub fn dir2xy(&self, dir: &SkyDir) -> SkymapResult<SkyPixel> {
        match self {
            Self::Healpix { .. } => Ok(SkyPixel::from_index(self.dir2pix(dir)?)),
            Self::Wcs(grid) => {
                let p = grid.wcs.sky_to_pixel(dir)?;
                let pixel = SkyPixel::new(p.x() - 1.0, p.y() - 1.0);
                if !pixel.is_finite() {
                    return Err(SkymapError::outside_field(format!(
                        "{} has no finite pixel position",
                        format_dir(dir, self.system())
                    )));
                }
                Ok(pixel)
            }
        }
    }

    /// Index of the cell containing `pixel`. Cell `i` covers
    /// `[i - 0.5, i + 0.5)` on each axis.
    pub fn xy_to_index(&self, pixel: SkyPixel) -> SkymapResult<usize> {
        if !pixel.is_finite() {
            return Err(SkymapError::outside_field(format!(
                "pixel position {} is not finite",
                pixel
            )));
        }
        let (ix, iy) = PixelCoord::new(pixel.x() + 1.0, pixel.y() + 1.0).grid_cell();
        let (nx, ny) = (self.nx(), self.ny());
        if ix < 0 || iy < 0 || ix as u64 >= nx as u64 || iy as u64 >= ny as u64 {
            return Err(SkymapError::outside_field(format!(
                "pixel position {} is off the {} x {} grid",
                pixel, nx, ny
            )));
        }
        Ok(ix as usize + iy as usize * nx)
    }

    /// Centre of `pixel` as a two-dimensional position.
    pub fn index_to_xy(&self, pixel: usize) -> SkymapResult<SkyPixel> {
        self.check_pixel(pixel)?;
        let nx = self.nx();
        Ok(SkyPixel::new((pixel % nx) as f64, (pixel / nx) as f64))
    }

    /// Solid angle of `pixel` in steradians.
    ///
    /// WCS pixels are measured as the spherical quadrilateral through their
    /// four corners.
    pub fn omega(&self, pixel: usize) -> SkymapResult<f64> {
        self.check_pixel(pixel)?;
        match self {
            Self::Healpix { grid, .. } => Ok(grid.pixel_solid_angle()),
            Self::Wcs(grid) => {
                let centre = self.index_to_xy(pixel)?;
                let system = grid.wcs.system();
                let mut corners = [[0.0; 3]; 4];
                let offsets = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
                for (corner, (dx, dy)) in corners.iter_mut().zip(offsets) {
                    let at = SkyPixel::new(centre.x() + dx, centre.y() + dy);
                    *corner = self.xy2dir(at)?.unit_vector(system);
                }
                Ok(triangle_solid_angle(corners[0], corners[1], corners[2])
                    + triangle_solid_angle(corners[0], corners[2], corners[3]))
            }
        }
    }

    fn check_pixel(&self, pixel: usize) -> SkymapResult<()> {
        let npix = self.npix();
        if pixel >= npix {
            return Err(SkymapError::PixelOutOfRange { pixel, npix });
        }
        Ok(())
    }
}

impl fmt::Display for SkyProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healpix { system, grid } => write!(f, "{} {}", grid, system),
            Self::Wcs(grid) => {
                let (lon, lat) = grid.wcs.crval();
                write!(
                    f,
                    "{} {} {} x {} at ({}, {})",
                    self.code(),
                    self.system(),
                    grid.nx,
                    grid.ny,
                    lon,
                    lat
                )
            }
        }
    }
}

fn format_dir(dir: &SkyDir, system: CoordSystem) -> String {
    let (lon, lat) = dir.lon_lat_degrees(system);
    format!("({:.6}, {:.6}) {}", lon, lat, system)
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Van Oosterom & Strackee (1983).
fn triangle_solid_angle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let numerator = dot(a, cross(b, c)).abs();
    let denominator = 1.0 + dot(a, b) + dot(b, c) + dot(c, a);
    2.0 * libm::atan2(numerator, denominator)
}

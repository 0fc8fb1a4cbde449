use std::fmt;
use std::ops::{Index, IndexMut};
use std::path::Path;

use celestial_coords::{CoordSystem, SkyDir};
use tracing::debug;

use crate::config::SkymapConfig;
use crate::error::{SkymapError, SkymapResult};
use crate::healpix::HealpixOrdering;
use crate::persist;
use crate::pixel::SkyPixel;
use crate::projection::SkyProjection;

/// One or more data planes over a common sky pixelization.
///
/// Values live in a single buffer, plane after plane:
/// `value(pixel, plane) = pixels[pixel + plane * npix]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Skymap {
    projection: SkyProjection,
    npix: usize,
    nmaps: usize,
    pixels: Vec<f64>,
}

impl Skymap {
    /// Zero-filled map with `nmaps` planes.
    pub fn from_projection(projection: SkyProjection, nmaps: usize) -> SkymapResult<Self> {
        let npix = projection.npix();
        let len = buffer_len(npix, nmaps)?;
        debug!(%projection, nmaps, "creating sky map");
        Ok(Self {
            projection,
            npix,
            nmaps,
            pixels: vec![0.0; len],
        })
    }

    /// Map over an existing value buffer, laid out plane after plane.
    pub(crate) fn from_parts(
        projection: SkyProjection,
        nmaps: usize,
        pixels: Vec<f64>,
    ) -> SkymapResult<Self> {
        let npix = projection.npix();
        let len = buffer_len(npix, nmaps)?;
        if pixels.len() != len {
            return Err(SkymapError::format(format!(
                "{} values for {} pixels x {} maps",
                pixels.len(),
                npix,
                nmaps
            )));
        }
        Ok(Self {
            projection,
            npix,
            nmaps,
            pixels,
        })
    }

    pub fn healpix(
        system: CoordSystem,
        nside: u64,
        ordering: HealpixOrdering,
        nmaps: usize,
    ) -> SkymapResult<Self> {
        Self::from_projection(SkyProjection::healpix(system, nside, ordering)?, nmaps)
    }

    /// WCS map of `nx` × `ny` pixels centred on `crval` (degrees), with
    /// signed pixel increments `cdelt` (degrees per pixel).
    pub fn projected(
        code: &str,
        system: CoordSystem,
        crval: (f64, f64),
        cdelt: (f64, f64),
        nx: usize,
        ny: usize,
        nmaps: usize,
    ) -> SkymapResult<Self> {
        let config = SkymapConfig::wcs(system, code, [crval.0, crval.1], [cdelt.0, cdelt.1], nx, ny)
            .with_nmaps(nmaps);
        Self::from_config(&config)
    }

    pub fn from_config(config: &SkymapConfig) -> SkymapResult<Self> {
        Self::from_projection(config.projection()?, config.nmaps)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SkymapResult<Self> {
        persist::read(path.as_ref())
    }

    /// Writes the map as FITS. With `overwrite == false` an existing file is
    /// left untouched and [`SkymapError::FileExists`] is returned.
    pub fn save<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> SkymapResult<()> {
        persist::write(self, path.as_ref(), overwrite)
    }

    #[inline]
    pub fn projection(&self) -> &SkyProjection {
        &self.projection
    }

    #[inline]
    pub fn system(&self) -> CoordSystem {
        self.projection.system()
    }

    #[inline]
    pub fn npix(&self) -> usize {
        self.npix
    }

    #[inline]
    pub fn nmaps(&self) -> usize {
        self.nmaps
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.projection.nx()
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.projection.ny()
    }

    pub fn get(&self, pixel: usize, plane: usize) -> SkymapResult<f64> {
        Ok(self.pixels[self.offset(pixel, plane)?])
    }

    pub fn get_mut(&mut self, pixel: usize, plane: usize) -> SkymapResult<&mut f64> {
        let offset = self.offset(pixel, plane)?;
        Ok(&mut self.pixels[offset])
    }

    pub fn set(&mut self, pixel: usize, plane: usize, value: f64) -> SkymapResult<()> {
        *self.get_mut(pixel, plane)? = value;
        Ok(())
    }

    pub fn plane(&self, plane: usize) -> SkymapResult<&[f64]> {
        let start = self.offset(0, plane)?;
        Ok(&self.pixels[start..start + self.npix])
    }

    pub fn plane_mut(&mut self, plane: usize) -> SkymapResult<&mut [f64]> {
        let start = self.offset(0, plane)?;
        let npix = self.npix;
        Ok(&mut self.pixels[start..start + npix])
    }

    /// All planes, plane after plane.
    #[inline]
    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }

    /// Sets every value of every plane to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(0.0);
    }

    pub fn pix2dir(&self, pixel: usize) -> SkymapResult<SkyDir> {
        self.projection.pix2dir(pixel)
    }

    pub fn dir2pix(&self, dir: &SkyDir) -> SkymapResult<usize> {
        self.projection.dir2pix(dir)
    }

    pub fn xy2dir(&self, pixel: SkyPixel) -> SkymapResult<SkyDir> {
        self.projection.xy2dir(pixel)
    }

    pub fn dir2xy(&self, dir: &SkyDir) -> SkymapResult<SkyPixel> {
        self.projection.dir2xy(dir)
    }

    pub fn xy_to_index(&self, pixel: SkyPixel) -> SkymapResult<usize> {
        self.projection.xy_to_index(pixel)
    }

    pub fn index_to_xy(&self, pixel: usize) -> SkymapResult<SkyPixel> {
        self.projection.index_to_xy(pixel)
    }

    /// Solid angle of `pixel`, steradians.
    pub fn omega(&self, pixel: usize) -> SkymapResult<f64> {
        self.projection.omega(pixel)
    }

    fn offset(&self, pixel: usize, plane: usize) -> SkymapResult<usize> {
        if pixel >= self.npix {
            return Err(SkymapError::PixelOutOfRange {
                pixel,
                npix: self.npix,
            });
        }
        if plane >= self.nmaps {
            return Err(SkymapError::PlaneOutOfRange {
                plane,
                nmaps: self.nmaps,
            });
        }
        Ok(pixel + plane * self.npix)
    }

    fn offset_or_panic(&self, pixel: usize, plane: usize) -> usize {
        match self.offset(pixel, plane) {
            Ok(offset) => offset,
            Err(e) => panic!("{}", e),
        }
    }
}

fn buffer_len(npix: usize, nmaps: usize) -> SkymapResult<usize> {
    if nmaps == 0 {
        return Err(SkymapError::invalid_parameter("a sky map needs at least one plane"));
    }
    npix.checked_mul(nmaps).ok_or_else(|| {
        SkymapError::invalid_parameter(format!("{} pixels x {} maps is too large", npix, nmaps))
    })
}

/// Value of `pixel` in the first plane.
impl Index<usize> for Skymap {
    type Output = f64;

    fn index(&self, pixel: usize) -> &f64 {
        &self.pixels[self.offset_or_panic(pixel, 0)]
    }
}

impl IndexMut<usize> for Skymap {
    fn index_mut(&mut self, pixel: usize) -> &mut f64 {
        let offset = self.offset_or_panic(pixel, 0);
        &mut self.pixels[offset]
    }
}

/// Value at `(pixel, plane)`.
impl Index<(usize, usize)> for Skymap {
    type Output = f64;

    fn index(&self, (pixel, plane): (usize, usize)) -> &f64 {
        &self.pixels[self.offset_or_panic(pixel, plane)]
    }
}

impl IndexMut<(usize, usize)> for Skymap {
    fn index_mut(&mut self, (pixel, plane): (usize, usize)) -> &mut f64 {
        let offset = self.offset_or_panic(pixel, plane);
        &mut self.pixels[offset]
    }
}

impl fmt::Display for Skymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Skymap ===")?;
        writeln!(f, " Projection ................: {}", self.projection)?;
        writeln!(f, " Number of pixels ..........: {}", self.npix)?;
        writeln!(f, " Grid ......................: {} x {}", self.nx(), self.ny())?;
        write!(f, " Number of maps ............: {}", self.nmaps)
    }
}

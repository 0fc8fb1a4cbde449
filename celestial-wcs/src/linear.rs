use crate::coordinate::{IntermediateCoord, PixelCoord};
use crate::error::{WcsError, WcsResult};

/// Smallest |det CD| accepted, relative to the squared magnitude of CD.
const DETERMINANT_THRESHOLD: f64 = 1e-15;

/// Affine map between pixel coordinates and intermediate world coordinates
/// (degrees): q = CD · (p − CRPIX).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    crpix: [f64; 2],
    cd: [[f64; 2]; 2],
    cd_inverse: [[f64; 2]; 2],
    determinant: f64,
}

impl LinearTransform {
    pub fn from_cd(crpix: [f64; 2], cd: [[f64; 2]; 2]) -> WcsResult<Self> {
        if crpix.iter().chain(cd.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(WcsError::invalid_parameter(
                "CRPIX and CD elements must be finite",
            ));
        }
        let determinant = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        let magnitude: f64 = cd.iter().flatten().map(|v| v * v).sum();
        if determinant == 0.0 || determinant.abs() < DETERMINANT_THRESHOLD * magnitude {
            return Err(WcsError::non_invertible_matrix(determinant));
        }
        let inv_det = 1.0 / determinant;
        let cd_inverse = [
            [cd[1][1] * inv_det, -cd[0][1] * inv_det],
            [-cd[1][0] * inv_det, cd[0][0] * inv_det],
        ];
        Ok(Self {
            crpix,
            cd,
            cd_inverse,
            determinant,
        })
    }

    /// Axis-aligned grid with signed increments in degrees per pixel.
    pub fn from_cdelt(crpix: [f64; 2], cdelt: [f64; 2]) -> WcsResult<Self> {
        if cdelt[0] == 0.0 || cdelt[1] == 0.0 {
            return Err(WcsError::invalid_parameter(format!(
                "CDELT must be non-zero, got ({}, {})",
                cdelt[0], cdelt[1]
            )));
        }
        Self::from_cd(crpix, [[cdelt[0], 0.0], [0.0, cdelt[1]]])
    }

    pub fn from_pc_cdelt(crpix: [f64; 2], pc: [[f64; 2]; 2], cdelt: [f64; 2]) -> WcsResult<Self> {
        let cd = [
            [cdelt[0] * pc[0][0], cdelt[0] * pc[0][1]],
            [cdelt[1] * pc[1][0], cdelt[1] * pc[1][1]],
        ];
        Self::from_cd(crpix, cd)
    }

    pub fn pixel_to_intermediate(&self, pixel: PixelCoord) -> IntermediateCoord {
        let d0 = pixel.x() - self.crpix[0];
        let d1 = pixel.y() - self.crpix[1];
        IntermediateCoord::new(
            self.cd[0][0] * d0 + self.cd[0][1] * d1,
            self.cd[1][0] * d0 + self.cd[1][1] * d1,
        )
    }

    pub fn intermediate_to_pixel(&self, inter: IntermediateCoord) -> PixelCoord {
        let x = inter.x_deg();
        let y = inter.y_deg();
        PixelCoord::new(
            self.cd_inverse[0][0] * x + self.cd_inverse[0][1] * y + self.crpix[0],
            self.cd_inverse[1][0] * x + self.cd_inverse[1][1] * y + self.crpix[1],
        )
    }

    #[inline]
    pub fn crpix(&self) -> [f64; 2] {
        self.crpix
    }

    #[inline]
    pub fn cd_matrix(&self) -> [[f64; 2]; 2] {
        self.cd
    }

    #[inline]
    pub fn is_diagonal(&self) -> bool {
        self.cd[0][1] == 0.0 && self.cd[1][0] == 0.0
    }

    /// Per-axis increments when the matrix has no rotation or skew.
    pub fn cdelt(&self) -> Option<[f64; 2]> {
        self.is_diagonal().then_some([self.cd[0][0], self.cd[1][1]])
    }

    /// Geometric mean pixel size in degrees.
    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        libm::sqrt(self.determinant.abs())
    }

    /// Pixel area in square degrees.
    #[inline]
    pub fn pixel_area(&self) -> f64 {
        self.determinant.abs()
    }
}

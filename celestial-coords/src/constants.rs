/// Rotation from ICRS unit vectors to IAU 1958 Galactic unit vectors.
///
/// Each row is a Galactic basis vector expressed in ICRS, so `gal = M · icrs`
/// and, the matrix being orthonormal, `icrs = Mᵀ · gal`. Derived from the
/// North Galactic Pole at RA 192.859508°, Dec 27.128336° and the Galactic
/// centre direction at RA 266.405°, Dec -28.936° (Liu, Zhu & Zhang 2011,
/// A&A 526, A16; ERFA `eraG2icrs`).
#[allow(clippy::excessive_precision)]
pub const ICRS_TO_GALACTIC: [[f64; 3]; 3] = [
    [
        -0.054875560416215368492398900454,
        -0.873437090234885048760383168409,
        -0.483835015548713226831774175116,
    ],
    [
        0.494109427875583673525222371358,
        -0.444829629960011178146614061616,
        0.746982244497218890527388004556,
    ],
    [
        -0.867666149019004701181616534570,
        -0.198076373431201528180486091412,
        0.455983776175066922272100478348,
    ],
];

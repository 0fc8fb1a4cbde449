use super::core::Angle;
use core::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! angle_op {
    ($trait:ident, $method:ident, $rhs:ty, |$a:ident, $b:ident| $body:expr) => {
        impl $trait<$rhs> for Angle {
            type Output = Angle;
            #[inline]
            fn $method(self, rhs: $rhs) -> Angle {
                let ($a, $b) = (self, rhs);
                Angle::from_radians($body)
            }
        }
    };
}

angle_op!(Add, add, Angle, |a, b| a.radians() + b.radians());
angle_op!(Sub, sub, Angle, |a, b| a.radians() - b.radians());
angle_op!(Mul, mul, f64, |a, k| a.radians() * k);
angle_op!(Div, div, f64, |a, k| a.radians() / k);

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Angle {
        Angle::from_radians(-self.radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_pixel_offsets() {
        let cdelt = Angle::from_radians(0.02);
        let centre = Angle::from_radians(1.0);
        assert_eq!((centre + cdelt / 2.0).radians(), 1.01);
        assert_eq!((centre - cdelt * 50.0).radians(), 0.0);
        assert_eq!((-cdelt).radians(), -0.02);
    }
}

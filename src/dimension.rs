use std::fmt;

/// Which ordinates a geometry carries, as a runtime value.
///
/// The WKB type code of a geometry is its base code plus [`Dimensions::type_code_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensions {
    Xy,
    Xyz,
    Xym,
    Xyzm,
}

impl Dimensions {
    /// Number of doubles in one coordinate tuple
    pub const fn stride(self) -> usize {
        match self {
            Dimensions::Xy => 2,
            Dimensions::Xyz | Dimensions::Xym => 3,
            Dimensions::Xyzm => 4,
        }
    }

    pub const fn type_code_offset(self) -> u32 {
        match self {
            Dimensions::Xy => 0,
            Dimensions::Xyz => 1000,
            Dimensions::Xym => 2000,
            Dimensions::Xyzm => 3000,
        }
    }

    pub(crate) const fn from_type_code_offset(thousands: u32) -> Option<Self> {
        match thousands {
            0 => Some(Dimensions::Xy),
            1 => Some(Dimensions::Xyz),
            2 => Some(Dimensions::Xym),
            3 => Some(Dimensions::Xyzm),
            _ => None,
        }
    }

    pub const fn has_z(self) -> bool {
        matches!(self, Dimensions::Xyz | Dimensions::Xyzm)
    }

    pub const fn has_m(self) -> bool {
        matches!(self, Dimensions::Xym | Dimensions::Xyzm)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimensions::Xy => "XY",
            Dimensions::Xyz => "XYZ",
            Dimensions::Xym => "XYM",
            Dimensions::Xyzm => "XYZM",
        };
        f.write_str(name)
    }
}

/// A single coordinate tuple: `[f64; 2]`, `[f64; 3]` or `[f64; 4]`, so the
/// arity of a tuple always matches the stride of the geometry holding it.
pub trait Coordinate: private::Sealed + Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    const STRIDE: usize;

    /// The all-NaN tuple used as the empty point sentinel
    fn nan() -> Self;

    fn ordinates(&self) -> &[f64];

    /// Builds a tuple from exactly `STRIDE` values
    fn from_ordinates(values: &[f64]) -> Self;

    fn is_nan(&self) -> bool {
        self.ordinates().iter().all(|v| v.is_nan())
    }
}

macro_rules! coordinate_array {
    ($($n:literal),*) => {
        $(
            impl private::Sealed for [f64; $n] {}

            impl Coordinate for [f64; $n] {
                const STRIDE: usize = $n;

                fn nan() -> Self {
                    [f64::NAN; $n]
                }

                fn ordinates(&self) -> &[f64] {
                    self
                }

                fn from_ordinates(values: &[f64]) -> Self {
                    let mut out = [0.0; $n];
                    out.copy_from_slice(&values[..$n]);
                    out
                }
            }
        )*
    };
}

coordinate_array!(2, 3, 4);

mod private {
    pub trait Sealed {}
}

/// Compile-time dimension tag. Every geometry type is parametrized by one of
/// [`XY`], [`XYZ`], [`XYM`] or [`XYZM`].
pub trait Dimension:
    private::Sealed + fmt::Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static
{
    type Coord: Coordinate;
    const DIMENSIONS: Dimensions;
}

macro_rules! dimension_tag {
    ($(#[$doc:meta] $name:ident => $variant:ident, $n:literal);* $(;)?) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $name;

            impl private::Sealed for $name {}

            impl Dimension for $name {
                type Coord = [f64; $n];
                const DIMENSIONS: Dimensions = Dimensions::$variant;
            }
        )*
    };
}

dimension_tag! {
    /// x, y
    XY => Xy, 2;
    /// x, y, z
    XYZ => Xyz, 3;
    /// x, y, m (the measure sits where z would)
    XYM => Xym, 3;
    /// x, y, z, m
    XYZM => Xyzm, 4;
}

use std::ops::{Add, AddAssign, Mul, MulAssign};

/// Estimate of the size of an expression expanded to sum-of-products form
///
/// Sums add cubes and literals; products multiply cube counts, and each cube of
/// one operand repeats the literals of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SopLit {
    /// Number of cubes
    pub cubes: usize,
    /// Number of literals
    pub lits: usize,
}

impl SopLit {
    /// Create from a cube and literal count
    pub fn new(cubes: usize, lits: usize) -> SopLit {
        SopLit { cubes, lits }
    }

    /// Neutral element for products: a single empty cube
    pub fn unit() -> SopLit {
        SopLit::new(1, 0)
    }
}

impl Add for SopLit {
    type Output = SopLit;
    fn add(self, rhs: SopLit) -> SopLit {
        SopLit::new(self.cubes + rhs.cubes, self.lits + rhs.lits)
    }
}

impl AddAssign for SopLit {
    fn add_assign(&mut self, rhs: SopLit) {
        *self = *self + rhs;
    }
}

impl Mul for SopLit {
    type Output = SopLit;
    fn mul(self, rhs: SopLit) -> SopLit {
        SopLit::new(
            self.cubes * rhs.cubes,
            self.lits * rhs.cubes + rhs.lits * self.cubes,
        )
    }
}

impl MulAssign for SopLit {
    fn mul_assign(&mut self, rhs: SopLit) {
        *self = *self * rhs;
    }
}

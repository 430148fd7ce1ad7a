use std::fmt;
use std::ops::{BitXor, BitXorAssign, Not};

/// Index of a variable in a logic expression
///
/// For the function of a logic node, variable `i` is the `i`-th fanin.
pub type VarId = usize;

/// Representation of a literal (a variable or its complement)
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Literal {
    a: u32,
}

impl Literal {
    /// Create a literal from a variable and an inversion flag
    pub fn new(var: VarId, inv: bool) -> Literal {
        Literal {
            a: ((var as u32) << 1) | inv as u32,
        }
    }

    /// Create a positive literal
    pub fn posi(var: VarId) -> Literal {
        Literal::new(var, false)
    }

    /// Create a negative literal
    pub fn nega(var: VarId) -> Literal {
        Literal::new(var, true)
    }

    /// Obtain the variable associated with the literal
    pub fn var(&self) -> VarId {
        (self.a >> 1) as VarId
    }

    /// Returns true if the literal is complemented
    pub fn is_inverted(&self) -> bool {
        self.a & 1 != 0
    }

    /// Returns true if the literal is not complemented
    pub fn is_positive(&self) -> bool {
        !self.is_inverted()
    }

    /// Same literal on another variable, keeping the polarity
    pub fn with_var(&self, var: VarId) -> Literal {
        Literal::new(var, self.is_inverted())
    }

    /// Return the internal representation of the literal
    pub fn raw(&self) -> u32 {
        self.a
    }
}

impl Not for Literal {
    type Output = Literal;
    fn not(self) -> Literal {
        Literal { a: self.a ^ 1u32 }
    }
}

impl BitXor<bool> for Literal {
    type Output = Literal;
    fn bitxor(self, rhs: bool) -> Self::Output {
        Literal {
            a: self.a ^ (rhs as u32),
        }
    }
}

impl BitXorAssign<bool> for Literal {
    fn bitxor_assign(&mut self, rhs: bool) {
        *self = *self ^ rhs;
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inverted() {
            write!(f, "!")?;
        }
        write!(f, "v{}", self.var())
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Literal;

    #[test]
    fn test_basic() {
        for v in 0..10 {
            let l = Literal::posi(v);
            assert_eq!(l.var(), v);
            assert!(l.is_positive());
            assert!((!l).is_inverted());
            assert_eq!((!l).var(), v);
            assert_eq!(!!l, l);
            assert_eq!(l ^ true, !l);
            assert_eq!(l ^ false, l);
            assert_eq!(Literal::nega(v), !l);
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format!("{}", Literal::posi(3)), "v3");
        assert_eq!(format!("{}", Literal::nega(12)), "!v12");
        assert_eq!(Literal::nega(2).with_var(5), Literal::nega(5));
    }
}

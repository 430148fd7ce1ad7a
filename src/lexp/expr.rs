use std::fmt;
use std::iter;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use fxhash::FxHashMap;

use crate::lexp::literal::{Literal, VarId};
use crate::lexp::soplit::SopLit;

/// Boolean expression in factored form
///
/// Expressions are trees of And, Or and Xor operators over literals and constants.
/// There is no explicit Not operator: complementation is pushed down to the literals.
///
/// Expressions are kept normalized by their constructors:
///   * nested operators of the same type are flattened;
///   * constant operands are absorbed or removed;
///   * duplicate operands are merged, and complementary operands simplify the operator;
///   * operators with zero or one operand are replaced by a constant or the operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LogExpr {
    /// Constant zero
    #[default]
    Zero,
    /// Constant one
    One,
    /// Literal of a variable
    Lit(Literal),
    /// N-input And
    And(Box<[LogExpr]>),
    /// N-input Or
    Or(Box<[LogExpr]>),
    /// N-input Xor
    Xor(Box<[LogExpr]>),
}

/// Add an operand to an And/Or operand list
///
/// Returns true if the complement of the operand is already present, in which case
/// the operator reduces to a constant.
fn push_unique(list: &mut Vec<LogExpr>, e: LogExpr) -> bool {
    for e1 in list.iter() {
        if *e1 == e {
            return false;
        }
        if e1.is_complement_of(&e) {
            return true;
        }
    }
    list.push(e);
    false
}

/// Add an operand to a Xor operand list
///
/// Identical operands cancel out. Complementary operands cancel out as well, and
/// the function returns true to signal that the output phase flips.
fn toggle_unique(list: &mut Vec<LogExpr>, e: LogExpr) -> bool {
    for i in 0..list.len() {
        if list[i] == e {
            list.remove(i);
            return false;
        }
        if list[i].is_complement_of(&e) {
            list.remove(i);
            return true;
        }
    }
    list.push(e);
    false
}

/// Build an operator from a normalized operand list
fn finish(mut list: Vec<LogExpr>, empty: LogExpr, build: fn(Box<[LogExpr]>) -> LogExpr) -> LogExpr {
    if list.len() > 1 {
        build(list.into())
    } else {
        list.pop().unwrap_or(empty)
    }
}

impl LogExpr {
    /// Constant zero
    pub fn zero() -> LogExpr {
        LogExpr::Zero
    }

    /// Constant one
    pub fn one() -> LogExpr {
        LogExpr::One
    }

    /// Constant of the given value
    pub fn constant(val: bool) -> LogExpr {
        if val {
            LogExpr::One
        } else {
            LogExpr::Zero
        }
    }

    /// Literal of a variable, complemented if `inv` is set
    pub fn literal(var: VarId, inv: bool) -> LogExpr {
        LogExpr::Lit(Literal::new(var, inv))
    }

    /// Positive literal of a variable
    pub fn posi_literal(var: VarId) -> LogExpr {
        LogExpr::literal(var, false)
    }

    /// Negative literal of a variable
    pub fn nega_literal(var: VarId) -> LogExpr {
        LogExpr::literal(var, true)
    }

    /// And of the operands
    pub fn and<I: IntoIterator<Item = LogExpr>>(operands: I) -> LogExpr {
        let mut list = Vec::new();
        for e in operands {
            match e {
                LogExpr::Zero => return LogExpr::Zero,
                LogExpr::One => (),
                LogExpr::And(v) => {
                    for e1 in v.into_vec() {
                        if push_unique(&mut list, e1) {
                            return LogExpr::Zero;
                        }
                    }
                }
                e => {
                    if push_unique(&mut list, e) {
                        return LogExpr::Zero;
                    }
                }
            }
        }
        finish(list, LogExpr::One, LogExpr::And)
    }

    /// Or of the operands
    pub fn or<I: IntoIterator<Item = LogExpr>>(operands: I) -> LogExpr {
        let mut list = Vec::new();
        for e in operands {
            match e {
                LogExpr::One => return LogExpr::One,
                LogExpr::Zero => (),
                LogExpr::Or(v) => {
                    for e1 in v.into_vec() {
                        if push_unique(&mut list, e1) {
                            return LogExpr::One;
                        }
                    }
                }
                e => {
                    if push_unique(&mut list, e) {
                        return LogExpr::One;
                    }
                }
            }
        }
        finish(list, LogExpr::Zero, LogExpr::Or)
    }

    /// Xor of the operands
    pub fn xor<I: IntoIterator<Item = LogExpr>>(operands: I) -> LogExpr {
        let mut inv = false;
        let mut list = Vec::new();
        for e in operands {
            match e {
                LogExpr::Zero => (),
                LogExpr::One => inv = !inv,
                LogExpr::Xor(v) => {
                    for e1 in v.into_vec() {
                        inv ^= toggle_unique(&mut list, e1);
                    }
                }
                e => inv ^= toggle_unique(&mut list, e),
            }
        }
        let ret = finish(list, LogExpr::Zero, LogExpr::Xor);
        if inv {
            ret.complement()
        } else {
            ret
        }
    }

    /// And of the first `n` variables, all positive
    pub fn and_n(n: usize) -> LogExpr {
        LogExpr::and((0..n).map(LogExpr::posi_literal))
    }

    /// Or of the first `n` variables, all positive
    pub fn or_n(n: usize) -> LogExpr {
        LogExpr::or((0..n).map(LogExpr::posi_literal))
    }

    /// Xor of the first `n` variables, all positive
    pub fn xor_n(n: usize) -> LogExpr {
        LogExpr::xor((0..n).map(LogExpr::posi_literal))
    }

    /// Complement of the expression
    pub fn complement(&self) -> LogExpr {
        use LogExpr::*;
        match self {
            Zero => One,
            One => Zero,
            Lit(l) => Lit(!*l),
            And(v) => LogExpr::or(v.iter().map(|e| e.complement())),
            Or(v) => LogExpr::and(v.iter().map(|e| e.complement())),
            Xor(v) => LogExpr::xor(
                iter::once(v[0].complement()).chain(v[1..].iter().cloned()),
            ),
        }
    }

    /// Returns whether the two expressions are structurally complementary
    pub fn is_complement_of(&self, other: &LogExpr) -> bool {
        use LogExpr::*;
        match (self, other) {
            (Zero, One) | (One, Zero) => true,
            (Lit(a), Lit(b)) => *a == !*b,
            (And(a), Or(b)) | (Or(a), And(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.is_complement_of(y))
            }
            (Xor(a), Xor(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let mut inv = false;
                for (x, y) in a.iter().zip(b.iter()) {
                    if x == y {
                        continue;
                    }
                    if !x.is_complement_of(y) {
                        return false;
                    }
                    inv = !inv;
                }
                inv
            }
            _ => false,
        }
    }

    /// Returns true for the constant zero
    pub fn is_zero(&self) -> bool {
        matches!(self, LogExpr::Zero)
    }

    /// Returns true for the constant one
    pub fn is_one(&self) -> bool {
        matches!(self, LogExpr::One)
    }

    /// Returns true for a constant
    pub fn is_constant(&self) -> bool {
        self.is_zero() || self.is_one()
    }

    /// Returns true for a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, LogExpr::Lit(_))
    }

    /// Returns true for a positive literal
    pub fn is_posi_literal(&self) -> bool {
        matches!(self, LogExpr::Lit(l) if l.is_positive())
    }

    /// Returns true for a negative literal
    pub fn is_nega_literal(&self) -> bool {
        matches!(self, LogExpr::Lit(l) if l.is_inverted())
    }

    /// Literal, if the expression is one
    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            LogExpr::Lit(l) => Some(*l),
            _ => None,
        }
    }

    /// Variable of the literal, if the expression is one
    pub fn varid(&self) -> Option<VarId> {
        self.as_literal().map(|l| l.var())
    }

    /// Returns true for an And operator
    pub fn is_and(&self) -> bool {
        matches!(self, LogExpr::And(_))
    }

    /// Returns true for an Or operator
    pub fn is_or(&self) -> bool {
        matches!(self, LogExpr::Or(_))
    }

    /// Returns true for a Xor operator
    pub fn is_xor(&self) -> bool {
        matches!(self, LogExpr::Xor(_))
    }

    /// Returns true for any operator
    pub fn is_op(&self) -> bool {
        self.is_and() || self.is_or() || self.is_xor()
    }

    /// Operands of the expression; empty for constants and literals
    pub fn children(&self) -> &[LogExpr] {
        match self {
            LogExpr::And(v) | LogExpr::Or(v) | LogExpr::Xor(v) => v,
            _ => &[],
        }
    }

    /// Number of operands
    pub fn child_num(&self) -> usize {
        self.children().len()
    }

    /// Operand at position `i`
    pub fn child(&self, i: usize) -> &LogExpr {
        &self.children()[i]
    }

    /// Returns true for a constant, a literal, or an operator whose operands are all literals
    pub fn is_simple(&self) -> bool {
        self.children().iter().all(|e| e.is_literal())
    }

    /// Returns true for an And whose operands are all literals
    pub fn is_simple_and(&self) -> bool {
        self.is_and() && self.is_simple()
    }

    /// Returns true for an Or whose operands are all literals
    pub fn is_simple_or(&self) -> bool {
        self.is_or() && self.is_simple()
    }

    /// Returns true for a Xor whose operands are all literals
    pub fn is_simple_xor(&self) -> bool {
        self.is_xor() && self.is_simple()
    }

    /// Returns true for a two-level sum-of-products
    pub fn is_sop(&self) -> bool {
        if self.is_xor() {
            return false;
        }
        if self.is_simple() {
            return true;
        }
        self.is_or()
            && self
                .children()
                .iter()
                .all(|e| e.is_literal() || e.is_simple_and())
    }

    /// Number of literals
    pub fn litnum(&self) -> usize {
        self.count_literals(&|_| true)
    }

    /// Number of occurrences of a variable, in any polarity
    pub fn litnum_var(&self, var: VarId) -> usize {
        self.count_literals(&|l| l.var() == var)
    }

    /// Number of occurrences of a literal
    pub fn litnum_lit(&self, lit: Literal) -> usize {
        self.count_literals(&|l| l == lit)
    }

    fn count_literals(&self, pred: &dyn Fn(Literal) -> bool) -> usize {
        match self {
            LogExpr::Lit(l) => pred(*l) as usize,
            e => e.children().iter().map(|c| c.count_literals(pred)).sum(),
        }
    }

    /// One more than the largest variable used; 0 if no variable is used
    pub fn input_size(&self) -> usize {
        match self {
            LogExpr::Lit(l) => l.var() + 1,
            e => e.children().iter().map(|c| c.input_size()).max().unwrap_or(0),
        }
    }

    /// Estimate of the number of cubes once expanded to sum-of-products
    pub fn sop_cubenum(&self) -> usize {
        self.soplit(false, &|_| true).cubes
    }

    /// Estimate of the number of literals once expanded to sum-of-products
    pub fn sop_litnum(&self) -> usize {
        self.soplit(false, &|_| true).lits
    }

    /// Estimate of the number of occurrences of a variable once expanded to sum-of-products
    pub fn sop_litnum_var(&self, var: VarId) -> usize {
        self.soplit(false, &|l| l.var() == var).lits
    }

    /// Estimate of the number of occurrences of a literal once expanded to sum-of-products
    pub fn sop_litnum_lit(&self, lit: Literal) -> usize {
        self.soplit(false, &|l| l == lit).lits
    }

    /// Sum-of-products size estimate, of the expression or of its complement
    fn soplit(&self, inverted: bool, pred: &dyn Fn(Literal) -> bool) -> SopLit {
        use LogExpr::*;
        match self {
            Zero => SopLit::new(inverted as usize, 0),
            One => SopLit::new(!inverted as usize, 0),
            Lit(l) => SopLit::new(1, pred(*l ^ inverted) as usize),
            And(v) | Or(v) if self.is_and() != inverted => {
                let mut ret = SopLit::unit();
                for e in v.iter() {
                    ret *= e.soplit(inverted, pred);
                }
                ret
            }
            And(v) | Or(v) => {
                let mut ret = SopLit::default();
                for e in v.iter() {
                    ret += e.soplit(inverted, pred);
                }
                ret
            }
            Xor(v) => {
                let mut lp = v[0].soplit(inverted, pred);
                let mut ln = v[0].soplit(!inverted, pred);
                for e in v[1..].iter() {
                    let rp = e.soplit(false, pred);
                    let rn = e.soplit(true, pred);
                    let np = lp * rn + ln * rp;
                    let nn = lp * rp + ln * rn;
                    lp = np;
                    ln = nn;
                }
                lp
            }
        }
    }

    /// Expand to an explicit list of cubes
    ///
    /// Cubes containing complementary literals are dropped. This may blow up
    /// exponentially for deep Xor trees and is meant for small node functions.
    pub fn to_cubes(&self) -> Vec<Vec<Literal>> {
        self.expand_cubes(false)
    }

    fn expand_cubes(&self, inverted: bool) -> Vec<Vec<Literal>> {
        use LogExpr::*;
        match self {
            Zero => {
                if inverted {
                    vec![Vec::new()]
                } else {
                    Vec::new()
                }
            }
            One => {
                if inverted {
                    Vec::new()
                } else {
                    vec![Vec::new()]
                }
            }
            Lit(l) => vec![vec![*l ^ inverted]],
            And(v) | Or(v) if self.is_and() != inverted => {
                let mut ret = vec![Vec::new()];
                for e in v.iter() {
                    ret = cube_product(&ret, &e.expand_cubes(inverted));
                }
                ret
            }
            And(v) | Or(v) => v.iter().flat_map(|e| e.expand_cubes(inverted)).collect(),
            Xor(v) => {
                let mut lp = v[0].expand_cubes(inverted);
                let mut ln = v[0].expand_cubes(!inverted);
                for e in v[1..].iter() {
                    let rp = e.expand_cubes(false);
                    let rn = e.expand_cubes(true);
                    let mut np = cube_product(&lp, &rn);
                    np.extend(cube_product(&ln, &rp));
                    let mut nn = cube_product(&lp, &rp);
                    nn.extend(cube_product(&ln, &rn));
                    lp = np;
                    ln = nn;
                }
                lp
            }
        }
    }

    /// Substitute an expression for a variable
    pub fn compose(&self, var: VarId, sub: &LogExpr) -> LogExpr {
        let mut map = FxHashMap::default();
        map.insert(var, sub.clone());
        self.compose_map(&map)
    }

    /// Substitute expressions for several variables at once
    pub fn compose_map(&self, map: &FxHashMap<VarId, LogExpr>) -> LogExpr {
        use LogExpr::*;
        match self {
            Zero | One => self.clone(),
            Lit(l) => match map.get(&l.var()) {
                Some(e) if l.is_inverted() => e.complement(),
                Some(e) => e.clone(),
                None => self.clone(),
            },
            And(v) => LogExpr::and(v.iter().map(|e| e.compose_map(map))),
            Or(v) => LogExpr::or(v.iter().map(|e| e.compose_map(map))),
            Xor(v) => LogExpr::xor(v.iter().map(|e| e.compose_map(map))),
        }
    }

    /// Renumber the variables
    ///
    /// The result is normalized again, since the renumbering may merge variables.
    pub fn remap_var<F: Fn(VarId) -> VarId>(&self, f: F) -> LogExpr {
        self.remap_var_dyn(&f)
    }

    fn remap_var_dyn(&self, f: &dyn Fn(VarId) -> VarId) -> LogExpr {
        use LogExpr::*;
        match self {
            Zero | One => self.clone(),
            Lit(l) => Lit(l.with_var(f(l.var()))),
            And(v) => LogExpr::and(v.iter().map(|e| e.remap_var_dyn(f))),
            Or(v) => LogExpr::or(v.iter().map(|e| e.remap_var_dyn(f))),
            Xor(v) => LogExpr::xor(v.iter().map(|e| e.remap_var_dyn(f))),
        }
    }

    /// Normalize the expression again, bottom up
    pub fn simplify(&self) -> LogExpr {
        use LogExpr::*;
        match self {
            Zero | One | Lit(_) => self.clone(),
            And(v) => LogExpr::and(v.iter().map(|e| e.simplify())),
            Or(v) => LogExpr::or(v.iter().map(|e| e.simplify())),
            Xor(v) => LogExpr::xor(v.iter().map(|e| e.simplify())),
        }
    }

    /// Evaluate the expression on 64 patterns at once, one word per variable
    pub fn eval(&self, vals: &[u64]) -> u64 {
        use LogExpr::*;
        match self {
            Zero => 0,
            One => !0,
            Lit(l) => {
                let v = vals[l.var()];
                if l.is_inverted() {
                    !v
                } else {
                    v
                }
            }
            And(v) => v.iter().fold(!0, |acc, e| acc & e.eval(vals)),
            Or(v) => v.iter().fold(0, |acc, e| acc | e.eval(vals)),
            Xor(v) => v.iter().fold(0, |acc, e| acc ^ e.eval(vals)),
        }
    }
}

/// Product of two cube lists, dropping contradictory cubes
fn cube_product(a: &[Vec<Literal>], b: &[Vec<Literal>]) -> Vec<Vec<Literal>> {
    let mut ret = Vec::new();
    for ca in a {
        'cube: for cb in b {
            let mut c = ca.clone();
            for l in cb {
                if c.contains(&!*l) {
                    continue 'cube;
                }
                if !c.contains(l) {
                    c.push(*l);
                }
            }
            ret.push(c);
        }
    }
    ret
}

impl From<Literal> for LogExpr {
    fn from(l: Literal) -> LogExpr {
        LogExpr::Lit(l)
    }
}

impl From<bool> for LogExpr {
    fn from(b: bool) -> LogExpr {
        LogExpr::constant(b)
    }
}

impl Not for LogExpr {
    type Output = LogExpr;
    fn not(self) -> LogExpr {
        self.complement()
    }
}

impl Not for &LogExpr {
    type Output = LogExpr;
    fn not(self) -> LogExpr {
        self.complement()
    }
}

impl BitAnd for LogExpr {
    type Output = LogExpr;
    fn bitand(self, rhs: LogExpr) -> LogExpr {
        LogExpr::and([self, rhs])
    }
}

impl BitOr for LogExpr {
    type Output = LogExpr;
    fn bitor(self, rhs: LogExpr) -> LogExpr {
        LogExpr::or([self, rhs])
    }
}

impl BitXor for LogExpr {
    type Output = LogExpr;
    fn bitxor(self, rhs: LogExpr) -> LogExpr {
        LogExpr::xor([self, rhs])
    }
}

impl fmt::Display for LogExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = match self {
            LogExpr::Zero => return write!(f, "0"),
            LogExpr::One => return write!(f, "1"),
            LogExpr::Lit(l) => return write!(f, "{}", l),
            LogExpr::And(_) => " & ",
            LogExpr::Or(_) => " | ",
            LogExpr::Xor(_) => " ^ ",
        };
        write!(f, "(")?;
        for (i, e) in self.children().iter().enumerate() {
            if i != 0 {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::LogExpr;
    use crate::lexp::Literal;

    fn lit(v: usize) -> LogExpr {
        LogExpr::posi_literal(v)
    }

    /// Exhaustive comparison over the first `n` variables (n <= 6)
    fn same_function(a: &LogExpr, b: &LogExpr, n: usize) -> bool {
        let vals: Vec<u64> = (0..n)
            .map(|i| {
                let mut w = 0u64;
                for m in 0..64u64 {
                    if (m >> i) & 1 != 0 {
                        w |= 1 << m;
                    }
                }
                w
            })
            .collect();
        let mask = if n >= 6 { !0 } else { (1u64 << (1 << n)) - 1 };
        (a.eval(&vals) & mask) == (b.eval(&vals) & mask)
    }

    #[test]
    fn test_and_normalization() {
        assert_eq!(LogExpr::and([]), LogExpr::One);
        assert_eq!(LogExpr::and([lit(0)]), lit(0));
        assert_eq!(LogExpr::and([lit(0), LogExpr::One]), lit(0));
        assert_eq!(LogExpr::and([lit(0), LogExpr::Zero]), LogExpr::Zero);
        assert_eq!(LogExpr::and([lit(0), lit(0)]), lit(0));
        assert_eq!(LogExpr::and([lit(0), !lit(0)]), LogExpr::Zero);
        let e = (lit(0) & lit(1)) & lit(2);
        assert!(e.is_simple_and());
        assert_eq!(e.child_num(), 3);
    }

    #[test]
    fn test_or_normalization() {
        assert_eq!(LogExpr::or([]), LogExpr::Zero);
        assert_eq!(LogExpr::or([lit(0), LogExpr::One]), LogExpr::One);
        assert_eq!(LogExpr::or([lit(0), !lit(0)]), LogExpr::One);
        let e = lit(0) | (lit(1) | lit(2));
        assert!(e.is_simple_or());
        assert_eq!(e.child_num(), 3);
    }

    #[test]
    fn test_xor_normalization() {
        assert_eq!(lit(0) ^ lit(0), LogExpr::Zero);
        assert_eq!(lit(0) ^ !lit(0), LogExpr::One);
        assert_eq!(lit(0) ^ LogExpr::One, !lit(0));
        let e = (lit(0) ^ lit(1)) ^ lit(2);
        assert!(e.is_simple_xor());
        assert_eq!(e.child_num(), 3);
        let e2 = e.clone() ^ lit(1);
        assert_eq!(e2, lit(0) ^ lit(2));
    }

    #[test]
    fn test_complement() {
        let e = (lit(0) & !lit(1)) | lit(2);
        let c = !&e;
        assert!(c.is_and());
        assert!(e.is_complement_of(&c));
        assert!(c.is_complement_of(&e));
        let nor = !(lit(0) & !lit(1)) & !lit(2);
        assert!(same_function(&c, &nor, 3));
        assert_eq!(!!e.clone(), e);
        let x = lit(0) ^ lit(1);
        assert!(x.is_complement_of(&!&x));
        assert!(same_function(&!&x, &(!lit(0) ^ lit(1)), 2));
    }

    #[test]
    fn test_litnum() {
        let e = (lit(0) & !lit(1)) | (lit(1) & lit(2)) | !lit(0);
        assert_eq!(e.litnum(), 5);
        assert_eq!(e.litnum_var(0), 2);
        assert_eq!(e.litnum_var(1), 2);
        assert_eq!(e.litnum_lit(Literal::nega(1)), 1);
        assert_eq!(e.litnum_lit(Literal::posi(2)), 1);
        assert_eq!(e.input_size(), 3);
        assert_eq!(LogExpr::One.input_size(), 0);
    }

    #[test]
    fn test_is_sop() {
        assert!(LogExpr::Zero.is_sop());
        assert!(lit(0).is_sop());
        assert!((lit(0) & lit(1)).is_sop());
        assert!(((lit(0) & lit(1)) | lit(2)).is_sop());
        assert!(!((lit(0) | lit(1)) & lit(2)).is_sop());
        assert!(!(lit(0) ^ lit(1)).is_sop());
    }

    #[test]
    fn test_sop_estimates() {
        // (a + b)(c + d) = ac + ad + bc + bd
        let e = (lit(0) | lit(1)) & (lit(2) | lit(3));
        assert_eq!(e.sop_cubenum(), 4);
        assert_eq!(e.sop_litnum(), 8);
        assert_eq!(e.sop_litnum_var(0), 2);
        // a ^ b = a!b + !ab
        let x = lit(0) ^ lit(1);
        assert_eq!(x.sop_cubenum(), 2);
        assert_eq!(x.sop_litnum(), 4);
        assert_eq!(x.sop_litnum_lit(Literal::nega(1)), 1);
        // !(ab) = !a + !b
        let n = !(lit(0) & lit(1));
        assert_eq!(n.sop_cubenum(), 2);
        assert_eq!(n.sop_litnum_lit(Literal::nega(0)), 1);
        assert_eq!(n.sop_litnum_lit(Literal::posi(0)), 0);
    }

    #[test]
    fn test_cubes() {
        let e = (lit(0) | lit(1)) & (lit(2) | !lit(0));
        let cubes = e.to_cubes();
        assert_eq!(cubes.len(), 3);
        let rebuilt = LogExpr::or(
            cubes
                .iter()
                .map(|c| LogExpr::and(c.iter().map(|l| LogExpr::from(*l)))),
        );
        assert!(same_function(&e, &rebuilt, 3));
        let x = (lit(0) ^ lit(1) ^ lit(2)).to_cubes();
        assert_eq!(x.len(), 4);
    }

    #[test]
    fn test_compose() {
        let e = lit(0) & !lit(1);
        let sub = lit(2) | lit(3);
        let c = e.compose(1, &sub);
        let expected = lit(0) & !lit(2) & !lit(3);
        assert!(same_function(&c, &expected, 4));
        assert_eq!(e.compose(0, &LogExpr::Zero), LogExpr::Zero);
        assert_eq!(e.compose(1, &LogExpr::Zero), lit(0));
    }

    #[test]
    fn test_remap() {
        let e = lit(0) & !lit(1) & lit(2);
        let r = e.remap_var(|v| v + 3);
        assert_eq!(r.input_size(), 6);
        assert_eq!(r.litnum_var(3), 1);
        // Merging two variables
        let m = e.remap_var(|v| if v == 2 { 0 } else { v });
        assert_eq!(m, lit(0) & !lit(1));
        let z = e.remap_var(|v| if v == 1 { 0 } else { v });
        assert_eq!(z, LogExpr::Zero);
    }

    #[test]
    fn test_eval() {
        let e = (lit(0) & !lit(1)) | lit(2);
        assert_eq!(e.eval(&[0b1100, 0b1010, 0b0001]), 0b0101);
        assert_eq!(LogExpr::One.eval(&[]), !0);
    }

    #[test]
    fn test_display() {
        let e = (lit(0) & !lit(1)) | lit(2);
        assert_eq!(format!("{}", e), "((v0 & !v1) | v2)");
        assert_eq!(format!("{}", LogExpr::Zero), "0");
    }
}

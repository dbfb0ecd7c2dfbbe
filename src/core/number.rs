//! Numeric leaf values.
//!
//! `Number` is the scalar type canonicalizers fold into sum offsets, product
//! coefficients and exponents. Exact values (integers, rationals, Gaussian
//! rationals) stay exact; mixing with a float promotes the result to a float.
//!
//! Normalization is part of construction: a rational with denominator one is an
//! `Integer`, an exact complex with zero imaginary part is real, and a float
//! complex with zero imaginary part is a `Real`. Two numbers are equal only if
//! they have the same variant and value, so `2` and `2.0` are distinct nodes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_complex::Complex;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::error::KernelError;

/// Exact complex number with rational parts
pub type ComplexRational = Complex<BigRational>;

/// A numeric scalar
#[derive(Debug, Clone)]
pub enum Number {
    /// Arbitrary-precision integer
    Integer(BigInt),
    /// Arbitrary-precision rational, never integral
    Rational(BigRational),
    /// Exact complex, imaginary part never zero
    Complex(ComplexRational),
    /// Double-precision real
    Real(f64),
    /// Double-precision complex, imaginary part never zero
    ComplexReal(Complex<f64>),
}

// -----------------------------------------------------------------------------
// Construction and normalization
// -----------------------------------------------------------------------------

impl Number {
    /// Exact zero
    #[must_use]
    pub fn zero() -> Self {
        Self::Integer(BigInt::zero())
    }

    /// Exact one
    #[must_use]
    pub fn one() -> Self {
        Self::Integer(BigInt::one())
    }

    /// Exact minus one
    #[must_use]
    pub fn minus_one() -> Self {
        Self::Integer(-BigInt::one())
    }

    /// Exact integer
    pub fn integer(n: impl Into<BigInt>) -> Self {
        Self::Integer(n.into())
    }

    /// Exact rational `num/den`, reduced
    ///
    /// # Errors
    /// Returns [`KernelError::DivisionByZero`] when `den` is zero.
    pub fn rational(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self, KernelError> {
        let den = den.into();
        if den.is_zero() {
            return Err(KernelError::DivisionByZero);
        }
        Ok(Self::from_big_rational(BigRational::new(num.into(), den)))
    }

    /// Double-precision real
    #[must_use]
    pub const fn real(x: f64) -> Self {
        Self::Real(x)
    }

    /// Exact complex `re + im*I`
    #[must_use]
    pub fn complex(re: BigRational, im: BigRational) -> Self {
        Self::from_complex_rational(Complex::new(re, im))
    }

    /// The imaginary unit `I`
    #[must_use]
    pub fn imaginary_unit() -> Self {
        Self::Complex(Complex::new(BigRational::zero(), BigRational::one()))
    }

    /// Normalize a rational into `Integer` or `Rational`
    #[must_use]
    pub fn from_big_rational(r: BigRational) -> Self {
        if r.is_integer() {
            Self::Integer(r.to_integer())
        } else {
            Self::Rational(r)
        }
    }

    /// Normalize an exact complex, dropping a zero imaginary part
    #[must_use]
    pub fn from_complex_rational(c: ComplexRational) -> Self {
        if c.im.is_zero() {
            Self::from_big_rational(c.re)
        } else {
            Self::Complex(c)
        }
    }

    /// Normalize a float complex, dropping a zero imaginary part
    #[must_use]
    pub fn from_complex_f64(c: Complex<f64>) -> Self {
        if c.im == 0.0 {
            Self::Real(c.re)
        } else {
            Self::ComplexReal(c)
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Integer(BigInt::from(n))
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::Integer(BigInt::from(n))
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Self::Integer(n)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Self::from_big_rational(r)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

// -----------------------------------------------------------------------------
// Predicates and conversions
// -----------------------------------------------------------------------------

impl Number {
    /// True for every zero, exact or float
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(i) => i.is_zero(),
            Self::Rational(_) | Self::Complex(_) | Self::ComplexReal(_) => false,
            Self::Real(x) => *x == 0.0,
        }
    }

    /// True only for the exact integer zero
    #[must_use]
    pub fn is_exact_zero(&self) -> bool {
        matches!(self, Self::Integer(i) if i.is_zero())
    }

    /// True only for the exact integer one
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Integer(i) if i.is_one())
    }

    /// True only for the exact integer minus one
    #[must_use]
    pub fn is_minus_one(&self) -> bool {
        matches!(self, Self::Integer(i) if (-i).is_one())
    }

    /// Strictly negative real value
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(i) => i.is_negative(),
            Self::Rational(r) => r.is_negative(),
            Self::Real(x) => *x < 0.0,
            Self::Complex(_) | Self::ComplexReal(_) => false,
        }
    }

    /// Strictly positive real value
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Integer(i) => i.is_positive(),
            Self::Rational(r) => r.is_positive(),
            Self::Real(x) => *x > 0.0,
            Self::Complex(_) | Self::ComplexReal(_) => false,
        }
    }

    /// Integer, rational or exact complex
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Rational(_) | Self::Complex(_))
    }

    /// Integer or rational
    #[must_use]
    pub const fn is_exact_real(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Rational(_))
    }

    /// No imaginary part
    #[must_use]
    pub const fn is_real(&self) -> bool {
        !matches!(self, Self::Complex(_) | Self::ComplexReal(_))
    }

    /// The integer value, if this is an exact integer
    #[must_use]
    pub const fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Real value as a double, if the number is real
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => i.to_f64(),
            Self::Rational(r) => r.to_f64(),
            Self::Real(x) => Some(*x),
            Self::Complex(_) | Self::ComplexReal(_) => None,
        }
    }

    /// Value as a double-precision complex
    #[must_use]
    pub fn to_complex_f64(&self) -> Complex<f64> {
        match self {
            Self::Complex(c) => Complex::new(
                c.re.to_f64().unwrap_or(f64::NAN),
                c.im.to_f64().unwrap_or(f64::NAN),
            ),
            Self::ComplexReal(c) => *c,
            real => Complex::new(real.to_f64().unwrap_or(f64::NAN), 0.0),
        }
    }

    fn to_big_rational(&self) -> Option<BigRational> {
        match self {
            Self::Integer(i) => Some(BigRational::from_integer(i.clone())),
            Self::Rational(r) => Some(r.clone()),
            _ => None,
        }
    }

    fn to_complex_rational(&self) -> Option<ComplexRational> {
        match self {
            Self::Complex(c) => Some(c.clone()),
            real => real
                .to_big_rational()
                .map(|re| Complex::new(re, BigRational::zero())),
        }
    }

    const fn is_float(&self) -> bool {
        matches!(self, Self::Real(_) | Self::ComplexReal(_))
    }

    /// Zero of the same exactness
    fn zero_like(&self) -> Self {
        if self.is_float() {
            Self::Real(0.0)
        } else {
            Self::zero()
        }
    }
}

// -----------------------------------------------------------------------------
// Arithmetic
// -----------------------------------------------------------------------------

/// Apply one binary operation in the common domain of both operands
fn binary(
    a: &Number,
    b: &Number,
    exact_real: impl Fn(BigRational, BigRational) -> BigRational,
    exact_complex: impl Fn(ComplexRational, ComplexRational) -> ComplexRational,
    float: impl Fn(f64, f64) -> f64,
    float_complex: impl Fn(Complex<f64>, Complex<f64>) -> Complex<f64>,
) -> Number {
    let complex = !a.is_real() || !b.is_real();
    if a.is_float() || b.is_float() {
        if complex {
            Number::from_complex_f64(float_complex(a.to_complex_f64(), b.to_complex_f64()))
        } else {
            let (x, y) = (a.to_f64().unwrap_or(f64::NAN), b.to_f64().unwrap_or(f64::NAN));
            Number::Real(float(x, y))
        }
    } else if complex {
        match (a.to_complex_rational(), b.to_complex_rational()) {
            (Some(x), Some(y)) => Number::from_complex_rational(exact_complex(x, y)),
            _ => unreachable!("exact operands always convert to exact complex"),
        }
    } else {
        match (a.to_big_rational(), b.to_big_rational()) {
            (Some(x), Some(y)) => Number::from_big_rational(exact_real(x, y)),
            _ => unreachable!("exact real operands always convert to rationals"),
        }
    }
}

impl Number {
    /// Sum of two numbers
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        if let (Self::Integer(a), Self::Integer(b)) = (self, other) {
            return Self::Integer(a + b);
        }
        binary(self, other, |a, b| a + b, |a, b| a + b, |a, b| a + b, |a, b| a + b)
    }

    /// Difference of two numbers
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Product of two numbers
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if let (Self::Integer(a), Self::Integer(b)) = (self, other) {
            return Self::Integer(a * b);
        }
        binary(self, other, |a, b| a * b, |a, b| a * b, |a, b| a * b, |a, b| a * b)
    }

    /// Quotient of two numbers
    ///
    /// # Errors
    /// Returns [`KernelError::DivisionByZero`] when `other` is any zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self, KernelError> {
        if other.is_zero() {
            return Err(KernelError::DivisionByZero);
        }
        Ok(binary(self, other, |a, b| a / b, |a, b| a / b, |a, b| a / b, |a, b| a / b))
    }

    /// Additive inverse
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Integer(i) => Self::Integer(-i),
            Self::Rational(r) => Self::Rational(-r),
            Self::Complex(c) => Self::Complex(-c),
            Self::Real(x) => Self::Real(-x),
            Self::ComplexReal(c) => Self::ComplexReal(-c),
        }
    }

    /// Raise to a numeric power.
    ///
    /// Returns `Ok(None)` when the result has no representation as a `Number`
    /// (for example `2^(1/2)`, or a fractional power of a negative exact base,
    /// whose branch is left unresolved).
    ///
    /// # Errors
    /// Returns [`KernelError::ZeroToNonPositivePower`] for `0^e` with `e <= 0`.
    pub fn checked_pow(&self, exp: &Self) -> Result<Option<Self>, KernelError> {
        if self.is_zero() {
            return if exp.is_positive() {
                Ok(Some(if exp.is_float() { Self::Real(0.0) } else { self.zero_like() }))
            } else if exp.is_real() {
                Err(KernelError::ZeroToNonPositivePower)
            } else {
                Ok(None)
            };
        }

        match exp {
            Self::Integer(n) => Ok(self.pow_integer(n)),
            Self::Rational(q) => Ok(self.pow_rational(q)),
            Self::Complex(_) if !self.is_float() => Ok(None),
            _ => Ok(Some(self.pow_float(exp))),
        }
    }

    /// `self^n` for a machine-sized exponent, with `x^0 = 1` for every base
    #[must_use]
    pub fn pow_u32(&self, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }
        self.pow_integer(&BigInt::from(n))
            .unwrap_or_else(|| self.clone())
    }

    /// `self^n` for a nonzero base
    fn pow_integer(&self, n: &BigInt) -> Option<Self> {
        match self {
            Self::Real(x) => Some(Self::Real(match n.to_i32() {
                Some(k) => x.powi(k),
                None => x.powf(n.to_f64().unwrap_or(f64::INFINITY)),
            })),
            Self::ComplexReal(c) => Some(Self::from_complex_f64(
                c.powf(n.to_f64().unwrap_or(f64::INFINITY)),
            )),
            _ => {
                let e = n.abs().to_u64()?;
                let result = match self {
                    Self::Integer(i) if !n.is_negative() => Self::Integer(pow_u64(i, e)),
                    Self::Integer(_) | Self::Rational(_) => {
                        let r = self.to_big_rational()?;
                        let r = if n.is_negative() { r.recip() } else { r };
                        Self::from_big_rational(pow_u64(&r, e))
                    }
                    Self::Complex(c) => {
                        let c = if n.is_negative() { c.inv() } else { c.clone() };
                        Self::from_complex_rational(pow_u64(&c, e))
                    }
                    Self::Real(_) | Self::ComplexReal(_) => unreachable!("floats handled above"),
                };
                Some(result)
            }
        }
    }

    /// `self^(p/q)` for a nonzero base and non-integral exponent
    fn pow_rational(&self, q: &BigRational) -> Option<Self> {
        match self {
            Self::Integer(_) | Self::Rational(_) if self.is_positive() => {
                let base = self.to_big_rational()?;
                let root = q.denom().to_u32()?;
                let num = exact_root(base.numer(), root)?;
                let den = exact_root(base.denom(), root)?;
                Self::from_big_rational(BigRational::new(num, den)).pow_integer(q.numer())
            }
            Self::Real(_) | Self::ComplexReal(_) => Some(self.pow_float(&Self::Rational(q.clone()))),
            _ => None,
        }
    }

    fn pow_float(&self, exp: &Self) -> Self {
        match (self.to_f64(), exp.to_f64()) {
            (Some(x), Some(e)) if x >= 0.0 => Self::Real(x.powf(e)),
            _ => Self::from_complex_f64(self.to_complex_f64().powc(exp.to_complex_f64())),
        }
    }
}

/// Square-and-multiply power with a machine-sized exponent
fn pow_u64<T>(base: &T, mut exp: u64) -> T
where
    T: One + Clone,
    for<'a> &'a T: Mul<&'a T, Output = T>,
{
    let mut result = T::one();
    let mut square = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &square;
        }
        exp >>= 1;
        if exp > 0 {
            square = &square * &square;
        }
    }
    result
}

/// The exact non-negative `n`-th root of `value`, if one exists
fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if value.is_negative() || n == 0 {
        return None;
    }
    let root = value.nth_root(n);
    (pow_u64(&root, u64::from(n)) == *value).then_some(root)
}

impl Add for &Number {
    type Output = Number;
    fn add(self, rhs: Self) -> Number {
        Number::add(self, rhs)
    }
}

impl Sub for &Number {
    type Output = Number;
    fn sub(self, rhs: Self) -> Number {
        Number::sub(self, rhs)
    }
}

impl Mul for &Number {
    type Output = Number;
    fn mul(self, rhs: Self) -> Number {
        Number::mul(self, rhs)
    }
}

impl Neg for &Number {
    type Output = Number;
    fn neg(self) -> Number {
        Number::neg(self)
    }
}

// -----------------------------------------------------------------------------
// Equality, hashing, total order
// -----------------------------------------------------------------------------

/// Float bits with `-0.0` folded into `0.0`
fn float_bits(x: f64) -> u64 {
    if x == 0.0 { 0.0_f64.to_bits() } else { x.to_bits() }
}

fn float_cmp(a: f64, b: f64) -> Ordering {
    let norm = |x: f64| if x == 0.0 { 0.0 } else { x };
    norm(a).total_cmp(&norm(b))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Complex(a), Self::Complex(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => float_bits(*a) == float_bits(*b),
            (Self::ComplexReal(a), Self::ComplexReal(b)) => {
                float_bits(a.re) == float_bits(b.re) && float_bits(a.im) == float_bits(b.im)
            }
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(i) => i.hash(state),
            Self::Rational(r) => r.hash(state),
            Self::Complex(c) => {
                c.re.hash(state);
                c.im.hash(state);
            }
            Self::Real(x) => float_bits(*x).hash(state),
            Self::ComplexReal(c) => {
                float_bits(c.re).hash(state);
                float_bits(c.im).hash(state);
            }
        }
    }
}

impl Number {
    /// Ordering group: exact reals, floats, exact complex, float complex
    const fn rank(&self) -> u8 {
        match self {
            Self::Integer(_) | Self::Rational(_) => 0,
            Self::Real(_) => 1,
            Self::Complex(_) => 2,
            Self::ComplexReal(_) => 3,
        }
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Real(a), Self::Real(b)) => float_cmp(*a, *b),
            (Self::Complex(a), Self::Complex(b)) => a.re.cmp(&b.re).then_with(|| a.im.cmp(&b.im)),
            (Self::ComplexReal(a), Self::ComplexReal(b)) => {
                float_cmp(a.re, b.re).then_with(|| float_cmp(a.im, b.im))
            }
            (a, b) => match (a.to_big_rational(), b.to_big_rational()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => Ordering::Equal,
            },
        })
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// -----------------------------------------------------------------------------
// Display
// -----------------------------------------------------------------------------

fn fmt_imaginary(f: &mut fmt::Formatter<'_>, re: &dyn fmt::Display, re_zero: bool, im: String) -> fmt::Result {
    let im = match im.as_str() {
        "1" | "1.0" => "I".to_string(),
        "-1" | "-1.0" => "-I".to_string(),
        _ => format!("{im}*I"),
    };
    if re_zero {
        write!(f, "{im}")
    } else if let Some(rest) = im.strip_prefix('-') {
        write!(f, "{re} - {rest}")
    } else {
        write!(f, "{re} + {im}")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Real(x) => write!(f, "{x:?}"),
            Self::Complex(c) => {
                let re = Self::from_big_rational(c.re.clone());
                let im = Self::from_big_rational(c.im.clone());
                fmt_imaginary(f, &re, c.re.is_zero(), im.to_string())
            }
            Self::ComplexReal(c) => fmt_imaginary(f, &Self::Real(c.re), c.re == 0.0, format!("{:?}", c.im)),
        }
    }
}

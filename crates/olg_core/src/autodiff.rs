use crate::traits::ScalarEquation;
use num_traits::{Float, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// Dual number for forward-mode differentiation of scalar residuals.
/// val: real part
/// eps: derivative with respect to the seeded variable
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dual {
    pub val: f64,
    pub eps: f64,
}

impl Dual {
    pub fn new(val: f64, eps: f64) -> Self {
        Self { val, eps }
    }

    /// The independent variable: seeds a unit derivative.
    pub fn variable(val: f64) -> Self {
        Self::new(val, 1.0)
    }

    pub fn constant(val: f64) -> Self {
        Self::new(val, 0.0)
    }

    /// Applies the chain rule for a unary function with value `value` and
    /// local slope `slope` at `self.val`.
    fn chain(self, value: f64, slope: f64) -> Self {
        let eps = if self.eps == 0.0 { 0.0 } else { slope * self.eps };
        Self::new(value, eps)
    }
}

/// Evaluates `equation` at `x` and returns `(f(x), f'(x))` in one pass.
pub fn value_and_derivative<E>(equation: &E, x: f64) -> (f64, f64)
where
    E: ScalarEquation<Dual> + ?Sized,
{
    let out = equation.residual(Dual::variable(x));
    (out.val, out.eps)
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.val == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.val + rhs.val, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.val - rhs.val, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.val * rhs.val, self.val * rhs.eps + self.eps * rhs.val)
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.val / rhs.val,
            (self.eps * rhs.val - self.val * rhs.eps) / (rhs.val * rhs.val),
        )
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.val, -self.eps)
    }
}

impl Rem for Dual {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        // d(a mod b) = da - trunc(a / b) db away from the jumps.
        let quotient = (self.val / rhs.val).trunc();
        Self::new(self.val % rhs.val, self.eps - quotient * rhs.eps)
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl DivAssign for Dual {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}
impl RemAssign for Dual {
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Num for Dual {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(str, radix).map(Self::constant)
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.val.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.val.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.val)
    }
}

impl FromPrimitive for Dual {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::constant(n))
    }
}

impl NumCast for Dual {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

/// Associated constants of `f64` lifted to derivative-free duals.
macro_rules! constant_fns {
    ($($name:ident => $value:expr),* $(,)?) => {
        $(fn $name() -> Self { Self::constant($value) })*
    };
}

/// Predicates look at the value only.
macro_rules! value_predicates {
    ($($name:ident),* $(,)?) => {
        $(fn $name(self) -> bool { self.val.$name() })*
    };
}

/// Step functions: flat almost everywhere, so the derivative is dropped.
macro_rules! step_fns {
    ($($name:ident),* $(,)?) => {
        $(fn $name(self) -> Self { Self::constant(self.val.$name()) })*
    };
}

/// Smooth unary functions, each with its derivative in terms of `x = self.val`.
macro_rules! chain_rule {
    ($($name:ident => |$x:ident| $slope:expr),* $(,)?) => {
        $(fn $name(self) -> Self {
            let $x = self.val;
            self.chain($x.$name(), $slope)
        })*
    };
}

impl Float for Dual {
    constant_fns! {
        nan => f64::NAN,
        infinity => f64::INFINITY,
        neg_infinity => f64::NEG_INFINITY,
        min_value => f64::MIN,
        min_positive_value => f64::MIN_POSITIVE,
        max_value => f64::MAX,
    }

    fn neg_zero() -> Self {
        Self::new(-0.0, -0.0)
    }

    value_predicates!(is_nan, is_infinite, is_finite, is_normal, is_sign_positive, is_sign_negative);

    fn classify(self) -> std::num::FpCategory {
        self.val.classify()
    }

    step_fns!(floor, ceil, round, trunc, signum);

    fn fract(self) -> Self {
        Self::new(self.val.fract(), self.eps)
    }

    fn abs(self) -> Self {
        if self.val < 0.0 {
            -self
        } else {
            self
        }
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }

    fn recip(self) -> Self {
        Self::one() / self
    }

    fn powi(self, n: i32) -> Self {
        let slope = match n {
            0 => 0.0,
            _ => <f64 as From<i32>>::from(n) * self.val.powi(n - 1),
        };
        self.chain(self.val.powi(n), slope)
    }

    fn powf(self, n: Self) -> Self {
        // A partial is formed only when its seed is non-zero: a constant
        // exponent never evaluates ln(x) and a constant base at 0 stays finite.
        let value = self.val.powf(n.val);
        let base_part = if self.eps == 0.0 {
            0.0
        } else {
            n.val * self.val.powf(n.val - 1.0) * self.eps
        };
        let exponent_part = if n.eps == 0.0 {
            0.0
        } else {
            value * self.val.ln() * n.eps
        };
        Self::new(value, base_part + exponent_part)
    }

    chain_rule! {
        sqrt => |x| 0.5 / x.sqrt(),
        cbrt => |x| 1.0 / (3.0 * x.cbrt().powi(2)),
        exp => |x| x.exp(),
        exp2 => |x| x.exp2() * std::f64::consts::LN_2,
        exp_m1 => |x| x.exp(),
        ln => |x| 1.0 / x,
        ln_1p => |x| 1.0 / (1.0 + x),
        log2 => |x| 1.0 / (x * std::f64::consts::LN_2),
        log10 => |x| 1.0 / (x * std::f64::consts::LN_10),
        sin => |x| x.cos(),
        cos => |x| -x.sin(),
        tan => |x| 1.0 + x.tan().powi(2),
        asin => |x| (1.0 - x * x).sqrt().recip(),
        acos => |x| -(1.0 - x * x).sqrt().recip(),
        atan => |x| (1.0 + x * x).recip(),
        sinh => |x| x.cosh(),
        cosh => |x| x.sinh(),
        tanh => |x| 1.0 - x.tanh().powi(2),
        asinh => |x| (x * x + 1.0).sqrt().recip(),
        acosh => |x| (x * x - 1.0).sqrt().recip(),
        atanh => |x| (1.0 - x * x).recip(),
    }

    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    fn hypot(self, other: Self) -> Self {
        (self * self + other * other).sqrt()
    }

    fn atan2(self, other: Self) -> Self {
        let denom = self.val * self.val + other.val * other.val;
        Self::new(
            self.val.atan2(other.val),
            (other.val * self.eps - self.val * other.eps) / denom,
        )
    }

    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    fn max(self, other: Self) -> Self {
        if other.val > self.val {
            other
        } else {
            self
        }
    }

    fn min(self, other: Self) -> Self {
        if other.val < self.val {
            other
        } else {
            self
        }
    }

    #[allow(deprecated)]
    fn abs_sub(self, other: Self) -> Self {
        (self - other).max(Self::zero())
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.val.integer_decode()
    }
}

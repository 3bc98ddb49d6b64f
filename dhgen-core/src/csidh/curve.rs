//! x-only projective arithmetic on Montgomery curves `By² = x³ + Ax² + x`,
//! plus odd-degree isogenies between them.

use num_bigint::BigUint;

use super::field::Fp;

/// A point `(X : Z)` with `x = X / Z`. Any `Z = 0` is the point at infinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: Fp,
    pub z: Fp,
}

/// The curve coefficient `A = a / c` in projective form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    pub a: Fp,
    pub c: Fp,
}

impl Point {
    pub fn infinity() -> Self {
        Point {
            x: Fp::one(),
            z: Fp::zero(),
        }
    }

    pub fn from_x(x: Fp) -> Self {
        Point { x, z: Fp::one() }
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }
}

impl Curve {
    pub fn from_affine(a: Fp) -> Self {
        Curve { a, c: Fp::one() }
    }

    /// Rescale so that `c = 1` and return the affine coefficient.
    pub fn normalize(&mut self) -> Fp {
        let a = &self.a * &self.c.invert();
        self.a = a.clone();
        self.c = Fp::one();
        a
    }

    /// `x³ + Ax² + x` for an affine curve; a square iff `x` lies on the curve
    /// rather than its quadratic twist.
    pub fn rhs(a: &Fp, x: &Fp) -> Fp {
        let x2 = x.square();
        let inner = &(&x2 + &(a * x)) + &Fp::one();
        &inner * x
    }

    /// `[2]P`
    pub fn double(&self, p: &Point) -> Point {
        let sum = (&p.x + &p.z).square();
        let diff = (&p.x - &p.z).square();
        let cross = &sum - &diff;
        let diff = &diff * &self.c.double().double();

        let x = &sum * &diff;
        let a24 = &self.a + &self.c.double();
        let z = &(&(&a24 * &cross) + &diff) * &cross;
        Point { x, z }
    }

    /// `P + Q` given `P − Q`.
    pub fn add(p: &Point, q: &Point, difference: &Point) -> Point {
        let a = &(&p.x + &p.z) * &(&q.x - &q.z);
        let b = &(&p.x - &p.z) * &(&q.x + &q.z);
        let x = &difference.z * &(&a + &b).square();
        let z = &difference.x * &(&a - &b).square();
        Point { x, z }
    }

    /// `[k]P` by the Montgomery ladder. Variable time.
    pub fn multiply(&self, p: &Point, k: &BigUint) -> Point {
        if p.is_infinity() || k.bits() == 0 {
            return Point::infinity();
        }

        let mut r0 = Point::infinity();
        let mut r1 = p.clone();
        for i in (0..k.bits()).rev() {
            if k.bit(i) {
                r0 = Curve::add(&r0, &r1, p);
                r1 = self.double(&r1);
            } else {
                r1 = Curve::add(&r0, &r1, p);
                r0 = self.double(&r0);
            }
        }
        r0
    }

    /// Apply the degree-`degree` isogeny with kernel `<kernel>` to this curve,
    /// pushing `p` through it.
    ///
    /// `kernel` must have exact odd prime order `degree`.
    pub fn isogeny(&mut self, p: &mut Point, kernel: &Point, degree: u64) {
        debug_assert!(degree >= 3 && degree % 2 == 1);

        // Codomain accumulators over the kernel multiples [1]K..[(ℓ−1)/2]K.
        let mut t = [
            kernel.z.clone(),
            kernel.x.clone(),
            kernel.x.clone(),
            kernel.z.clone(),
        ];
        let mut qx = &(&p.x * &kernel.x) - &(&p.z * &kernel.z);
        let mut qz = &(&p.x * &kernel.z) - &(&p.z * &kernel.x);

        let mut multiples = [kernel.clone(), self.double(kernel), Point::infinity()];
        for i in 1..(degree / 2) as usize {
            if i >= 2 {
                multiples[i % 3] =
                    Curve::add(&multiples[(i - 1) % 3], kernel, &multiples[(i - 2) % 3]);
            }
            let m = &multiples[i % 3];

            t[0] = &(&m.x * &t[0]) + &(&m.z * &t[1]);
            t[1] = &t[1] * &m.x;
            t[2] = &(&m.z * &t[2]) + &(&m.x * &t[3]);
            t[3] = &t[3] * &m.z;

            qx = &qx * &(&(&p.x * &m.x) - &(&p.z * &m.z));
            qz = &qz * &(&(&p.x * &m.z) - &(&p.z * &m.x));
        }

        let t0 = (&t[0] * &t[1]).double();
        let t1 = t[1].square();
        let t2 = (&t[2] * &t[3]).double();
        let t3 = t[3].square();

        // A' = T1·T3·A − 3·C·(T1·T2 − T0·T3),  C' = C·T3²
        let shift = &self.c * &(&(&t1 * &t2) - &(&t0 * &t3));
        let shift = &shift.double() + &shift;
        self.a = &(&(&t1 * &t3) * &self.a) - &shift;
        self.c = &self.c * &t3.square();

        p.x = &p.x * &qx.square();
        p.z = &p.z * &qz.square();
    }
}

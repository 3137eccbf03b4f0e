// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.

use serde::Serialize;
use serde::Deserialize;
use num::{One, Zero, Signed, BigRational, BigInt, ToPrimitive};
use std::fmt::{Display, Formatter};
use std::convert::TryFrom;
use std::str::FromStr;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, Mul, Neg};
use num::rational::{ParseRatioError, Ratio};

/// A ballot weight or a candidate's score, stored as an arbitrary precision rational
/// so that splitting a ballot between tied alternatives and summing the pieces back
/// is exact. Serialized as a string like `3/2` since the numerator and denominator
/// easily overflow the numbers representable in JSON.
#[derive(Clone,Debug,Serialize,Deserialize,Ord, PartialOrd, Eq, PartialEq,Hash)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct Tally(pub BigRational);

impl Tally {
    pub fn zero() -> Self { Tally(BigRational::zero()) }
    pub fn one() -> Self { Tally(BigRational::one()) }
    pub fn new(numerator:BigInt,denominator:BigInt) -> Self {
        Tally(BigRational::new(numerator,denominator))
    }
    /// convenience for literal fractions, `Tally::ratio(3,2)` being 3/2.
    pub fn ratio(numerator:i64,denominator:i64) -> Self {
        Tally(BigRational::new(BigInt::from(numerator),BigInt::from(denominator)))
    }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn is_negative(&self) -> bool { self.0.is_negative() }
    /// this tally split exactly n ways. n must not be zero.
    pub fn share(&self,n:usize) -> Tally {
        Tally(BigRational::new(self.0.numer().clone(),self.0.denom().clone()*BigInt::from(n)))
    }
    /// an approximation, adequate for display and sorting diagnostics but not for counting.
    pub fn to_f64(&self) -> f64 { self.0.to_f64().unwrap_or(f64::NAN) }
}

impl From<usize> for Tally {
    fn from(n: usize) -> Self { Tally(BigRational::new(BigInt::from(n),BigInt::one())) }
}
impl From<i64> for Tally {
    fn from(n: i64) -> Self { Tally(BigRational::new(BigInt::from(n),BigInt::one())) }
}

impl Add for Tally { type Output = Tally; fn add(self, rhs: Self) -> Self::Output { Tally(self.0+rhs.0) } }
impl <'a> Add<&'a Tally> for Tally { type Output = Tally; fn add(self, rhs: &'a Tally) -> Self::Output { Tally(self.0+&rhs.0) } }
impl AddAssign for Tally { fn add_assign(&mut self, rhs: Tally) { self.0+=rhs.0; } }
impl AddAssign<&Tally> for Tally { fn add_assign(&mut self, rhs: &Tally) { self.0+=&rhs.0; } }
impl Sub for Tally { type Output = Tally; fn sub(self, rhs: Self) -> Self::Output { Tally(self.0-rhs.0) } }
impl Mul for Tally { type Output = Tally; fn mul(self, rhs: Self) -> Self::Output { Tally(self.0*rhs.0) } }
impl <'a> Mul<&'a Tally> for &'a Tally { type Output = Tally; fn mul(self, rhs: &'a Tally) -> Self::Output { Tally(&self.0*&rhs.0) } }
impl Neg for Tally { type Output = Tally; fn neg(self) -> Self::Output { Tally(-self.0) } }

impl Sum for Tally {
    fn sum<I: Iterator<Item=Tally>>(iter: I) -> Self { iter.fold(Tally::zero(),|a,b|a+b) }
}
impl <'a> Sum<&'a Tally> for Tally {
    fn sum<I: Iterator<Item=&'a Tally>>(iter: I) -> Self { iter.fold(Tally::zero(),|a,b|a+b) }
}

impl Display for Tally {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{}",self.0)
    }
}

impl From<Tally> for String {
    fn from(t: Tally) -> Self { t.0.to_string() }
}

impl FromStr for Tally {
    type Err = ParseRatioError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Tally(Ratio::from_str(s)?)) }
}

impl TryFrom<String> for Tally {
    type Error = ParseRatioError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Ok(Tally(Ratio::from_str(&s)?)) }
}

#[cfg(test)]
mod tests {
    use crate::tally::Tally;

    #[test]
    fn test_tally_arithmetic() {
        let mut t = Tally::from(42usize);
        assert_eq!("42",format!("{}",t));
        t += Tally::one();
        assert_eq!("43",format!("{}",t));
        assert_eq!("42",format!("{}",t-Tally::one()));
        assert_eq!(Tally::ratio(7,2),Tally::ratio(3,1)+Tally::ratio(1,2));
        assert_eq!(Tally::ratio(3,2),Tally::ratio(3,1).share(2));
        assert_eq!(Tally::ratio(1,2),Tally::ratio(1,3)*Tally::ratio(3,2));
        assert_eq!(Tally::ratio(-1,2),-Tally::ratio(1,2));
        assert!(Tally::ratio(-1,2).is_negative());
        assert!((Tally::ratio(1,2)-Tally::ratio(1,2)).is_zero());
        let sum : Tally = [Tally::one(),Tally::ratio(1,2),Tally::ratio(3,1)].iter().sum();
        assert_eq!(Tally::ratio(9,2),sum);
        assert_eq!(1.5,Tally::ratio(3,2).to_f64());
    }

    #[test]
    fn test_tally_parse_and_serde() {
        let parsed : Tally = "45/2".parse().unwrap();
        assert_eq!(Tally::ratio(45,2),parsed);
        assert!("elephant".parse::<Tally>().is_err());
        // fractions are serialized as strings since JSON numbers cannot hold them
        assert_eq!("\"7/2\"",serde_json::to_string(&Tally::ratio(7,2)).unwrap());
        assert_eq!(Tally::ratio(7,2),serde_json::from_str::<Tally>("\"7/2\"").unwrap());
        assert_eq!("\"3\"",serde_json::to_string(&Tally::ratio(3,1)).unwrap());
    }
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_json::Value;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

#[cfg(feature = "database")]
use sea_orm::Value as DbValue;

use crate::validation;

/// A currency amount held as a fixed-point decimal with exactly two places.
///
/// Serializes as a string (`"12.99"`) so clients never see a binary float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub const DECIMAL_PLACES: u32 = 2;
    /// Total significant digits a stored price may have
    pub const MAX_DIGITS: usize = 10;

    /// Rounds `amount` half-to-even to two decimal places
    pub fn new(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(Self::DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::DECIMAL_PLACES);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Self(rounded)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Number of significant digits, counting the two decimal places
    pub fn digits(&self) -> usize {
        self.0.mantissa().unsigned_abs().to_string().len()
    }

    /// Validating parse used for request payloads
    pub(crate) fn parse(value: Value) -> Result<Self, String> {
        let price = Self::new(validation::decimal(value)?);

        if price.is_negative() {
            return Err("Ensure this value is greater than or equal to 0.".to_string());
        }
        if price.digits() > Self::MAX_DIGITS {
            return Err(format!(
                "Ensure that there are no more than {} digits in total.",
                Self::MAX_DIGITS
            ));
        }

        Ok(price)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self::new)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validation::decimal(value)
            .map(Self::new)
            .map_err(D::Error::custom)
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Price {
    fn try_from(v: DbValue) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            DbValue::Decimal(Some(amount)) => Ok(Self::new(*amount)),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Price".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::Decimal
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Decimal(Some((10, 2)))
    }
}

#[cfg(feature = "database")]
impl From<Price> for DbValue {
    fn from(price: Price) -> Self {
        DbValue::Decimal(Some(Box::new(price.0)))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Price {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let amount: Decimal = res.try_get_by(index)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Price {
    fn null() -> DbValue {
        DbValue::Decimal(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_number_gets_two_places() {
        assert_eq!(Price::new(Decimal::from(80)).to_string(), "80.00");
        assert_eq!(Price::new(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn test_rounds_half_to_even() {
        let price = |s: &str| Price::from_str(s).unwrap().to_string();

        assert_eq!(price("12.345"), "12.34");
        assert_eq!(price("12.355"), "12.36");
        assert_eq!(price("12.3451"), "12.35");
        assert_eq!(price("0.125"), "0.12");
        assert_eq!(price("0.135"), "0.14");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let once = Price::from_str("12.99").unwrap().to_string();
        let twice = Price::from_str(&once).unwrap().to_string();
        assert_eq!(once, "12.99");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::from_str("6.9").unwrap();
        assert_eq!(serde_json::to_value(price).unwrap(), json!("6.90"));
    }

    #[test]
    fn test_deserializes_from_number_or_string() {
        let from_number: Price = serde_json::from_value(json!(14.99)).unwrap();
        let from_string: Price = serde_json::from_value(json!("14.99")).unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_value::<Price>(json!("free")).is_err());
    }

    #[test]
    fn test_parse_enforces_range_and_digits() {
        assert!(Price::parse(json!(-0.01)).is_err());
        assert_eq!(Price::parse(json!(-0.001)).unwrap().to_string(), "0.00");
        assert!(Price::parse(json!("99999999.99")).is_ok());
        assert_eq!(
            Price::parse(json!("100000000.00")),
            Err("Ensure that there are no more than 10 digits in total.".to_string())
        );
    }
}

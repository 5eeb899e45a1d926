use thiserror::Error;

/// Why a formula has no meaningful value for the given inputs
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UndefinedReason {
    #[error("contribution margin is zero or negative")]
    NonPositiveMargin,
    #[error("baseline is zero, so a relative change cannot be computed")]
    ZeroBaseline,
    #[error("current sales must be greater than zero")]
    NonPositiveSales,
    #[error("no customers take the discount")]
    NoDiscountTakers,
    #[error("discount rate per day must be greater than -100%")]
    InvalidDiscountRate,
    #[error("{0} is zero")]
    ZeroDenominator(String),
    #[error("result is not a finite number")]
    NonFinite,
}

/// A formula result that is either a value or an explicit "not computable"
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Computed<T> {
    Value(T),
    Undefined(UndefinedReason),
}

impl<T> Computed<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Computed::Value(v) => Some(v),
            Computed::Undefined(_) => None,
        }
    }

    pub fn as_ref(&self) -> Computed<&T> {
        match self {
            Computed::Value(v) => Computed::Value(v),
            Computed::Undefined(reason) => Computed::Undefined(reason.clone()),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Computed::Undefined(_))
    }

    pub fn undefined_reason(&self) -> Option<&UndefinedReason> {
        match self {
            Computed::Value(_) => None,
            Computed::Undefined(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        match self {
            Computed::Value(v) => Computed::Value(f(v)),
            Computed::Undefined(reason) => Computed::Undefined(reason),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Computed<U>) -> Computed<U> {
        match self {
            Computed::Value(v) => f(v),
            Computed::Undefined(reason) => Computed::Undefined(reason),
        }
    }
}

impl Computed<f64> {
    /// `numerator / denominator`, undefined when the denominator is zero
    pub fn ratio(numerator: f64, denominator: f64, reason: UndefinedReason) -> Self {
        if denominator == 0.0 {
            Computed::Undefined(reason)
        } else {
            Computed::finite(numerator / denominator)
        }
    }

    /// Wrap a value, treating NaN and infinities as undefined
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Computed::Value(value)
        } else {
            Computed::Undefined(UndefinedReason::NonFinite)
        }
    }
}

impl<T> From<Result<T, UndefinedReason>> for Computed<T> {
    fn from(result: Result<T, UndefinedReason>) -> Self {
        match result {
            Ok(v) => Computed::Value(v),
            Err(reason) => Computed::Undefined(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        let result = Computed::ratio(1.0, 0.0, UndefinedReason::ZeroBaseline);
        assert_eq!(result, Computed::Undefined(UndefinedReason::ZeroBaseline));
        assert_eq!(Computed::ratio(3.0, 2.0, UndefinedReason::ZeroBaseline), Computed::Value(1.5));
    }

    #[test]
    fn test_finite_rejects_nan() {
        assert!(Computed::finite(f64::NAN).is_undefined());
        assert!(Computed::finite(f64::INFINITY).is_undefined());
        assert_eq!(Computed::finite(2.0).value(), Some(2.0));
    }

    #[test]
    fn test_map_keeps_reason() {
        let undefined: Computed<f64> = Computed::Undefined(UndefinedReason::NonPositiveMargin);
        let mapped = undefined.map(|v| v * 2.0);
        assert_eq!(mapped.undefined_reason(), Some(&UndefinedReason::NonPositiveMargin));
        assert_eq!(Computed::Value(2.0).map(|v| v * 2.0), Computed::Value(4.0));
    }
}

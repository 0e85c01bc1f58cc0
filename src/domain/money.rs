use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::TradeError;

/// 可安全转换为两位小数元字符串的分金额上限。
pub const MAX_AMOUNT_MINOR: i64 = 999_999_999_999_99;

/// 本版本仅支持人民币, 枚举形态为后续币种留出扩展位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    CNY,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::CNY => "CNY",
        }
    }
}

/// 分转元。输出固定保留两位小数, 渠道方报文以此为准。
///
/// 负数与超限金额一律拒绝, 调用方应在触达任何远程服务之前完成转换。
pub fn minor_to_major(amount_minor: i64) -> Result<String, TradeError> {
    if amount_minor < 0 {
        return Err(TradeError::AmountConversion(format!(
            "金额不能为负数: {amount_minor}"
        )));
    }
    if amount_minor > MAX_AMOUNT_MINOR {
        return Err(TradeError::AmountConversion(format!(
            "金额超出可转换范围: {amount_minor}"
        )));
    }

    Ok(Decimal::new(amount_minor, 2).to_string())
}

/// 元转分, 仅接受最多两位小数的非负十进制字符串。
pub fn major_to_minor(amount_major: &str) -> Result<i64, TradeError> {
    let major = Decimal::from_str(amount_major.trim())
        .map_err(|e| TradeError::AmountConversion(format!("无效的金额格式 {amount_major}: {e}")))?;

    if major.is_sign_negative() {
        return Err(TradeError::AmountConversion(format!(
            "金额不能为负数: {amount_major}"
        )));
    }

    let minor = major
        .checked_mul(Decimal::new(100, 0))
        .ok_or_else(|| TradeError::AmountConversion(format!("金额超出可转换范围: {amount_major}")))?;

    if !minor.fract().is_zero() {
        return Err(TradeError::AmountConversion(format!(
            "金额精度超过分: {amount_major}"
        )));
    }

    let minor = minor
        .to_i64()
        .ok_or_else(|| TradeError::AmountConversion(format!("金额超出可转换范围: {amount_major}")))?;

    if minor > MAX_AMOUNT_MINOR {
        return Err(TradeError::AmountConversion(format!(
            "金额超出可转换范围: {amount_major}"
        )));
    }

    Ok(minor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10050, "100.50")]
    #[case(0, "0.00")]
    #[case(5, "0.05")]
    #[case(100, "1.00")]
    #[case(123_456_789, "1234567.89")]
    #[case(MAX_AMOUNT_MINOR, "999999999999.99")]
    fn test_minor_to_major(#[case] minor: i64, #[case] expected: &str) {
        assert_eq!(minor_to_major(minor).unwrap(), expected);
    }

    #[test]
    fn test_minor_to_major_rejects_negative() {
        let err = minor_to_major(-5).unwrap_err();
        assert!(matches!(err, TradeError::AmountConversion(_)));
        assert_eq!(err.err_code(), 300006);
    }

    #[test]
    fn test_minor_to_major_rejects_overflow() {
        let err = minor_to_major(MAX_AMOUNT_MINOR + 1).unwrap_err();
        assert!(matches!(err, TradeError::AmountConversion(_)));
    }

    #[rstest]
    #[case("100.50", 10050)]
    #[case("0.00", 0)]
    #[case("0.05", 5)]
    #[case("1", 100)]
    #[case("1234567.89", 123_456_789)]
    fn test_major_to_minor(#[case] major: &str, #[case] expected: i64) {
        assert_eq!(major_to_minor(major).unwrap(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("abc")]
    #[case("100.501")]
    #[case("")]
    fn test_major_to_minor_rejects_invalid(#[case] major: &str) {
        assert!(matches!(
            major_to_minor(major),
            Err(TradeError::AmountConversion(_))
        ));
    }

    #[test]
    fn test_round_trip_has_no_drift() {
        for minor in [0, 1, 99, 100, 10050, 999_999_999] {
            let major = minor_to_major(minor).unwrap();
            assert_eq!(major_to_minor(&major).unwrap(), minor);
        }
    }

    #[test]
    fn test_currency_as_str() {
        assert_eq!(Currency::CNY.as_str(), "CNY");
    }
}

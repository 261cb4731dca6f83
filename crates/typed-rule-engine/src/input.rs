//! 输入类型化
//!
//! 每次评估调用都会按字段定义把字符串输入解析为 `TypedInput`，之后的树评估只读该结构。

use crate::error::{Result, RuleError};
use crate::models::{Fields, Input};
use crate::value::{parse_value, TypedValue};
use std::collections::HashMap;

/// 按字段定义解析后的输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedInput {
    values: HashMap<String, TypedValue>,
}

impl TypedInput {
    /// 校验并解析输入
    ///
    /// 每个声明字段都必须出现且能按声明类型解析；未声明的多余字段被忽略。
    pub fn parse(input: &Input, fields: &Fields) -> Result<Self> {
        let mut values = HashMap::with_capacity(fields.len());

        for (name, value_type) in fields {
            let raw = input.get(name).ok_or_else(|| RuleError::FieldNotFound {
                field: name.clone(),
                context: format!("输入缺少 {} 类型的必填字段", value_type),
            })?;

            let value = parse_value(raw, *value_type).map_err(|e| {
                RuleError::FailedParsingInput {
                    field: name.clone(),
                    value: e.raw,
                    value_type: e.value_type,
                }
            })?;

            values.insert(name.clone(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.values.get(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    fn booking_fields() -> Fields {
        let mut fields = Fields::new();
        fields.insert("totalAmount".to_string(), ValueType::Integer);
        fields.insert("isFlightBooking".to_string(), ValueType::Boolean);
        fields.insert("flightDestination".to_string(), ValueType::String);
        fields.insert("rating".to_string(), ValueType::Float);
        fields
    }

    fn input(pairs: &[(&str, &str)]) -> Input {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_complete_input() {
        let typed = TypedInput::parse(
            &input(&[
                ("totalAmount", "25000"),
                ("isFlightBooking", "true"),
                ("flightDestination", "Bangalore"),
                ("rating", "4.5"),
            ]),
            &booking_fields(),
        )
        .unwrap();

        assert_eq!(typed.len(), 4);
        assert_eq!(typed.get("totalAmount"), Some(&TypedValue::Integer(25000)));
        assert_eq!(typed.get("isFlightBooking"), Some(&TypedValue::Boolean(true)));
        assert_eq!(
            typed.get("flightDestination"),
            Some(&TypedValue::String("Bangalore".to_string()))
        );
        assert_eq!(typed.get("rating"), Some(&TypedValue::Float(4.5)));
    }

    #[test]
    fn test_missing_field() {
        let err = TypedInput::parse(
            &input(&[
                ("totalAmount", "25000"),
                ("isFlightBooking", "true"),
                ("rating", "4.5"),
            ]),
            &booking_fields(),
        )
        .unwrap_err();

        match err {
            RuleError::FieldNotFound { field, .. } => assert_eq!(field, "flightDestination"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_field() {
        let err = TypedInput::parse(
            &input(&[
                ("totalAmount", "lots"),
                ("isFlightBooking", "true"),
                ("flightDestination", "Delhi"),
                ("rating", "4.5"),
            ]),
            &booking_fields(),
        )
        .unwrap_err();

        assert_eq!(err.code(), "FAILED_PARSING_INPUT");
        assert!(err.to_string().contains("totalAmount"));
    }

    #[test]
    fn test_out_of_range_float_field() {
        let err = TypedInput::parse(
            &input(&[
                ("totalAmount", "1"),
                ("isFlightBooking", "true"),
                ("flightDestination", "Delhi"),
                ("rating", "1e400"),
            ]),
            &booking_fields(),
        )
        .unwrap_err();

        match err {
            RuleError::FailedParsingInput { field, value, .. } => {
                assert_eq!(field, "rating");
                assert_eq!(value, "1e400");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_fields_ignored() {
        let typed = TypedInput::parse(
            &input(&[
                ("totalAmount", "1"),
                ("isFlightBooking", "false"),
                ("flightDestination", "Delhi"),
                ("rating", "1"),
                ("couponCode", "NEWYEAR"),
            ]),
            &booking_fields(),
        )
        .unwrap();

        assert_eq!(typed.len(), 4);
        assert_eq!(typed.get("couponCode"), None);
    }

    #[test]
    fn test_empty_schema() {
        let typed = TypedInput::parse(&input(&[("anything", "x")]), &Fields::new()).unwrap();
        assert!(typed.is_empty());
    }
}

//! 值类型与类型化值
//!
//! 输入与常量操作数都以字符串形式给出，按声明的 `ValueType` 解析为 `TypedValue`。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支持的值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    Boolean,
    String,
    Integer,
    Float,
}

impl ValueType {
    pub const ALL: [ValueType; 4] = [
        ValueType::Boolean,
        ValueType::String,
        ValueType::Integer,
        ValueType::Float,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            _ => Err(format!(
                "无效的值类型 {:?}, 可选: Boolean, String, Integer, Float",
                s
            )),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.as_str().to_string()
    }
}

/// 类型化值
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Float(f64),
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Boolean(_) => ValueType::Boolean,
            Self::String(_) => ValueType::String,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// 值解析失败
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("无法将 {raw:?} 解析为 {value_type}")]
pub struct ParseValueError {
    pub raw: String,
    pub value_type: ValueType,
}

/// 按声明类型解析字符串值
pub fn parse_value(raw: &str, value_type: ValueType) -> Result<TypedValue, ParseValueError> {
    let fail = || ParseValueError {
        raw: raw.to_string(),
        value_type,
    };

    match value_type {
        ValueType::Boolean => parse_bool(raw).map(TypedValue::Boolean).ok_or_else(fail),
        ValueType::Integer => raw
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| fail()),
        ValueType::Float => parse_float(raw).map(TypedValue::Float).ok_or_else(fail),
        ValueType::String => Ok(TypedValue::String(raw.to_string())),
    }
}

/// 超出 f64 范围的字面量（如 `1e400`）视为解析失败，只有显式的 inf/NaN 写法才能得到非有限值
fn parse_float(raw: &str) -> Option<f64> {
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() {
        return Some(value);
    }

    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|spelling| unsigned.eq_ignore_ascii_case(spelling))
        .then_some(value)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

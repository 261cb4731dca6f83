//! 规则操作符定义

use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 条件操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    // 数值比较
    Gt,
    Gte,
    Lt,
    Lte,

    // 通用比较
    Eq,
    Neq,

    // 子串检查
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Eq,
        Operator::Neq,
        Operator::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Contains => "contains",
        }
    }

    /// 操作数个数，目前所有操作符都是二元的
    pub fn arity(&self) -> usize {
        2
    }

    /// 操作符是否支持该值类型
    pub fn supports(&self, value_type: ValueType) -> bool {
        match self {
            Self::Gt | Self::Gte | Self::Lt | Self::Lte => value_type.is_numeric(),
            Self::Eq | Self::Neq => true,
            Self::Contains => value_type == ValueType::String,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            "==" => Self::Eq,
            "!=" => Self::Neq,
            "contains" | "contain" => Self::Contains,
            other => return Err(format!("无效的操作符: {:?}", other)),
        };
        Ok(op)
    }
}

impl TryFrom<String> for Operator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        value.as_str().to_string()
    }
}

/// 逻辑操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl LogicalOperator {
    /// 识别条件节点引用的逻辑关键字
    pub fn from_reference(reference: &str) -> Option<Self> {
        match reference {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_roundtrip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert_eq!("contain".parse::<Operator>().unwrap(), Operator::Contains);
        assert!("=~".parse::<Operator>().is_err());
        assert!(" > ".parse::<Operator>().is_err());
        assert!("contains ".parse::<Operator>().is_err());
        assert!("CONTAINS".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_supported_types() {
        assert!(Operator::Gt.supports(ValueType::Integer));
        assert!(Operator::Lte.supports(ValueType::Float));
        assert!(!Operator::Gte.supports(ValueType::String));
        assert!(!Operator::Lt.supports(ValueType::Boolean));

        for vt in ValueType::ALL {
            assert!(Operator::Eq.supports(vt));
            assert!(Operator::Neq.supports(vt));
        }

        assert!(Operator::Contains.supports(ValueType::String));
        assert!(!Operator::Contains.supports(ValueType::Integer));
    }

    #[test]
    fn test_logical_reference() {
        assert_eq!(LogicalOperator::from_reference("and"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::from_reference("or"), Some(LogicalOperator::Or));
        assert_eq!(LogicalOperator::from_reference("not"), Some(LogicalOperator::Not));
        assert_eq!(LogicalOperator::from_reference("AND"), None);
        assert_eq!(LogicalOperator::from_reference("amountGreater"), None);
    }
}

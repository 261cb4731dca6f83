//! 规则引擎领域模型
//!
//! 配置结构与 JSON 线格式一一对应，映射使用 `IndexMap` 以保留文档顺序。

use crate::operators::{LogicalOperator, Operator};
use crate::value::ValueType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 必填输入字段：字段名 -> 值类型
pub type Fields = IndexMap<String, ValueType>;

/// 评估输入：字段名 -> 字符串形式的值
pub type Input = HashMap<String, String>;

/// 规则命中时原样返回的结果
pub type RuleResult = serde_json::Map<String, Value>;

/// 操作数来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperandKind {
    /// 值取自输入中同名字段
    Field,
    /// 值为配置中的字面量
    Constant,
}

impl OperandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::Constant => "Constant",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "field" => Ok(Self::Field),
            "constant" => Ok(Self::Constant),
            _ => Err(format!("无效的操作数来源 {:?}, 可选: Field, Constant", s)),
        }
    }
}

impl TryFrom<String> for OperandKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OperandKind> for String {
    fn from(value: OperandKind) -> Self {
        value.as_str().to_string()
    }
}

/// 操作数定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operand {
    #[serde(rename = "type", alias = "operandAs")]
    pub kind: OperandKind,
    #[serde(rename = "valuetype")]
    pub value_type: ValueType,
    /// `Field` 时为字段名，`Constant` 时为字面量
    #[serde(rename = "value", alias = "val")]
    pub value: String,
}

impl Operand {
    pub fn field(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            kind: OperandKind::Field,
            value_type,
            value: name.into(),
        }
    }

    pub fn constant(value: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            kind: OperandKind::Constant,
            value_type,
            value: value.into(),
        }
    }
}

/// 可复用的条件类型（规则树的叶子模板）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionType {
    /// 原始操作符文本，校验时解析
    pub operator: String,
    /// 操作数统一类型；缺省时取各操作数自身声明的 `valuetype`
    #[serde(rename = "operandType", default, skip_serializing_if = "Option::is_none")]
    pub operand_type: Option<ValueType>,
    pub operands: Vec<Operand>,
}

impl ConditionType {
    pub fn new(operator: Operator, operand_type: ValueType, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.to_string(),
            operand_type: Some(operand_type),
            operands,
        }
    }

    /// 不声明统一类型，由操作数各自的 `valuetype` 决定
    pub fn from_operands(operator: Operator, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.to_string(),
            operand_type: None,
            operands,
        }
    }

    /// 条件类型的值类型：优先取 `operandType`，否则取第一个操作数的类型
    pub fn value_type(&self) -> Option<ValueType> {
        self.operand_type
            .or_else(|| self.operands.first().map(|operand| operand.value_type))
    }
}

/// 规则条件树节点
///
/// `reference` 为 `and`/`or`/`not` 时是逻辑节点，否则引用一个条件类型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub reference: String,
    #[serde(
        rename = "subConditions",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Condition>,
}

impl Condition {
    pub fn leaf(condition_type: impl Into<String>) -> Self {
        Self {
            reference: condition_type.into(),
            children: Vec::new(),
        }
    }

    pub fn logical(operator: LogicalOperator, children: Vec<Condition>) -> Self {
        Self {
            reference: operator.as_str().to_string(),
            children,
        }
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Self::logical(LogicalOperator::And, children)
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Self::logical(LogicalOperator::Or, children)
    }

    pub fn not(child: Condition) -> Self {
        Self::logical(LogicalOperator::Not, vec![child])
    }
}

/// 规则定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// 数值越小越靠前
    pub priority: i64,
    #[serde(rename = "condition")]
    pub root_condition: Condition,
    #[serde(default)]
    pub result: RuleResult,
}

impl RuleConfig {
    pub fn new(priority: i64, root_condition: Condition, result: RuleResult) -> Self {
        Self {
            priority,
            root_condition,
            result,
        }
    }
}

/// 规则引擎配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEngineConfig {
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub condition_types: IndexMap<String, ConditionType>,
    #[serde(default)]
    pub rules: IndexMap<String, RuleConfig>,
}

impl RuleEngineConfig {
    /// 从 JSON 字符串解析配置（不做校验）
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// 命中规则的输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "rulename")]
    pub rule_name: String,
    pub priority: i64,
    pub result: RuleResult,
}

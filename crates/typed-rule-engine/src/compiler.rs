//! 规则编译器
//!
//! 将校验过的条件树编译成内存中的执行树。叶子节点直接携带预解析的操作数，
//! 执行时不再查询条件类型表。

use crate::error::{Result, RuleError};
use crate::models::{Condition, Output, RuleConfig, RuleResult};
use crate::operators::{LogicalOperator, Operator};
use crate::validator::{validate_condition, ResolvedOperand, ValidatedConditionType};
use crate::value::ValueType;
use indexmap::IndexMap;

/// 执行树节点
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatorNode {
    Logical {
        operator: LogicalOperator,
        children: Vec<EvaluatorNode>,
    },
    Compare {
        operator: Operator,
        value_type: ValueType,
        operands: [ResolvedOperand; 2],
    },
}

impl EvaluatorNode {
    /// 节点总数
    pub fn size(&self) -> usize {
        match self {
            Self::Logical { children, .. } => 1 + children.iter().map(Self::size).sum::<usize>(),
            Self::Compare { .. } => 1,
        }
    }
}

/// 编译后的规则
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    priority: i64,
    root: EvaluatorNode,
    result: RuleResult,
}

impl CompiledRule {
    /// 获取规则名称
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// 获取根节点
    pub fn root(&self) -> &EvaluatorNode {
        &self.root
    }

    pub fn result(&self) -> &RuleResult {
        &self.result
    }

    /// 生成命中输出
    pub fn to_output(&self) -> Output {
        Output {
            rule_name: self.name.clone(),
            priority: self.priority,
            result: self.result.clone(),
        }
    }
}

/// 规则编译器
pub struct RuleCompiler<'a> {
    condition_types: &'a IndexMap<String, ValidatedConditionType>,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(condition_types: &'a IndexMap<String, ValidatedConditionType>) -> Self {
        Self { condition_types }
    }

    /// 编译规则
    ///
    /// 先校验条件树，再构建执行树；构建阶段发现的不一致属于内部错误。
    pub fn compile(&self, name: &str, rule: RuleConfig) -> Result<CompiledRule> {
        validate_condition(name, &rule.root_condition, self.condition_types)?;

        let root = self.build_node(&rule.root_condition)?;

        Ok(CompiledRule {
            name: name.to_string(),
            priority: rule.priority,
            root,
            result: rule.result,
        })
    }

    /// 递归构建执行树
    fn build_node(&self, condition: &Condition) -> Result<EvaluatorNode> {
        if let Some(operator) = LogicalOperator::from_reference(&condition.reference) {
            let children = condition
                .children
                .iter()
                .map(|child| self.build_node(child))
                .collect::<Result<Vec<_>>>()?;

            return Ok(EvaluatorNode::Logical { operator, children });
        }

        let condition_type = self.condition_types.get(&condition.reference).ok_or_else(|| {
            RuleError::InvariantViolation(format!(
                "构建执行树时找不到已校验的条件类型 {}",
                condition.reference
            ))
        })?;

        Ok(EvaluatorNode::Compare {
            operator: condition_type.operator,
            value_type: condition_type.value_type,
            operands: condition_type.operands.clone(),
        })
    }
}

//! 规则执行器
//!
//! 实现执行树的短路求值。取消信号只在每条规则开始评估前检查一次，
//! 一旦开始就会执行到底，树遍历中途不响应取消。

use crate::compiler::{CompiledRule, EvaluatorNode};
use crate::error::{Result, RuleError};
use crate::evaluator::ConditionEvaluator;
use crate::input::TypedInput;
use crate::operators::LogicalOperator;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

/// 规则执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleExecutor {
    /// 是否输出逐节点评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪（trace 级别日志）
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 执行单条规则
    ///
    /// 开始前已取消则返回 `ContextCancelled`。
    pub fn execute(
        &self,
        rule: &CompiledRule,
        input: &TypedInput,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        if cancel.is_cancelled() {
            warn!(rule = rule.name(), "评估开始前收到取消信号");
            return Err(RuleError::ContextCancelled {
                rule: rule.name().to_string(),
            });
        }

        let matched = self.evaluate_node(rule.root(), input, 0)?;

        if self.trace_enabled {
            trace!(rule = rule.name(), matched, "规则评估完成");
        }

        Ok(matched)
    }

    /// 递归评估执行树节点
    pub fn evaluate_node(
        &self,
        node: &EvaluatorNode,
        input: &TypedInput,
        depth: usize,
    ) -> Result<bool> {
        match node {
            EvaluatorNode::Logical { operator, children } => {
                self.evaluate_logical(*operator, children, input, depth)
            }
            EvaluatorNode::Compare {
                operator,
                value_type,
                operands,
            } => {
                let first = operands[0].resolve(input)?;
                let second = operands[1].resolve(input)?;
                let matched = ConditionEvaluator::evaluate(*operator, *value_type, first, second)?;

                if self.trace_enabled {
                    trace!(depth, %operator, %first, %second, matched, "比较节点");
                }

                Ok(matched)
            }
        }
    }

    /// 评估逻辑节点（短路求值）
    fn evaluate_logical(
        &self,
        operator: LogicalOperator,
        children: &[EvaluatorNode],
        input: &TypedInput,
        depth: usize,
    ) -> Result<bool> {
        match operator {
            LogicalOperator::And => {
                // 遇到 false 立即返回
                for (i, child) in children.iter().enumerate() {
                    if !self.evaluate_node(child, input, depth + 1)? {
                        if self.trace_enabled {
                            trace!(depth, child = i, "AND 短路");
                        }
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            LogicalOperator::Or => {
                // 遇到 true 立即返回
                for (i, child) in children.iter().enumerate() {
                    if self.evaluate_node(child, input, depth + 1)? {
                        if self.trace_enabled {
                            trace!(depth, child = i, "OR 短路");
                        }
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            LogicalOperator::Not => {
                let child = children.first().ok_or_else(|| {
                    RuleError::InvariantViolation("not 节点缺少子节点".to_string())
                })?;
                Ok(!self.evaluate_node(child, input, depth + 1)?)
            }
        }
    }
}

//! 规则引擎
//!
//! 构建时一次性完成校验与编译（全有或全无），之后规则集只读，可被多个调用方并发使用。

use crate::compiler::{CompiledRule, RuleCompiler};
use crate::error::{Result, RuleError};
use crate::executor::RuleExecutor;
use crate::input::TypedInput;
use crate::models::{Fields, Input, Output, RuleEngineConfig};
use crate::validator::validate_config;
use std::collections::HashMap;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// 评估选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluateOptions {
    /// 按优先级升序评估全部规则，返回所有命中
    #[default]
    Complete,
    /// 按优先级升序，返回前 n 个命中
    AscendingPriorityBased(usize),
    /// 按优先级降序，返回前 n 个命中
    DescendingPriorityBased(usize),
}

impl EvaluateOptions {
    pub fn complete() -> Self {
        Self::Complete
    }

    pub fn ascending_priority_based(n: usize) -> Self {
        Self::AscendingPriorityBased(n)
    }

    pub fn descending_priority_based(n: usize) -> Self {
        Self::DescendingPriorityBased(n)
    }

    /// 命中数量上限，`Complete` 不设上限
    fn limit(&self) -> Result<Option<usize>> {
        match *self {
            Self::Complete => Ok(None),
            Self::AscendingPriorityBased(0) | Self::DescendingPriorityBased(0) => Err(
                RuleError::InvalidEvaluateOptions(format!("{} 的 n 必须大于 0", self)),
            ),
            Self::AscendingPriorityBased(n) | Self::DescendingPriorityBased(n) => Ok(Some(n)),
        }
    }
}

impl fmt::Display for EvaluateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::AscendingPriorityBased(n) => write!(f, "ascending_priority_based({})", n),
            Self::DescendingPriorityBased(n) => write!(f, "descending_priority_based({})", n),
        }
    }
}

/// 规则引擎
#[derive(Debug)]
pub struct RuleEngine {
    fields: Fields,
    /// 规则名 -> `rules` 下标
    rule_index: HashMap<String, usize>,
    /// 按优先级升序（稳定排序，同优先级保持配置顺序）
    rules: Vec<CompiledRule>,
    executor: RuleExecutor,
}

impl RuleEngine {
    /// 校验配置并构建引擎
    ///
    /// 任何校验错误都会直接返回，不会产生部分构建的引擎。
    #[instrument(
        skip_all,
        fields(
            field_count = config.fields.len(),
            condition_type_count = config.condition_types.len(),
            rule_count = config.rules.len()
        )
    )]
    pub fn new(config: RuleEngineConfig) -> Result<Self> {
        let condition_types = validate_config(&config)?;
        let compiler = RuleCompiler::new(&condition_types);

        let RuleEngineConfig { fields, rules, .. } = config;

        let mut compiled = Vec::with_capacity(rules.len());
        for (name, rule) in rules {
            compiled.push(compiler.compile(&name, rule)?);
        }

        compiled.sort_by_key(CompiledRule::priority);

        let rule_index = compiled
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.name().to_string(), i))
            .collect();

        info!(rules = compiled.len(), "规则引擎构建完成");

        Ok(Self {
            fields,
            rule_index,
            rules: compiled,
            executor: RuleExecutor::new(),
        })
    }

    /// 从 JSON 配置构建引擎
    pub fn from_json(json: &str) -> Result<Self> {
        let config = RuleEngineConfig::from_json(json)?;
        Self::new(config)
    }

    /// 启用逐节点评估追踪
    pub fn with_trace(mut self) -> Self {
        self.executor = self.executor.with_trace();
        self
    }

    /// 按选项评估输入
    ///
    /// 命中结果按访问顺序返回：`Complete`/`AscendingPriorityBased` 为升序，
    /// `DescendingPriorityBased` 为降序。中途取消时丢弃已收集的结果并返回 `ContextCancelled`。
    #[instrument(skip(self, cancel, input, options), fields(options = %options))]
    pub fn evaluate(
        &self,
        cancel: &CancellationToken,
        input: &Input,
        options: EvaluateOptions,
    ) -> Result<Vec<Output>> {
        let typed = TypedInput::parse(input, &self.fields)?;
        let limit = options.limit()?;

        let outputs = match options {
            EvaluateOptions::Complete | EvaluateOptions::AscendingPriorityBased(_) => {
                self.collect_matches(self.rules.iter(), &typed, cancel, limit)?
            }
            EvaluateOptions::DescendingPriorityBased(_) => {
                self.collect_matches(self.rules.iter().rev(), &typed, cancel, limit)?
            }
        };

        debug!(matched = outputs.len(), "评估完成");
        Ok(outputs)
    }

    /// 只评估指定名称的规则，未命中返回 `None`
    #[instrument(skip(self, cancel, input))]
    pub fn evaluate_single_rule(
        &self,
        cancel: &CancellationToken,
        input: &Input,
        rule_name: &str,
    ) -> Result<Option<Output>> {
        let typed = TypedInput::parse(input, &self.fields)?;

        let rule = self
            .get_rule(rule_name)
            .ok_or_else(|| RuleError::RuleNotFound(rule_name.to_string()))?;

        if self.executor.execute(rule, &typed, cancel)? {
            debug!(rule = rule.name(), priority = rule.priority(), "规则命中");
            Ok(Some(rule.to_output()))
        } else {
            Ok(None)
        }
    }

    fn collect_matches<'a, I>(
        &self,
        rules: I,
        typed: &TypedInput,
        cancel: &CancellationToken,
        limit: Option<usize>,
    ) -> Result<Vec<Output>>
    where
        I: Iterator<Item = &'a CompiledRule>,
    {
        let mut outputs = Vec::new();

        for rule in rules {
            if !self.executor.execute(rule, typed, cancel)? {
                continue;
            }

            debug!(rule = rule.name(), priority = rule.priority(), "规则命中");
            outputs.push(rule.to_output());

            if limit.is_some_and(|n| outputs.len() >= n) {
                break;
            }
        }

        Ok(outputs)
    }

    /// 获取编译后的规则
    pub fn get_rule(&self, rule_name: &str) -> Option<&CompiledRule> {
        self.rule_index.get(rule_name).map(|&i| &self.rules[i])
    }

    /// 检查规则是否存在
    pub fn contains_rule(&self, rule_name: &str) -> bool {
        self.rule_index.contains_key(rule_name)
    }

    /// 按评估顺序（优先级升序）列出规则名
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(CompiledRule::name).collect()
    }

    /// 必填输入字段定义
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

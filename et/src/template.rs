//! Optimized template construction
//!
//! Turns one expert's optimization record into the template that gets
//! prepended to that expert's industry. The mapping is fixed: no randomness,
//! no lookups beyond the record itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::MergeError;

/// Category assigned to every optimized template
pub const TEMPLATE_CATEGORY: &str = "专业咨询";

/// Difficulty assigned to every optimized template
pub const TEMPLATE_DIFFICULTY: &str = "professional";

/// Estimated time assigned to every optimized template
pub const TEMPLATE_ESTIMATED_TIME: &str = "15-30分钟";

/// Best practices attached to every optimized template
pub const BEST_PRACTICES: [&str; 5] = [
    "始终提供具体可执行的行动方案",
    "结合中国本土化环境和政策",
    "重视风险识别和防控",
    "支持客户决策和实施",
    "提供持续的专业指导",
];

/// Feature labels attached to every optimized template
pub const TEMPLATE_FEATURES: [&str; 5] = [
    "行动型AI教练模式",
    "结构化决策框架",
    "具体实施清单",
    "中国本土化适配",
    "专业伦理保障",
];

/// One expert entry from the optimization source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertInfo {
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub target_users: Vec<String>,
    pub core_competencies: Vec<String>,
    pub optimized_prompt: OptimizedPrompt,
}

/// Prompt sections of an expert entry, as written by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedPrompt {
    pub system: String,
    pub context: String,
    pub task_framework: String,
    pub output_format: String,
    pub safety_guidelines: String,
}

impl ExpertInfo {
    /// Decode an expert entry, naming the expert on failure
    pub fn from_value(expert_key: &str, value: &Value) -> Result<Self, MergeError> {
        debug!(%expert_key, "ExpertInfo::from_value: called");
        Self::deserialize(value).map_err(|source| MergeError::InvalidExpert {
            expert: expert_key.to_string(),
            source,
        })
    }
}

/// Prompt sections of a catalog template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSections {
    pub system: String,
    pub context: String,
    pub task: String,
    pub format: String,
    pub examples: String,
    pub safety: String,
}

/// A catalog template record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub prompt: PromptSections,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub target_users: Vec<String>,
    pub core_competencies: Vec<String>,
    pub best_practices: Vec<String>,
    pub optimization_features: Vec<String>,
}

/// Id of the optimized template for an expert
pub fn template_id(expert_key: &str) -> String {
    format!("{}-professional-consultation", expert_key)
}

/// Build the optimized template for one expert
pub fn build_template(expert_key: &str, info: &ExpertInfo) -> Template {
    debug!(%expert_key, name = %info.name, "build_template: called");
    let prompt = &info.optimized_prompt;

    Template {
        id: template_id(expert_key),
        title: format!("专业{}咨询助手", info.name),
        category: TEMPLATE_CATEGORY.to_string(),
        description: format!("基于行动型AI教练模式的{}", info.description),
        difficulty: TEMPLATE_DIFFICULTY.to_string(),
        estimated_time: TEMPLATE_ESTIMATED_TIME.to_string(),
        prompt: PromptSections {
            system: prompt.system.clone(),
            context: prompt.context.clone(),
            task: prompt.task_framework.clone(),
            format: prompt.output_format.clone(),
            examples: format!("基于{}专业场景提供具体可执行的解决方案", info.name),
            safety: prompt.safety_guidelines.clone(),
        },
        tags: info.core_competencies.clone(),
        use_cases: info.target_users.clone(),
        target_users: info.target_users.clone(),
        core_competencies: info.core_competencies.clone(),
        best_practices: BEST_PRACTICES.iter().map(|s| s.to_string()).collect(),
        optimization_features: TEMPLATE_FEATURES.iter().map(|s| s.to_string()).collect(),
    }
}

use crate::variable::types::Environment;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// 变量替换器
pub struct VariableResolver;

fn placeholder_regex() -> &'static Regex {
    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    VAR_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap())
}

impl VariableResolver {
    /// 替换文本中的所有 {{variable}} 占位符
    ///
    /// - 没有激活环境时原样返回
    /// - 环境中不存在的变量保持原样
    /// - 只扫描一遍，替换后的值不会被再次解析
    pub fn resolve(template: &str, env: Option<&Environment>) -> String {
        let Some(env) = env else {
            return template.to_string();
        };

        placeholder_regex()
            .replace_all(template, |caps: &Captures| {
                let var_name = &caps[1];
                env.get(var_name).unwrap_or(&caps[0]).to_string()
            })
            .into_owned()
    }

    /// 列出文本中出现的所有占位符名称 (按出现顺序，可能重复)
    pub fn placeholders(text: &str) -> Vec<String> {
        placeholder_regex()
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// 列出当前环境无法解析的占位符名称
    pub fn unresolved(text: &str, env: Option<&Environment>) -> Vec<String> {
        Self::placeholders(text)
            .into_iter()
            .filter(|name| env.and_then(|env| env.get(name)).is_none())
            .collect()
    }

    /// 解析并替换系统环境变量 ${VAR}
    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

        re.replace_all(text, |caps: &Captures| {
            let env_name = &caps[1];
            std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }
}

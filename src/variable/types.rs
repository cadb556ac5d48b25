use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Result, RureqError};

/// 环境：一组命名的字符串变量
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Environment {
    /// 环境名称 (来自配置表名，不参与序列化)
    #[serde(skip)]
    pub name: String,

    /// 变量映射
    #[serde(flatten)]
    pub variables: HashMap<String, String>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// 插入变量
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// 环境集合
///
/// 按插入顺序保存所有环境，同一时刻最多一个处于激活状态。
/// 激活某个环境会自动取消之前的激活。
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSet {
    environments: Vec<Environment>,
    active: Option<usize>,
}

impl EnvironmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加环境；同名环境会被替换 (保留原位置和激活状态)
    pub fn upsert(&mut self, environment: Environment) {
        match self.position(&environment.name) {
            Some(index) => self.environments[index] = environment,
            None => self.environments.push(environment),
        }
    }

    /// 激活指定环境
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| RureqError::UnknownEnvironment(name.to_string()))?;
        self.active = Some(index);
        Ok(())
    }

    /// 取消激活 (之后变量替换不再生效)
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    /// 当前激活的环境
    pub fn active(&self) -> Option<&Environment> {
        self.active.map(|index| &self.environments[index])
    }

    pub fn active_mut(&mut self) -> Option<&mut Environment> {
        self.active.map(|index| &mut self.environments[index])
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active().is_some_and(|env| env.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|env| env.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Environment> {
        self.environments.iter_mut().find(|env| env.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.environments.iter().position(|env| env.name == name)
    }
}

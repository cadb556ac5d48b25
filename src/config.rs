use crate::variable::resolver::VariableResolver;
use crate::variable::types::{Environment, EnvironmentSet};
use crate::{Result, RureqError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 默认历史记录容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
/// 默认数据目录 (file 持久化时使用)
pub const DEFAULT_DATA_DIR: &str = ".rureq";
/// 数据目录覆盖用的系统环境变量
pub const DATA_DIR_ENV: &str = "RUREQ_DATA_DIR";

/// 会话数据的持久化策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    /// 仅保存在内存中，会话结束即丢弃
    #[default]
    Memory,
    /// 历史写入 history.jsonl，集合写入 collections.json
    File,
}

/// `[settings]` 配置段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub history_capacity: usize,
    pub timeout_secs: Option<u64>,
    pub persistence: Persistence,
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            timeout_secs: None,
            persistence: Persistence::Memory,
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// 数据目录：RUREQ_DATA_DIR > settings.data_dir > .rureq
    pub fn data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}

/// 完整的配置文件 (rureq.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// 初始激活的环境
    #[serde(default)]
    pub active_environment: Option<String>,

    #[serde(default)]
    pub settings: Settings,

    /// 所有环境配置
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl Config {
    /// 获取指定环境的变量
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "rureq.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RureqError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config = Self::parse(&content)?;
        debug!(
            path = %path.as_ref().display(),
            environments = config.environments.len(),
            "Loaded config"
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let mut config: Config = toml::from_str(content)?;
        // 环境名称来自表名
        for (name, env) in config.environments.iter_mut() {
            env.name = name.clone();
        }
        Ok(config)
    }

    /// 加载配置：显式路径优先，否则自动查找，找不到时使用默认配置
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::find_and_load().unwrap_or_default()),
        }
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/rureq/
    pub fn find_and_load() -> Option<Config> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    fn try_load_from_current_dir() -> Option<Config> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<Config> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("rureq").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }

    /// 构建环境集合
    /// env_name: 要激活的环境 (覆盖配置中的 active_environment)
    /// cli_vars: CLI 传入的变量覆盖 (--var key=value)，写入激活的环境
    pub fn build_environments(
        config: &Config,
        env_name: Option<&str>,
        cli_vars: &[(String, String)],
    ) -> Result<EnvironmentSet> {
        let mut set = EnvironmentSet::new();

        // 按名称排序，保证列表顺序稳定
        let mut names: Vec<&String> = config.environments.keys().collect();
        names.sort();

        for name in names {
            let mut env = Environment::new(name.clone());
            for (key, value) in &config.environments[name].variables {
                // 解析系统环境变量 ${VAR}
                env.insert(key.clone(), VariableResolver::resolve_env_vars(value));
            }
            set.upsert(env);
        }

        if let Some(name) = env_name.or(config.active_environment.as_deref()) {
            set.activate(name)?;
        }

        // CLI 覆盖优先级最高；没有激活环境时创建一个临时环境
        if !cli_vars.is_empty() {
            if set.active().is_none() {
                set.upsert(Environment::new("cli"));
                set.activate("cli")?;
            }
            if let Some(env) = set.active_mut() {
                for (key, value) in cli_vars {
                    env.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(set)
    }

    /// 解析 CLI 变量参数 "key=value"
    pub fn parse_cli_var(s: &str) -> Option<(String, String)> {
        s.split_once('=')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
    }
}

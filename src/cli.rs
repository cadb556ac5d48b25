use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Table};

use rureq::collection::Collection;
use rureq::compose::{ApiKeyLocation, AuthConfig, BodyType, KeyValue, RequestDraft};
use rureq::config::{Config, ConfigLoader, Persistence};
use rureq::generator::SnippetLanguage;
use rureq::history::HistoryStorage;
use rureq::history::printer::history_table;
use rureq::http::Method;
use rureq::session::Session;
use rureq::utils::{ResponseFormat, ResponseFormatter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径 (默认自动查找 rureq.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 组装并发送请求
    Send(RequestArgs),
    /// 生成 curl / javascript / python 代码
    Snippet {
        language: SnippetLanguage,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// 查看历史记录
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// 管理请求集合
    Collection {
        #[command(subcommand)]
        command: CollectionCommand,
    },
    /// 查看环境
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },
}

#[derive(Subcommand)]
pub enum CollectionCommand {
    List,
    Create {
        name: String,
    },
    /// 保存请求到集合 (ID 或名称)
    Save {
        collection: String,
        /// 默认为 "<METHOD> Request"
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
    },
    Show {
        collection: String,
    },
}

#[derive(Subcommand)]
pub enum EnvCommand {
    List,
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// [METHOD] URL
    #[arg(num_args = 1..=2, required = true, value_names = ["METHOD", "URL"])]
    pub target: Vec<String>,

    /// 请求头 "Key: Value"
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// 查询参数 "key=value"
    #[arg(short = 'q', long = "query")]
    pub params: Vec<String>,

    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    #[arg(long, default_value_t = BodyType::Json)]
    pub body_type: BodyType,

    #[arg(long, group = "auth")]
    pub bearer: Option<String>,

    /// "user:password"
    #[arg(long, group = "auth")]
    pub basic: Option<String>,

    #[arg(long, group = "auth")]
    pub api_key: Option<String>,

    #[arg(long, default_value = rureq::compose::auth::DEFAULT_API_KEY_HEADER)]
    pub api_key_header: String,

    #[arg(long, default_value_t = ApiKeyLocation::Header)]
    pub api_key_in: ApiKeyLocation,

    #[arg(long, group = "auth")]
    pub oauth2: Option<String>,

    /// 激活的环境
    #[arg(short = 'e', long = "env")]
    pub env: Option<String>,

    /// 变量覆盖 "key=value"
    #[arg(long = "var")]
    pub vars: Vec<String>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl RequestArgs {
    pub fn to_draft(&self) -> Result<RequestDraft> {
        let (method, url) = match self.target.as_slice() {
            [url] => (Method::Get, url.clone()),
            [method, url] => (Method::parse(method)?, url.clone()),
            _ => bail!("expected [METHOD] URL"),
        };

        let mut draft = RequestDraft {
            method,
            url,
            ..RequestDraft::default()
        };

        for header in &self.headers {
            let entry = KeyValue::parse_header(header)
                .ok_or_else(|| anyhow!("invalid header (expected Key: Value): {}", header))?;
            draft.headers.push(entry);
        }
        for param in &self.params {
            let entry = KeyValue::parse_param(param)
                .ok_or_else(|| anyhow!("invalid query parameter (expected key=value): {}", param))?;
            draft.params.push(entry);
        }

        if let Some(body) = &self.body {
            draft.body = body.clone();
        }
        draft.body_type = self.body_type;
        draft.auth = self.auth()?;

        Ok(draft)
    }

    fn auth(&self) -> Result<AuthConfig> {
        let auth = if let Some(token) = &self.bearer {
            AuthConfig::bearer(token)
        } else if let Some(credentials) = &self.basic {
            AuthConfig::parse_basic(credentials)?
        } else if let Some(key) = &self.api_key {
            AuthConfig::api_key(&self.api_key_header, key, self.api_key_in)
        } else if let Some(token) = &self.oauth2 {
            AuthConfig::oauth2(token)
        } else {
            AuthConfig::default()
        };
        Ok(auth)
    }

    fn cli_vars(&self) -> Result<Vec<(String, String)>> {
        self.vars
            .iter()
            .map(|v| {
                ConfigLoader::parse_cli_var(v)
                    .ok_or_else(|| anyhow!("invalid variable (expected key=value): {}", v))
            })
            .collect()
    }

    fn session(&self, config: &Config) -> Result<Session> {
        Ok(Session::from_config(config, self.env.as_deref(), &self.cli_vars()?)?)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Send(request) => send(&config, &request).await,
        Commands::Snippet { language, request } => {
            let session = request.session(&config)?;
            println!("{}", session.snippet(language, &request.to_draft()?));
            Ok(())
        }
        Commands::History { limit } => history(&config, limit),
        Commands::Collection { command } => collection(config, command),
        Commands::Env { command: EnvCommand::List } => env_list(&config),
    }
}

async fn send(config: &Config, request: &RequestArgs) -> Result<()> {
    let mut session = request.session(config)?;
    let draft = request.to_draft()?;

    let record = session.send(&draft).await;

    let format = if request.verbose {
        ResponseFormat::Verbose
    } else {
        ResponseFormat::Compact
    };
    println!("{}", ResponseFormatter::new(format).format(&record));

    if record.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}

fn history(config: &Config, limit: usize) -> Result<()> {
    let settings = &config.settings;
    let storage = HistoryStorage::in_dir(&settings.data_dir(), settings.history_capacity);
    let mut entries = storage.tail(limit)?;

    if entries.is_empty() {
        println!("{}", "No history yet".dimmed());
        return Ok(());
    }

    // 最新的在前
    entries.reverse();
    println!("{}", history_table(&entries));
    Ok(())
}

fn collection(mut config: Config, command: CollectionCommand) -> Result<()> {
    // 集合命令总是读写数据目录
    config.settings.persistence = Persistence::File;
    let mut session = Session::from_config(&config, None, &[])?;

    match command {
        CollectionCommand::List => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["ID", "Name", "Requests"]);
            for collection in session.collections().iter() {
                table.add_row(vec![
                    Cell::new(short_id(&collection.id)),
                    Cell::new(&collection.name).add_attribute(Attribute::Bold),
                    Cell::new(collection.requests.len()),
                ]);
            }
            println!("{}", table);
        }
        CollectionCommand::Create { name } => {
            let id = session.create_collection(&name);
            println!("{} {} ({})", "Created collection".green(), name, id);
        }
        CollectionCommand::Save {
            collection,
            name,
            request,
        } => {
            let id = find_collection(&session, &collection)?.id.clone();
            let draft = request.to_draft()?;
            let request_id = session.save_to_collection(&id, &draft, name.as_deref())?;
            println!("{} {} ({})", "Saved request".green(), request_id, collection);
        }
        CollectionCommand::Show { collection } => {
            let collection = find_collection(&session, &collection)?;
            println!("{}", collection.name.bold());

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["ID", "Name", "Method", "URL", "Saved"]);
            for request in &collection.requests {
                table.add_row(vec![
                    Cell::new(short_id(&request.id)),
                    Cell::new(&request.name),
                    Cell::new(request.method),
                    Cell::new(&request.url).add_attribute(Attribute::Dim),
                    Cell::new(request.saved_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn env_list(config: &Config) -> Result<()> {
    let environments = ConfigLoader::build_environments(config, None, &[])?;
    if environments.is_empty() {
        println!("{}", "No environments configured".dimmed());
        return Ok(());
    }

    for env in environments.iter() {
        if environments.is_active(&env.name) {
            println!("{} {} ({} variables)", "*".green(), env.name.green().bold(), env.len());
        } else {
            println!("  {} ({} variables)", env.name, env.len());
        }
    }
    Ok(())
}

fn find_collection<'a>(session: &'a Session, id_or_name: &str) -> Result<&'a Collection> {
    session
        .collections()
        .find(id_or_name)
        .with_context(|| format!("collection not found: {}", id_or_name))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

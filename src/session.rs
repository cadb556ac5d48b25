use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::collection::store::COLLECTIONS_FILE;
use crate::collection::{Collection, CollectionRequest, CollectionStore};
use crate::compose::{Composer, RequestDraft};
use crate::config::{Config, ConfigLoader, Persistence, Settings};
use crate::generator::{SnippetGenerator, SnippetLanguage};
use crate::history::{History, HistoryEntry, HistoryStorage};
use crate::http::{Client, ComposedRequest, ResponseRecord};
use crate::variable::EnvironmentSet;
use crate::{Result, RureqError};

/// 一次会话：持有环境、历史记录、集合和 HTTP 客户端
///
/// `Persistence::File` 时历史和集合会写入数据目录，写入失败只记录警告；
/// 已有的集合文件无法解析时构造失败。
pub struct Session {
    environments: EnvironmentSet,
    history: History,
    collections: CollectionStore,
    client: Client,
    settings: Settings,
    history_storage: Option<HistoryStorage>,
}

impl Session {
    /// 内存会话，使用默认设置且没有环境
    pub fn new() -> Result<Self> {
        Self::with_settings(Settings::default(), EnvironmentSet::new())
    }

    pub fn from_config(
        config: &Config,
        env_name: Option<&str>,
        cli_vars: &[(String, String)],
    ) -> Result<Self> {
        let environments = ConfigLoader::build_environments(config, env_name, cli_vars)?;
        Self::with_settings(config.settings.clone(), environments)
    }

    pub fn with_settings(settings: Settings, environments: EnvironmentSet) -> Result<Self> {
        let client = Client::with_timeout(settings.timeout())?;
        let capacity = settings.history_capacity;

        let (history, collections, history_storage) = match settings.persistence {
            Persistence::Memory => (History::with_capacity(capacity), CollectionStore::new(), None),
            Persistence::File => {
                let dir = settings.data_dir();
                let storage = HistoryStorage::in_dir(&dir, capacity);

                let history = match storage.tail(capacity) {
                    Ok(entries) => History::restore(capacity, entries),
                    Err(e) => {
                        warn!("Failed to load request history: {}", e);
                        History::with_capacity(capacity)
                    }
                };

                // 集合文件无法读取时直接报错，避免之后的保存覆盖原有内容
                let collections_path = dir.join(COLLECTIONS_FILE);
                let collections = CollectionStore::load_from(&collections_path).map_err(|e| {
                    RureqError::ConfigError(format!(
                        "Failed to load collections from {}: {}",
                        collections_path.display(),
                        e
                    ))
                })?;

                info!(data_dir = %dir.display(), "Using file persistence");
                (history, collections, Some(storage))
            }
        };

        Ok(Self {
            environments,
            history,
            collections,
            client,
            settings,
            history_storage,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn environments(&self) -> &EnvironmentSet {
        &self.environments
    }

    pub fn environments_mut(&mut self) -> &mut EnvironmentSet {
        &mut self.environments
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    /// 使用当前激活的环境组装请求
    pub fn compose(&self, draft: &RequestDraft) -> ComposedRequest {
        Composer::compose(draft, self.environments.active())
    }

    pub fn snippet(&self, language: SnippetLanguage, draft: &RequestDraft) -> String {
        SnippetGenerator::generate(language, &self.compose(draft))
    }

    /// 组装并发送请求
    ///
    /// 收到响应 (任意状态码) 时写入历史；网络层失败不记录。
    pub async fn send(&mut self, draft: &RequestDraft) -> ResponseRecord {
        let request = self.compose(draft);
        let record = self.client.execute(&request).await;

        if let Some(response) = record.response() {
            let entry = HistoryEntry::new(request.method, request.url.clone(), response);
            debug!(id = %entry.id, status = entry.status, "Recording history entry");

            if let Some(storage) = &self.history_storage
                && let Err(e) = storage.append(&entry)
            {
                warn!("Failed to save request history: {}", e);
            }
            self.history.record(entry);
        }

        record
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Some(storage) = &self.history_storage
            && let Err(e) = storage.clear()
        {
            warn!("Failed to clear request history: {}", e);
        }
    }

    pub fn create_collection(&mut self, name: &str) -> String {
        let id = self.collections.create(name);
        self.persist_collections();
        id
    }

    pub fn save_to_collection(
        &mut self,
        collection_id: &str,
        draft: &RequestDraft,
        name: Option<&str>,
    ) -> Result<String> {
        let id = self.collections.save(collection_id, draft, name)?;
        self.persist_collections();
        Ok(id)
    }

    pub fn rename_collection(&mut self, collection_id: &str, name: &str) -> Result<()> {
        self.collections.rename(collection_id, name)?;
        self.persist_collections();
        Ok(())
    }

    pub fn toggle_collection(&mut self, collection_id: &str) -> Result<bool> {
        let expanded = self.collections.toggle_expanded(collection_id)?;
        self.persist_collections();
        Ok(expanded)
    }

    pub fn delete_collection(&mut self, collection_id: &str) -> Result<Collection> {
        let removed = self.collections.remove(collection_id)?;
        self.persist_collections();
        Ok(removed)
    }

    pub fn remove_saved_request(
        &mut self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<CollectionRequest> {
        let removed = self.collections.remove_request(collection_id, request_id)?;
        self.persist_collections();
        Ok(removed)
    }

    /// 将集合中保存的请求加载到草稿 (覆盖)
    pub fn load_request(
        &self,
        draft: &mut RequestDraft,
        collection_id: &str,
        request_id: &str,
    ) -> Result<()> {
        let collection = self
            .collections
            .get(collection_id)
            .ok_or_else(|| RureqError::CollectionNotFound(collection_id.to_string()))?;
        let snapshot = collection
            .get_request(request_id)
            .ok_or_else(|| RureqError::RequestNotFound(request_id.to_string()))?;
        draft.load_request(snapshot);
        Ok(())
    }

    fn collections_path(&self) -> Option<PathBuf> {
        self.history_storage
            .as_ref()
            .map(|_| self.settings.data_dir().join(COLLECTIONS_FILE))
    }

    fn persist_collections(&self) {
        if let Some(path) = self.collections_path()
            && let Err(e) = self.collections.save_to(&path)
        {
            warn!("Failed to save collections: {}", e);
        }
    }
}

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::collection::model::{Collection, CollectionRequest};
use crate::compose::RequestDraft;
use crate::error::RureqError;
use crate::Result;

pub const COLLECTIONS_FILE: &str = "collections.json";

/// 按插入顺序保存的集合列表
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    collections: Vec<Collection>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载；文件不存在时返回空列表
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let collections: Vec<Collection> = serde_json::from_str(&content)?;
        debug!(count = collections.len(), path = %path.display(), "Loaded collections");
        Ok(Self { collections })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.collections)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 新建集合并返回其 ID
    pub fn create(&mut self, name: &str) -> String {
        let collection = Collection::new(name);
        let id = collection.id.clone();
        self.collections.push(collection);
        id
    }

    /// 保存当前草稿的快照，返回快照 ID
    pub fn save(
        &mut self,
        collection_id: &str,
        draft: &RequestDraft,
        name: Option<&str>,
    ) -> Result<String> {
        let collection = self.get_mut(collection_id)?;
        let snapshot = CollectionRequest::snapshot(draft, name);
        let id = snapshot.id.clone();
        collection.requests.push(snapshot);
        Ok(id)
    }

    pub fn get(&self, collection_id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == collection_id)
    }

    fn get_mut(&mut self, collection_id: &str) -> Result<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| RureqError::CollectionNotFound(collection_id.to_string()))
    }

    /// 按 ID 或名称查找 (ID 优先)
    pub fn find(&self, id_or_name: &str) -> Option<&Collection> {
        self.get(id_or_name)
            .or_else(|| self.collections.iter().find(|c| c.name == id_or_name))
    }

    pub fn rename(&mut self, collection_id: &str, name: &str) -> Result<()> {
        self.get_mut(collection_id)?.name = name.to_string();
        Ok(())
    }

    /// 切换展开状态，返回新的状态
    pub fn toggle_expanded(&mut self, collection_id: &str) -> Result<bool> {
        let collection = self.get_mut(collection_id)?;
        collection.expanded = !collection.expanded;
        Ok(collection.expanded)
    }

    pub fn remove(&mut self, collection_id: &str) -> Result<Collection> {
        let index = self
            .collections
            .iter()
            .position(|c| c.id == collection_id)
            .ok_or_else(|| RureqError::CollectionNotFound(collection_id.to_string()))?;
        Ok(self.collections.remove(index))
    }

    pub fn remove_request(
        &mut self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<CollectionRequest> {
        let collection = self.get_mut(collection_id)?;
        let index = collection
            .requests
            .iter()
            .position(|r| r.id == request_id)
            .ok_or_else(|| RureqError::RequestNotFound(request_id.to_string()))?;
        Ok(collection.requests.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

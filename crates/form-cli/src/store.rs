//! Directory-backed template store
//!
//! One pretty-printed JSON document per template, named `<id>.json`.

use async_trait::async_trait;
use chrono::Utc;
use form_engine::{
    FormTemplate, FormsError, TemplateFilter, TemplateId, TemplatePatch, TemplateStatus, TemplateStore,
};
use std::path::{Path, PathBuf};
use tokio::fs;

type Result<T> = form_engine::Result<T>;

fn io_error(path: &Path, e: std::io::Error) -> FormsError {
    FormsError::Store(format!("{}: {}", path.display(), e))
}

pub struct DirTemplateStore {
    root: PathBuf,
}

impl DirTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File of a template. Ids are restricted to `[A-Za-z0-9_-]` so they
    /// cannot name anything outside the store directory.
    fn path_for(&self, id: &TemplateId) -> Result<PathBuf> {
        let raw = id.as_str();
        let safe = !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(FormsError::Store(format!("invalid template id: {:?}", raw)));
        }
        Ok(self.root.join(format!("{}.json", raw)))
    }

    async fn write(&self, template: &FormTemplate) -> Result<()> {
        let id = template
            .id
            .as_ref()
            .ok_or_else(|| FormsError::Store("cannot write a template without an id".into()))?;
        fs::create_dir_all(&self.root).await.map_err(|e| io_error(&self.root, e))?;
        let path = self.path_for(id)?;
        fs::write(&path, template.to_json()?).await.map_err(|e| io_error(&path, e))
    }

    async fn read(&self, id: &TemplateId) -> Result<Option<FormTemplate>> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(FormTemplate::from_json(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[async_trait]
impl TemplateStore for DirTemplateStore {
    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<FormTemplate>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&self.root, e))? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).await.map_err(|e| io_error(&path, e))?;
            match FormTemplate::from_json(&content) {
                Ok(template) if filter.matches(&template) => found.push(template),
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable template"),
            }
        }

        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get(&self, id: &TemplateId) -> Result<Option<FormTemplate>> {
        self.read(id).await
    }

    async fn create(&self, mut template: FormTemplate) -> Result<FormTemplate> {
        let now = Utc::now();
        template.id = Some(TemplateId::generate());
        template.created_at = Some(now);
        template.updated_at = Some(now);
        self.write(&template).await?;
        Ok(template)
    }

    async fn update(&self, id: &TemplateId, patch: TemplatePatch) -> Result<FormTemplate> {
        let mut template = self
            .read(id)
            .await?
            .ok_or_else(|| FormsError::TemplateNotFound(id.to_string()))?;
        patch.apply(&mut template);
        template.updated_at = Some(Utc::now());
        self.write(&template).await?;
        Ok(template)
    }

    async fn duplicate(&self, id: &TemplateId, new_name: &str) -> Result<FormTemplate> {
        let mut copy = self
            .read(id)
            .await?
            .ok_or_else(|| FormsError::TemplateNotFound(id.to_string()))?;
        copy.name = new_name.to_string();
        copy.status = TemplateStatus::Draft;
        self.create(copy).await
    }

    async fn delete(&self, id: &TemplateId) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FormsError::TemplateNotFound(id.to_string())),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{BuilderSession, FieldType};

    #[tokio::test]
    async fn test_save_list_duplicate_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path().join("templates"));

        let mut session = BuilderSession::new("Wake-up Call");
        session.add_field(FieldType::Time).unwrap();
        let saved = session.save(&store).await.unwrap();
        let id = saved.id.clone().unwrap();

        let copy = store.duplicate(&id, "Wake-up Call (VIP)").await.unwrap();
        let all = store.list(&TemplateFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Wake-up Call");

        let loaded = store.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.fields, saved.fields);

        store.delete(copy.id.as_ref().unwrap()).await.unwrap();
        assert_eq!(store.list(&TemplateFilter::default()).await.unwrap().len(), 1);
        assert!(store.delete(copy.id.as_ref().unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_ids_cannot_leave_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("victim.json");
        std::fs::write(&outside, "{}").unwrap();
        let store = DirTemplateStore::new(dir.path().join("templates"));

        for raw in ["../victim", "", "a/b", "..\\victim", ".hidden"] {
            let id = TemplateId::from_string(raw);
            assert!(matches!(store.delete(&id).await, Err(FormsError::Store(_))), "{:?}", raw);
            assert!(matches!(store.get(&id).await, Err(FormsError::Store(_))), "{:?}", raw);
        }
        assert!(outside.exists());

        let escape = TemplateId::from_string("../victim");
        assert!(store.update(&escape, TemplatePatch::default()).await.is_err());
        assert_eq!(std::fs::read_to_string(&outside).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path().join("nothing-here"));
        assert!(store.list(&TemplateFilter::default()).await.unwrap().is_empty());
    }
}

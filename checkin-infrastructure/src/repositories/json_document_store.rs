use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::warn;

use checkin_domain::{is_safe_identifier, Event, Ticket, TicketStore};

const EVENTS_DIR: &str = "events";
const META_DIR: &str = "events_meta";
const TICKETS_DIR: &str = "tickets";

/// Document store on the local filesystem.
///
/// ```text
/// <root>/events_meta/<event>.json
/// <root>/events/<event>/tickets/<ticket>.json
/// ```
///
/// Each document is written to a temporary sibling and renamed into place.
pub struct JsonDocumentStore {
    root: PathBuf,
}

impl JsonDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_layout(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.root.join(EVENTS_DIR)).await?;
        fs::create_dir_all(self.root.join(META_DIR)).await?;
        Ok(())
    }

    fn event_dir(&self, event_id: &str) -> anyhow::Result<PathBuf> {
        ensure_safe("event id", event_id)?;
        Ok(self.root.join(EVENTS_DIR).join(event_id))
    }

    fn tickets_dir(&self, event_id: &str) -> anyhow::Result<PathBuf> {
        Ok(self.event_dir(event_id)?.join(TICKETS_DIR))
    }

    fn ticket_path(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<PathBuf> {
        ensure_safe("ticket id", ticket_id)?;
        Ok(self.tickets_dir(event_id)?.join(format!("{}.json", ticket_id)))
    }

    fn meta_path(&self, event_id: &str) -> anyhow::Result<PathBuf> {
        ensure_safe("event id", event_id)?;
        Ok(self.root.join(META_DIR).join(format!("{}.json", event_id)))
    }
}

#[async_trait]
impl TicketStore for JsonDocumentStore {
    async fn get_all_tickets(&self, event_id: &str) -> anyhow::Result<Vec<Ticket>> {
        let dir = self.tickets_dir(event_id)?;
        let mut tickets = Vec::new();
        for path in list_json_files(&dir).await? {
            match read_document::<Ticket>(&path).await {
                Ok(Some(ticket)) => tickets.push(ticket),
                Ok(None) => {}
                Err(err) => warn!("skipping unreadable ticket {}: {:#}", path.display(), err),
            }
        }
        Ok(tickets)
    }

    async fn get_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<Option<Ticket>> {
        read_document(&self.ticket_path(event_id, ticket_id)?).await
    }

    async fn set_ticket(&self, event_id: &str, ticket: &Ticket) -> anyhow::Result<()> {
        write_document(&self.ticket_path(event_id, &ticket.id)?, ticket).await
    }

    async fn delete_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<()> {
        remove_file_if_exists(&self.ticket_path(event_id, ticket_id)?).await
    }

    async fn batch_delete_tickets(&self, event_id: &str) -> anyhow::Result<usize> {
        let dir = self.tickets_dir(event_id)?;
        let files = list_json_files(&dir).await?;
        let total = files.len();
        let mut failed = 0;
        for path in files {
            if let Err(err) = remove_file_if_exists(&path).await {
                failed += 1;
                warn!("failed to delete ticket {}: {:#}", path.display(), err);
            }
        }
        if failed > 0 {
            return Err(anyhow!(
                "deleted {} of {} tickets for event {}",
                total - failed,
                total,
                event_id
            ));
        }
        Ok(total)
    }

    async fn delete_event_document(&self, event_id: &str) -> anyhow::Result<()> {
        let dir = self.event_dir(event_id)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", dir.display())),
        }
    }

    async fn get_event_meta(&self, event_id: &str) -> anyhow::Result<Option<Event>> {
        read_document(&self.meta_path(event_id)?).await
    }

    async fn set_event_meta(&self, event: &Event) -> anyhow::Result<()> {
        write_document(&self.meta_path(&event.id)?, event).await?;
        fs::create_dir_all(self.event_dir(&event.id)?).await?;
        Ok(())
    }

    async fn delete_event_meta(&self, event_id: &str) -> anyhow::Result<()> {
        remove_file_if_exists(&self.meta_path(event_id)?).await
    }

    async fn list_event_meta(&self) -> anyhow::Result<Vec<Event>> {
        let mut events = Vec::new();
        for path in list_json_files(&self.root.join(META_DIR)).await? {
            if let Some(event) = read_document::<Event>(&path).await? {
                events.push(event);
            }
        }
        Ok(events)
    }

    async fn list_event_ids(&self) -> anyhow::Result<Vec<String>> {
        let dir = self.root.join(EVENTS_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_safe_identifier(name) {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let metadata = fs::metadata(&self.root)
            .await
            .with_context(|| format!("data dir {} is not accessible", self.root.display()))?;
        if !metadata.is_dir() {
            return Err(anyhow!("data dir {} is not a directory", self.root.display()));
        }
        Ok(())
    }
}

fn ensure_safe(label: &str, value: &str) -> anyhow::Result<()> {
    if !is_safe_identifier(value) {
        return Err(anyhow!("refusing unsafe {} '{}'", label, value));
    }
    Ok(())
}

async fn list_json_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("reading {}", dir.display())),
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
    };
    let document = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(document))
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let content = serde_json::to_string_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}

async fn remove_file_if_exists(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
    }
}

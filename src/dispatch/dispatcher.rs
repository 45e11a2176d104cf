use super::render;
use super::resolve::resolve_target;
use crate::capabilities::{
    CodeEdit, DownloadedProjectRecord, EditorSurface, ProjectStore, RepositoryDownload, RepositorySearch,
};
use crate::config::ConfigProvider;
use crate::intent::{IntentKind, IntentService, StructuredIntent};
use crate::outputs::{ChatMessage, MessageSink};
use crate::session::SessionState;
use std::sync::Arc;
use tracing::{info, warn};

/// The external capabilities the action handlers talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub search: Arc<dyn RepositorySearch>,
    pub download: Arc<dyn RepositoryDownload>,
    pub projects: Arc<dyn ProjectStore>,
    pub code: Arc<dyn CodeEdit>,
    pub editor: Arc<dyn EditorSurface>,
}

/// Routes a classified intent to its handler. Owns the session state, so
/// turns must be dispatched one at a time.
///
/// Every handler ends in an assistant message: collaborator failures and
/// unmet preconditions are rendered, never returned as errors.
pub struct Dispatcher {
    collaborators: Collaborators,
    intents: IntentService,
    config: Arc<dyn ConfigProvider>,
    session: SessionState,
}

impl Dispatcher {
    pub fn new(collaborators: Collaborators, intents: IntentService, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            collaborators,
            intents,
            config,
            session: SessionState::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub async fn dispatch(&mut self, intent: &StructuredIntent, progress: Option<&dyn MessageSink>) -> ChatMessage {
        info!("Dispatching {} ({:.2})", intent.kind, intent.confidence);
        let reply = match intent.kind {
            IntentKind::Search => self.handle_search(intent).await,
            IntentKind::Download => self.handle_download(intent, progress).await,
            IntentKind::Modify => self.handle_modify(intent, progress).await,
            IntentKind::Explain => self.handle_explain(progress).await,
            IntentKind::Open => self.handle_open(intent).await,
            IntentKind::List => self.handle_list().await,
            IntentKind::Help | IntentKind::Chat => self.intents.generate_response(intent.kind, Some(intent)).await,
        };
        ChatMessage::assistant(reply)
    }

    async fn handle_search(&mut self, intent: &StructuredIntent) -> String {
        let query = intent.search_query();
        let result = match self.collaborators.search.search(query).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search for {:?} failed: {}", query, e);
                return render::failure("Search", e);
            }
        };
        info!("Search {:?} returned {} of {} hits", result.query, result.repositories.len(), result.total_count);

        let text = if result.repositories.is_empty() {
            render::NO_RESULTS.to_string()
        } else {
            render::search_results(&result)
        };
        self.session.record_search(result.repositories);
        text
    }

    async fn handle_download(&mut self, intent: &StructuredIntent, progress: Option<&dyn MessageSink>) -> String {
        if !self.session.has_results() {
            return render::SEARCH_FIRST.to_string();
        }

        let Some(repo) = resolve_target(intent.project_reference(), self.session.last_search_results()).cloned()
        else {
            return render::NO_MATCH.to_string();
        };

        emit(progress, render::downloading(&repo.full_name));
        let destination = self.config.settings().download_dir().join(&repo.full_name);

        if let Err(e) = self.collaborators.download.clone_repository(&repo.clone_url, &destination).await {
            warn!("Clone of {} failed: {}", repo.full_name, e);
            return render::failure("Download", e);
        }

        let record = DownloadedProjectRecord::from_repository(&repo, destination);
        let text = render::downloaded(&record);
        if let Err(e) = self.collaborators.projects.upsert(record).await {
            warn!("Saving project record for {} failed: {}", repo.full_name, e);
            return render::failure("Saving the project list", e);
        }
        text
    }

    async fn handle_modify(&self, intent: &StructuredIntent, progress: Option<&dyn MessageSink>) -> String {
        let Some(path) = self.collaborators.editor.active_file() else {
            return render::OPEN_FILE_FIRST.to_string();
        };

        emit(progress, render::MODIFYING);
        let modified = match self.collaborators.code.modify(&path, intent.instruction()).await {
            Ok(code) => code,
            Err(e) => return render::failure("Modification", e),
        };

        match self.collaborators.editor.replace_contents(&path, &modified).await {
            Ok(()) => {
                info!("Applied modification to {}", path.display());
                render::MODIFIED.to_string()
            }
            Err(e) => render::failure("Applying the change", e),
        }
    }

    async fn handle_explain(&self, progress: Option<&dyn MessageSink>) -> String {
        let Some(path) = self.collaborators.editor.active_file() else {
            return render::OPEN_FILE_FIRST.to_string();
        };

        emit(progress, render::EXPLAINING);
        match self.collaborators.code.explain(&path).await {
            Ok(text) => render::explanation(&text),
            Err(e) => render::failure("Explanation", e),
        }
    }

    async fn handle_open(&self, intent: &StructuredIntent) -> String {
        let projects = match self.collaborators.projects.list_all().await {
            Ok(projects) => projects,
            Err(e) => return render::failure("Reading the project list", e),
        };

        let wanted = intent.parameters.project_name.as_deref().unwrap_or("").to_lowercase();
        let Some(project) = projects
            .iter()
            .find(|p| p.full_name.to_lowercase().contains(&wanted))
            .or_else(|| projects.first())
        else {
            return render::NO_PROJECTS.to_string();
        };

        match self.collaborators.editor.open_project(&project.local_path).await {
            Ok(()) => render::opened(&project.full_name),
            Err(e) => render::failure("Opening the project", e),
        }
    }

    async fn handle_list(&self) -> String {
        match self.collaborators.projects.list_all().await {
            Ok(projects) if projects.is_empty() => render::NO_PROJECTS.to_string(),
            Ok(projects) => render::project_list(&projects),
            Err(e) => render::failure("Reading the project list", e),
        }
    }
}

fn emit(progress: Option<&dyn MessageSink>, text: impl Into<String>) {
    if let Some(sink) = progress {
        sink.emit(ChatMessage::loading(text));
    }
}

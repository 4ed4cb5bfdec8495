//! Top-level session: owns the place store, the map and the clients, and
//! turns user commands into operations on them.

mod controls;
mod status;

pub use controls::{BusyGuard, Controls};
pub use status::{
    StatusKind, StatusLine, StatusMessage, RESULT_DISMISS, SAVE_SUCCESS_DISMISS,
    VALIDATION_DISMISS,
};

use anyhow::Context;
use rand::Rng;
use tracing::info;

use crate::config::Config;
use crate::error::{Control, Error, InputError, PersistError, QuizError, Result};
use crate::geocoder::{GeocodingClient, Progress};
use crate::input::parse_place_names;
use crate::persistence::{list_id_from_url, ListClient, SavedList};
use crate::quiz::{Answer, QuizEngine, QuizQuestion};
use crate::render::{MapRenderer, MarkerId};
use crate::store::PlaceStore;

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Geocode newline-separated names, replacing the current list
    Find(String),
    Clear,
    Save { name: String },
    Load { id: String },
    /// Open a shared URL; loads the list if it carries a list id
    Open { url: String },
    ToggleLabel(MarkerId),
    EnterQuiz,
    Answer(usize),
    NextQuestion,
    ExitQuiz,
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found { found: usize, total: usize },
    Cleared,
    Saved(SavedList),
    Loaded { name: String, count: usize },
    /// The URL had no list id
    NothingToOpen,
    Label { id: MarkerId, visible: bool },
    Question(QuizQuestion),
    Answered(Answer),
    QuizExited,
}

pub struct Session<M, R> {
    store: PlaceStore,
    renderer: M,
    geocoder: GeocodingClient,
    lists: ListClient,
    quiz: QuizEngine<R>,
    controls: Controls,
    status: StatusLine,
    save_status: StatusLine,
}

impl<M: MapRenderer, R: Rng> Session<M, R> {
    pub fn new(config: &Config, renderer: M, rng: R) -> anyhow::Result<Self> {
        let geocoder =
            GeocodingClient::new(&config.geocoder).context("Failed to set up geocoder")?;
        let lists = ListClient::new(&config.storage).context("Failed to set up list storage")?;
        Ok(Self::with_clients(geocoder, lists, renderer, rng))
    }

    pub fn with_clients(geocoder: GeocodingClient, lists: ListClient, renderer: M, rng: R) -> Self {
        Self {
            store: PlaceStore::new(),
            renderer,
            geocoder,
            lists,
            quiz: QuizEngine::new(rng),
            controls: Controls::default(),
            status: StatusLine::default(),
            save_status: StatusLine::default(),
        }
    }

    pub fn store(&self) -> &PlaceStore {
        &self.store
    }

    pub fn renderer(&self) -> &M {
        &self.renderer
    }

    pub fn quiz(&self) -> &QuizEngine<R> {
        &self.quiz
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn save_status(&self) -> Option<&StatusMessage> {
        self.save_status.current()
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.controls.is_enabled(control)
    }

    pub fn list_client(&self) -> &ListClient {
        &self.lists
    }

    /// Run one command to completion.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Find(text) => self.find(&text, |_| {}).await,
            Command::Clear => Ok(self.clear()),
            Command::Save { name } => self.save(&name).await,
            Command::Load { id } => self.load(&id).await,
            Command::Open { url } => self.open(&url).await,
            Command::ToggleLabel(id) => self.toggle_label(id),
            Command::EnterQuiz => self.enter_quiz(),
            Command::Answer(option) => self.answer(option),
            Command::NextQuestion => self.next_question(),
            Command::ExitQuiz => Ok(self.exit_quiz()),
        }
    }

    /// Geocode the names in `text`, replacing whatever was shown before.
    ///
    /// Markers appear as each name resolves. `on_progress` sees the same
    /// events the status line is built from.
    pub async fn find<F>(&mut self, text: &str, on_progress: F) -> Result<Outcome>
    where
        F: FnMut(Progress<'_>),
    {
        let result = self.run_find(text, on_progress).await;
        self.report(&result);
        result
    }

    async fn run_find<F>(&mut self, text: &str, mut on_progress: F) -> Result<Outcome>
    where
        F: FnMut(Progress<'_>),
    {
        let names = parse_place_names(text)?;
        let _busy = self.controls.acquire(Control::Find)?;

        self.quiz.exit(&mut self.renderer);
        self.store.clear(&mut self.renderer);

        let base = self.store.next_id().0;
        let renderer = &mut self.renderer;
        let status = &mut self.status;
        let records = self
            .geocoder
            .resolve_all(&names, |progress| {
                match &progress {
                    Progress::Started { index, total, name } => status.show(
                        format!("Geocoding {} of {}: {}", index + 1, total, name),
                        StatusKind::Loading,
                        None,
                    ),
                    Progress::Resolved { index, record, .. } => {
                        renderer.add_marker(MarkerId(base + index), record)
                    }
                }
                on_progress(progress);
            })
            .await;

        self.store.append(records);
        self.renderer.fit_bounds(&self.store.found_points());

        let found = self.store.found_count();
        let total = self.store.len();
        let kind = if found == total {
            StatusKind::Success
        } else {
            StatusKind::Error
        };
        self.status.show(
            format!("Geocoding complete: {}", self.store.summary()),
            kind,
            Some(RESULT_DISMISS),
        );

        Ok(Outcome::Found { found, total })
    }

    /// Drop every record and marker. Safe to call repeatedly.
    pub fn clear(&mut self) -> Outcome {
        self.quiz.exit(&mut self.renderer);
        self.store.clear(&mut self.renderer);
        self.status.hide();
        Outcome::Cleared
    }

    /// Save the found places under `name`.
    pub async fn save(&mut self, name: &str) -> Result<Outcome> {
        let result = self.run_save(name).await;
        self.report_on(Line::Save, &result);
        result
    }

    async fn run_save(&mut self, name: &str) -> Result<Outcome> {
        let _busy = self.controls.acquire(Control::Save)?;
        let found = self.store.found_subset();
        let saved = self.lists.save(name, &found).await?;

        self.save_status.show(
            format!(
                "List \"{}\" saved with {} places. URL: {}",
                name.trim(),
                saved.count,
                saved.share_url
            ),
            StatusKind::Success,
            Some(SAVE_SUCCESS_DISMISS),
        );
        Ok(Outcome::Saved(saved))
    }

    /// Replace the current list with a stored one.
    ///
    /// The store is only touched once the list has been fetched and decoded.
    pub async fn load(&mut self, id: &str) -> Result<Outcome> {
        let result = self.run_load(id).await;
        self.report(&result);
        result
    }

    async fn run_load(&mut self, id: &str) -> Result<Outcome> {
        let _busy = self.controls.acquire(Control::Load)?;
        self.status.show("Loading list...", StatusKind::Loading, None);

        let payload = self.lists.load(id).await?;
        let name = payload.display_name().to_string();

        self.quiz.exit(&mut self.renderer);
        self.store.clear(&mut self.renderer);

        let base = self.store.next_id().0;
        let records = payload.into_records();
        for (index, record) in records.iter().enumerate() {
            self.renderer.add_marker(MarkerId(base + index), record);
        }
        let count = records.len();
        self.store.append(records);
        self.renderer.fit_bounds(&self.store.found_points());

        info!("List '{}' loaded with {} places", name, count);
        self.status.show(
            format!("List \"{}\" loaded with {} places", name, count),
            StatusKind::Success,
            Some(RESULT_DISMISS),
        );
        Ok(Outcome::Loaded { name, count })
    }

    /// Load the list referenced by a shared URL, if any.
    pub async fn open(&mut self, url: &str) -> Result<Outcome> {
        match list_id_from_url(url, self.lists.share_param()) {
            Some(id) => self.load(&id).await,
            None => Ok(Outcome::NothingToOpen),
        }
    }

    /// Show or hide a marker's name. Refused in quiz mode, where the
    /// label would give the answer away.
    pub fn toggle_label(&mut self, id: MarkerId) -> Result<Outcome> {
        if self.quiz.is_active() {
            return Err(QuizError::LabelsHidden.into());
        }
        if !self.store.get(id).is_some_and(|r| r.is_found()) {
            return Err(Error::NoSuchMarker(id.0));
        }
        let visible = self.renderer.toggle_label(id);
        Ok(Outcome::Label { id, visible })
    }

    pub fn enter_quiz(&mut self) -> Result<Outcome> {
        let found = self.store.found_entries();
        let result = self
            .quiz
            .enter(&found, &mut self.renderer)
            .map(|q| Outcome::Question(q.clone()))
            .map_err(Error::from);
        self.report(&result);
        result
    }

    pub fn answer(&mut self, option: usize) -> Result<Outcome> {
        let result = self
            .quiz
            .answer(option)
            .map(|a| Outcome::Answered(a.clone()))
            .map_err(Error::from);
        self.report(&result);
        result
    }

    pub fn next_question(&mut self) -> Result<Outcome> {
        let found = self.store.found_entries();
        let result = self
            .quiz
            .next_round(&found, &mut self.renderer)
            .map(|q| Outcome::Question(q.clone()))
            .map_err(Error::from);
        self.report(&result);
        result
    }

    pub fn exit_quiz(&mut self) -> Outcome {
        self.quiz.exit(&mut self.renderer);
        Outcome::QuizExited
    }

    /// Surface a failed operation as a transient status message.
    fn report<T>(&mut self, result: &Result<T>) {
        self.report_on(Line::Main, result);
    }

    fn report_on<T>(&mut self, line: Line, result: &Result<T>) {
        let Err(err) = result else {
            return;
        };
        let dismiss = match err {
            Error::Input(InputError::EmptyInput)
            | Error::Persist(PersistError::EmptyListName | PersistError::NothingToSave) => {
                VALIDATION_DISMISS
            }
            _ => RESULT_DISMISS,
        };
        let line = match line {
            Line::Main => &mut self.status,
            Line::Save => &mut self.save_status,
        };
        line.show(err.to_string(), StatusKind::Error, Some(dismiss));
    }
}

/// Which status slot an operation reports to
#[derive(Debug, Clone, Copy)]
enum Line {
    Main,
    Save,
}

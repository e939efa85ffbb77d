//! Scripted replay of shopper sessions.
//!
//! A [`Script`] is a JSON list of timestamped steps. [`Replay`] feeds them to
//! [`handle_event`] and plays the runtime's part: it runs worker messages on
//! a [`StorefrontWorker`], delivers wake-ups when scripted time passes them,
//! and records navigations. Worker messages can be held back and released
//! out of order to reproduce slow or overtaken responses.
//!
//! # Script Format
//!
//! ```json
//! {
//!   "steps": [
//!     { "at_ms": 0,   "type": "start" },
//!     { "at_ms": 10,  "type": "ui", "action": { "type": "open", "value": "search" } },
//!     { "at_ms": 20,  "type": "type", "term": "dress" },
//!     { "at_ms": 400, "type": "wait" },
//!     { "at_ms": 500, "type": "cart_edit", "line_id": "l1", "control": "increment" }
//!   ]
//! }
//! ```

use crate::app::{handle_event, Action, AppState, Event, LineControl};
use crate::client::CatalogClient;
use crate::domain::error::{Result, StorefrontError};
use crate::domain::{HitKind, LineId};
use crate::i18n::Translations;
use crate::store::UiAction;
use crate::ui;
use crate::worker::{StorefrontWorker, WorkerMessage};
use futures_executor::block_on;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepInput {
    Start,
    /// Sets the search input's value.
    Type { term: String },
    Submit,
    /// Only lets time pass.
    Wait,
    SelectHit { kind: HitKind, handle: String },
    SelectSuggestion { text: String },
    Escape,
    Ui { action: UiAction },
    CartEdit { line_id: String, control: LineControl },
    DismissCartErrors,
    LoadCart,
    /// Simulates losing or regaining the network.
    SetOffline { offline: bool },
    /// Queues worker messages instead of running them.
    Hold,
    /// Runs held messages, newest first when `reverse` is set.
    Release {
        #[serde(default)]
        reverse: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds since the start of the script.
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: StepInput,
}

impl Step {
    /// The coordinator event for this step, if it is one.
    #[must_use]
    pub fn to_event(&self, now: Instant) -> Option<Event> {
        let event = match &self.input {
            StepInput::Start => Event::Started { now },
            StepInput::Type { term } => Event::SearchInput { term: term.clone(), now },
            StepInput::Submit => Event::SubmitSearch,
            StepInput::SelectHit { kind, handle } => Event::SelectSearchHit {
                kind: *kind,
                handle: handle.clone(),
            },
            StepInput::SelectSuggestion { text } => Event::SelectSuggestion { text: text.clone(), now },
            StepInput::Escape => Event::Escape,
            StepInput::Ui { action } => Event::Ui {
                action: action.clone(),
                now,
            },
            StepInput::CartEdit { line_id, control } => Event::CartEdit {
                line_id: LineId::new(line_id.as_str()),
                control: *control,
                now,
            },
            StepInput::DismissCartErrors => Event::DismissCartErrors,
            StepInput::LoadCart => Event::LoadCart,
            StepInput::Wait | StepInput::SetOffline { .. } | StepInput::Hold | StepInput::Release { .. } => {
                return None
            }
        };
        Some(event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Loads a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] if the text is not a valid script.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| StorefrontError::Config(format!("invalid script: {e}")))
    }
}

/// Runtime driving the coordinator from a script.
pub struct Replay<'a> {
    state: AppState,
    worker: StorefrontWorker<&'a CatalogClient>,
    client: &'a CatalogClient,
    locale: Translations,
    origin: Instant,
    wake: Option<Instant>,
    holding: bool,
    held: Vec<WorkerMessage>,
    scroll_locked: bool,
    navigations: Vec<String>,
}

impl<'a> Replay<'a> {
    #[must_use]
    pub fn new(
        state: AppState,
        worker: StorefrontWorker<&'a CatalogClient>,
        client: &'a CatalogClient,
        locale: Translations,
        origin: Instant,
    ) -> Self {
        Self {
            state,
            worker,
            client,
            locale,
            origin,
            wake: None,
            holding: false,
            held: Vec::new(),
            scroll_locked: false,
            navigations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Paths navigated to so far.
    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Renders the current view.
    #[must_use]
    pub fn render(&self) -> String {
        ui::render(&self.state.compute_viewmodel(&self.locale))
    }

    /// Runs every step and returns one rendered frame per step.
    ///
    /// # Errors
    ///
    /// Stops at the first step the coordinator fails on.
    pub fn run(&mut self, script: &Script) -> Result<Vec<String>> {
        script
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                self.run_step(step)?;
                Ok(format!("── step {} @ {}ms: {:?}\n{}", index + 1, step.at_ms, step.input, self.render()))
            })
            .collect()
    }

    /// Advances scripted time to the step, then applies it.
    ///
    /// Returns whether anything visible changed.
    ///
    /// # Errors
    ///
    /// Propagates coordinator errors.
    pub fn run_step(&mut self, step: &Step) -> Result<bool> {
        let _span = tracing::debug_span!("replay_step", at_ms = step.at_ms).entered();
        let now = self.origin + Duration::from_millis(step.at_ms);

        let mut render = self.advance_to(now)?;

        match &step.input {
            StepInput::SetOffline { offline } => {
                self.client.set_offline(*offline);
            }
            StepInput::Hold => self.holding = true,
            StepInput::Release { reverse } => {
                self.holding = false;
                let mut held = std::mem::take(&mut self.held);
                if *reverse {
                    held.reverse();
                }
                for message in held {
                    render |= self.deliver(message)?;
                }
            }
            _ => {
                if let Some(event) = step.to_event(now) {
                    render |= self.apply(&event)?;
                }
            }
        }

        Ok(render)
    }

    /// Delivers every wake-up due at or before `now`.
    fn advance_to(&mut self, now: Instant) -> Result<bool> {
        let mut render = false;
        while let Some(at) = self.wake.filter(|at| *at <= now) {
            self.wake = None;
            render |= self.apply(&Event::Tick { now: at })?;
        }
        Ok(render)
    }

    fn deliver(&mut self, message: WorkerMessage) -> Result<bool> {
        let response = block_on(self.worker.handle_message(message));
        self.apply(&Event::WorkerResponse(response))
    }

    /// Handles an event and runs the resulting actions to completion.
    fn apply(&mut self, event: &Event) -> Result<bool> {
        let (mut render, actions) = handle_event(&mut self.state, event)?;
        let mut queue: VecDeque<Action> = actions.into();

        while let Some(action) = queue.pop_front() {
            match action {
                Action::PostToWorker(message) if self.holding => {
                    tracing::debug!(message_type = message.kind(), "holding worker message");
                    self.held.push(message);
                }
                Action::PostToWorker(message) => {
                    let response = block_on(self.worker.handle_message(message));
                    let (changed, more) = handle_event(&mut self.state, &Event::WorkerResponse(response))?;
                    render |= changed;
                    queue.extend(more);
                }
                Action::Navigate { path } => {
                    tracing::debug!(path = %path, "navigating");
                    self.navigations.push(path);
                }
                Action::ScheduleWake { at } => self.wake = Some(at),
                Action::SetScrollLock(locked) => self.scroll_locked = locked,
            }
        }

        Ok(render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Settings;

    #[test]
    fn parses_steps() {
        let script = Script::from_json_str(
            r#"{"steps": [
                {"at_ms": 0, "type": "start"},
                {"at_ms": 5, "type": "ui", "action": {"type": "open", "value": "cart"}},
                {"at_ms": 9, "type": "cart_edit", "line_id": "l1", "control": {"set_quantity": 3}},
                {"at_ms": 12, "type": "release", "reverse": true}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[2].input,
            StepInput::CartEdit {
                line_id: "l1".into(),
                control: LineControl::SetQuantity(3)
            }
        );
        assert_eq!(script.steps[3].input, StepInput::Release { reverse: true });
    }

    #[test]
    fn rejects_unknown_step() {
        assert!(matches!(
            Script::from_json_str(r#"{"steps": [{"at_ms": 0, "type": "dance"}]}"#),
            Err(StorefrontError::Config(_))
        ));
    }

    #[test]
    fn escape_unlocks_scroll() {
        let client = CatalogClient::new(crate::client::Catalog::default());
        let mut replay = Replay::new(
            AppState::new(Settings::default()),
            StorefrontWorker::new(&client),
            &client,
            Translations::default(),
            Instant::now(),
        );

        let open = Step {
            at_ms: 0,
            input: StepInput::Ui {
                action: UiAction::Toggle(crate::store::Overlay::Menu),
            },
        };
        replay.run_step(&open).unwrap();
        assert!(replay.scroll_locked());

        replay.run_step(&Step { at_ms: 10, input: StepInput::Escape }).unwrap();
        assert!(!replay.scroll_locked());
    }
}

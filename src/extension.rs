//! The reading-time extension and its lifecycle.
//!
//! Everything the extension hooks into the host (the refresh interval, the
//! status item and the settings tab) is recorded as a [`Registration`] when
//! it is created, and `stop` releases the whole list so nothing outlives it.

use std::time::Instant;

use crate::document::ActiveDocument;
use crate::error::Error;
use crate::estimator::WordCounter;
use crate::refresher::{Refresher, TickOutcome, REFRESH_INTERVAL};
use crate::runtime::{IntervalId, Scheduler};
use crate::settings::{Settings, SettingsStore};
use crate::settings_form::{parse_wpm, SettingsForm, WpmInputError};
use crate::status::StatusItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Interval(IntervalId),
    StatusItem,
    SettingsTab,
}

/// An edit made to the wpm text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Backspace,
    Clear,
}

/// What happened to the settings after a form interaction
#[derive(Debug)]
pub enum SettingsChange {
    Saved(Settings),
    Rejected(WpmInputError),
    /// The value was applied but could not be persisted
    SaveFailed(Settings, Error),
}

pub struct Extension {
    store: Box<dyn SettingsStore>,
    settings: Settings,
    refresher: Refresher,
    status: Option<StatusItem>,
    settings_tab: Option<SettingsForm>,
    refresh_interval: Option<IntervalId>,
    registrations: Vec<Registration>,
}

impl Extension {
    pub fn new(store: Box<dyn SettingsStore>, counter: WordCounter) -> Self {
        Self {
            store,
            settings: Settings::default(),
            refresher: Refresher::new(counter),
            status: None,
            settings_tab: None,
            refresh_interval: None,
            registrations: Vec::new(),
        }
    }

    pub fn is_started(&self) -> bool {
        !self.registrations.is_empty()
    }

    /// Load settings and register the status item, refresh interval and settings tab.
    /// Calling it on a started extension does nothing.
    pub fn start(&mut self, scheduler: &mut Scheduler, now: Instant) {
        if self.is_started() {
            return;
        }
        self.settings = self.store.load_or_default();

        self.status = Some(StatusItem::default());
        self.registrations.push(Registration::StatusItem);

        let id = scheduler.register(REFRESH_INTERVAL, now);
        self.refresh_interval = Some(id);
        self.registrations.push(Registration::Interval(id));

        self.settings_tab = Some(SettingsForm::new(&self.settings));
        self.registrations.push(Registration::SettingsTab);

        tracing::info!(
            wpm = self.settings.wpm,
            counter = %self.refresher.counter(),
            "read time extension started"
        );
    }

    /// Release every registration, most recent first
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        while let Some(reg) = self.registrations.pop() {
            match reg {
                Registration::Interval(id) => {
                    scheduler.cancel(id);
                    self.refresh_interval = None;
                }
                Registration::StatusItem => self.status = None,
                Registration::SettingsTab => self.settings_tab = None,
            }
        }
        tracing::info!("read time extension stopped");
    }

    /// Handle a fired interval. Returns `None` if the interval isn't ours.
    pub fn on_interval(
        &mut self,
        id: IntervalId,
        doc: Option<&dyn ActiveDocument>,
    ) -> Option<TickOutcome> {
        if self.refresh_interval != Some(id) {
            return None;
        }
        let status = self.status.as_mut()?;
        Some(self.refresher.tick(doc, self.settings.wpm, status))
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(StatusItem::text)
    }

    pub fn settings_tab(&self) -> Option<&SettingsForm> {
        self.settings_tab.as_ref()
    }

    /// Apply an edit to the wpm field, validating and persisting the new value.
    /// `None` when the settings tab isn't registered.
    pub fn edit_wpm_field(&mut self, edit: FieldEdit) -> Option<SettingsChange> {
        let form = self.settings_tab.as_mut()?;
        let value = match edit {
            FieldEdit::Insert(c) => form.push(c),
            FieldEdit::Backspace => form.pop(),
            FieldEdit::Clear => form.clear(),
        };
        let change = match parse_wpm(value) {
            Ok(wpm) => {
                self.settings.wpm = wpm;
                self.persist()
            }
            Err(e) => {
                tracing::debug!(input = %value, "rejected wpm input: {e}");
                SettingsChange::Rejected(e)
            }
        };
        Some(change)
    }

    /// Restore the default reading speed and re-render the field
    pub fn reset_settings(&mut self) -> Option<SettingsChange> {
        let form = self.settings_tab.as_mut()?;
        self.settings = Settings::default();
        form.display(&self.settings);
        Some(self.persist())
    }

    fn persist(&mut self) -> SettingsChange {
        match self.store.save(&self.settings) {
            Ok(()) => SettingsChange::Saved(self.settings),
            Err(e) => {
                tracing::warn!("Failed to save settings: {e}");
                SettingsChange::SaveFailed(self.settings, e)
            }
        }
    }
}

//! The state behind the student form.
//!
//! [`StudentController`] owns what the user is looking at: which record is
//! current, whether it is being created, edited or viewed, any field errors
//! and the single error banner. Submission runs validation first, then talks
//! to the API when it is reachable and keeps the data locally when it is not.

use crate::{
    client::{
        ClientConfig,
        api::{ClientError, StudentApi},
        probe::{ConnectivityMonitor, ProbeHandle},
    },
    data::student::{StudentDetails, StudentRecord},
    validation::{FormErrors, validate},
};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save student information. Please try again.";
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Please check your network connection.";
pub const TIMEOUT_MESSAGE: &str = "Network timeout - please check your connection";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordMode {
    #[default]
    Creating,
    Editing,
    Viewing,
}

/// The record on display, either as the server returned it or as typed in while offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentRecord {
    Saved(StudentRecord),
    /// Keeps the server id when an already saved record was edited offline, so the next
    /// connected submit updates rather than duplicates it.
    Local {
        id: Option<String>,
        details: StudentDetails,
    },
}

impl CurrentRecord {
    #[must_use]
    pub const fn details(&self) -> &StudentDetails {
        match self {
            Self::Saved(record) => &record.details,
            Self::Local { details, .. } => details,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Saved(record) => Some(&record.id),
            Self::Local { id, .. } => id.as_deref(),
        }
    }

    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    /// Whether to offer a retry, which re-checks the connection.
    pub retryable: bool,
}

impl Banner {
    fn for_error(error: &ClientError) -> Self {
        match error {
            ClientError::NetworkTimeout => Self {
                message: TIMEOUT_MESSAGE.into(),
                retryable: true,
            },
            ClientError::NetworkUnreachable { .. } => Self {
                message: UNREACHABLE_MESSAGE.into(),
                retryable: true,
            },
            _ => Self {
                message: SAVE_FAILED_MESSAGE.into(),
                retryable: false,
            },
        }
    }
}

/// Everything a view needs to draw the current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub connectivity: Connectivity,
    pub mode: RecordMode,
    pub record: Option<CurrentRecord>,
    /// What the form holds: the last submitted values or the record being edited.
    pub draft: StudentDetails,
    pub form_errors: FormErrors,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Created or updated through the API.
    Persisted,
    /// Accepted without contacting the API.
    Local,
    /// Validation failed; nothing was sent.
    Rejected,
    /// The API call failed; the banner says why.
    Failed,
    /// There is no form on screen to submit.
    Ignored,
}

pub struct StudentController<A> {
    api: Arc<A>,
    monitor: ConnectivityMonitor<A>,
    probe: Option<ProbeHandle>,
    mode: RecordMode,
    record: Option<CurrentRecord>,
    draft: StudentDetails,
    form_errors: FormErrors,
    banner: Option<Banner>,
}

impl<A: StudentApi + 'static> StudentController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            monitor: ConnectivityMonitor::new(Arc::clone(&api)),
            api,
            probe: None,
            mode: RecordMode::Creating,
            record: None,
            draft: StudentDetails::default(),
            form_errors: FormErrors::default(),
            banner: None,
        }
    }

    /// Picks up an already saved record, shown in view mode.
    pub fn with_record(api: Arc<A>, record: StudentRecord) -> Self {
        Self {
            mode: RecordMode::Viewing,
            record: Some(CurrentRecord::Saved(record)),
            ..Self::new(api)
        }
    }

    /// Starts the connectivity probe. Mounting twice replaces the old probe.
    pub fn mount(&mut self, every: Duration) {
        if let Some(old) = self.probe.replace(ProbeHandle::spawn(self.monitor.clone(), every)) {
            debug!("replacing existing connectivity probe");
            drop(old);
        }
    }

    pub fn mount_with(&mut self, config: &ClientConfig) {
        self.mount(config.reprobe_interval);
    }

    pub async fn unmount(&mut self) {
        if let Some(probe) = self.probe.take() {
            probe.shutdown().await;
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.probe.as_ref().is_some_and(|probe| !probe.is_finished())
    }

    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.monitor.current()
    }

    #[must_use]
    pub fn watch_connectivity(&self) -> watch::Receiver<Connectivity> {
        self.monitor.subscribe()
    }

    pub async fn check_connectivity(&mut self) -> Connectivity {
        let status = self.monitor.probe().await;
        if status == Connectivity::Connected {
            self.banner = None;
        }
        status
    }

    /// The manual "Refresh"/"Retry" action: clears the banner and probes again.
    pub async fn refresh_connection(&mut self) -> Connectivity {
        self.banner = None;
        self.check_connectivity().await
    }

    pub async fn submit(&mut self, details: StudentDetails) -> SubmitOutcome {
        if self.mode == RecordMode::Viewing {
            return SubmitOutcome::Ignored;
        }

        let errors = validate(&details);
        if !errors.is_empty() {
            debug!(count = errors.len(), "form has errors");
            self.form_errors = errors;
            self.draft = details;
            return SubmitOutcome::Rejected;
        }
        self.form_errors = FormErrors::default();
        self.banner = None;

        let id = self
            .record
            .as_ref()
            .and_then(CurrentRecord::id)
            .map(ToString::to_string);

        if self.connectivity() != Connectivity::Connected {
            info!(?id, "API unavailable, keeping student locally");
            self.show(CurrentRecord::Local { id, details });
            return SubmitOutcome::Local;
        }

        let result = match &id {
            Some(id) => self.api.update(id, &details).await,
            None => self.api.create(&details).await,
        };

        match result {
            Ok(saved) => {
                info!(id = %saved.id, "saved student");
                self.show(CurrentRecord::Saved(saved));
                SubmitOutcome::Persisted
            }
            Err(e) => {
                warn!(?e, "unable to save student");
                if matches!(e, ClientError::NetworkUnreachable { .. }) {
                    self.monitor.mark_disconnected();
                }
                self.banner = Some(Banner::for_error(&e));
                self.draft = details;
                SubmitOutcome::Failed
            }
        }
    }

    fn show(&mut self, record: CurrentRecord) {
        self.record = Some(record);
        self.mode = RecordMode::Viewing;
        self.draft = StudentDetails::default();
    }

    /// Viewing to Editing, with the form pre-filled from the current record.
    pub fn edit(&mut self) -> bool {
        let (RecordMode::Viewing, Some(record)) = (self.mode, &self.record) else {
            return false;
        };

        self.draft = record.details().clone();
        self.form_errors = FormErrors::default();
        self.mode = RecordMode::Editing;
        true
    }

    pub fn cancel_edit(&mut self) -> bool {
        if self.mode != RecordMode::Editing {
            return false;
        }

        self.draft = StudentDetails::default();
        self.form_errors = FormErrors::default();
        self.mode = RecordMode::Viewing;
        true
    }

    /// "Add new student": forget the current record and start over.
    pub fn clear(&mut self) {
        self.mode = RecordMode::Creating;
        self.record = None;
        self.draft = StudentDetails::default();
        self.form_errors = FormErrors::default();
        self.banner = None;
    }

    #[must_use]
    pub const fn mode(&self) -> RecordMode {
        self.mode
    }

    #[must_use]
    pub const fn record(&self) -> Option<&CurrentRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub const fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    #[must_use]
    pub const fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            connectivity: self.connectivity(),
            mode: self.mode,
            record: self.record.clone(),
            draft: self.draft.clone(),
            form_errors: self.form_errors.clone(),
            banner: self.banner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::api::ClientResult,
        data::{
            student::StudentPatch,
            wire::{DeleteConfirmation, HealthStatus},
        },
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Behaviour {
        Up,
        Down,
        TimesOut,
        Broken,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Health,
        Create(String),
        Update(String, String),
    }

    struct MockApi {
        behaviour: Mutex<Behaviour>,
        calls: Mutex<Vec<Call>>,
        saved: Mutex<Vec<StudentRecord>>,
    }

    impl MockApi {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour: Mutex::new(behaviour),
                calls: Mutex::new(Vec::new()),
                saved: Mutex::new(Vec::new()),
            })
        }

        fn set(&self, behaviour: Behaviour) {
            *self.behaviour.lock().unwrap() = behaviour;
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn mutations(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|call| *call != Call::Health)
                .collect()
        }

        fn outcome(&self) -> ClientResult<()> {
            match *self.behaviour.lock().unwrap() {
                Behaviour::Up => Ok(()),
                Behaviour::Down => Err(ClientError::NetworkUnreachable {
                    message: "connection refused".into(),
                }),
                Behaviour::TimesOut => Err(ClientError::NetworkTimeout),
                Behaviour::Broken => Err(ClientError::Server {
                    status: 500,
                    message: "Failed to create student".into(),
                }),
            }
        }
    }

    #[async_trait]
    impl StudentApi for MockApi {
        async fn health(&self) -> ClientResult<HealthStatus> {
            self.calls.lock().unwrap().push(Call::Health);
            self.outcome().map(|()| HealthStatus::ok())
        }

        async fn list(&self) -> ClientResult<Vec<StudentRecord>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn get(&self, id: &str) -> ClientResult<StudentRecord> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .find(|record| record.id == id)
                .cloned()
                .ok_or(ClientError::NotFound)
        }

        async fn create(&self, details: &StudentDetails) -> ClientResult<StudentRecord> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Create(details.name.clone()));
            self.outcome()?;

            let record = StudentRecord::new(details.clone());
            self.saved.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: &str, details: &StudentDetails) -> ClientResult<StudentRecord> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(id.to_string(), details.name.clone()));
            self.outcome()?;

            let mut saved = self.saved.lock().unwrap();
            let record = saved
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or(ClientError::NotFound)?;
            record.apply(StudentPatch::from(details.clone()));
            Ok(record.clone())
        }

        async fn delete(&self, _id: &str) -> ClientResult<DeleteConfirmation> {
            Ok(DeleteConfirmation::default())
        }

        async fn search(&self, _query: &str) -> ClientResult<Vec<StudentRecord>> {
            Ok(Vec::new())
        }
    }

    fn asha() -> StudentDetails {
        StudentDetails {
            name: "Asha Rao".into(),
            roll_number: "12".into(),
            class: "5".into(),
            section: "B".into(),
            gender: "Female".into(),
            date_of_birth: "2014-03-09".into(),
            father_name: "Vikram Rao".into(),
            father_contact: "+919876543210".into(),
            mother_name: "Meera Rao".into(),
            mother_contact: "9876501234".into(),
            ..StudentDetails::default()
        }
    }

    async fn connected(api: &Arc<MockApi>) -> StudentController<MockApi> {
        let mut controller = StudentController::new(Arc::clone(api));
        assert_eq!(controller.check_connectivity().await, Connectivity::Connected);
        controller
    }

    #[tokio::test]
    async fn starts_checking_in_create_mode() {
        let controller = StudentController::new(MockApi::new(Behaviour::Up));
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.connectivity, Connectivity::Checking);
        assert_eq!(snapshot.mode, RecordMode::Creating);
        assert!(snapshot.record.is_none());
        assert!(snapshot.banner.is_none());
    }

    #[tokio::test]
    async fn creates_then_updates_while_connected() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Persisted);
        assert_eq!(controller.mode(), RecordMode::Viewing);
        let id = controller.record().and_then(CurrentRecord::id).unwrap().to_string();

        assert!(controller.edit());
        assert_eq!(controller.mode(), RecordMode::Editing);
        assert_eq!(controller.snapshot().draft, asha());

        let renamed = StudentDetails {
            name: "Asha R.".into(),
            ..asha()
        };
        assert_eq!(controller.submit(renamed).await, SubmitOutcome::Persisted);
        assert_eq!(controller.mode(), RecordMode::Viewing);

        assert_eq!(
            api.mutations(),
            vec![
                Call::Create("Asha Rao".into()),
                Call::Update(id.clone(), "Asha R.".into())
            ]
        );
        let record = controller.record().unwrap();
        assert!(record.is_saved());
        assert_eq!(record.id(), Some(id.as_str()));
        assert_eq!(record.details().name, "Asha R.");
    }

    #[tokio::test]
    async fn keeps_data_locally_while_disconnected() {
        let api = MockApi::new(Behaviour::Down);
        let mut controller = StudentController::new(Arc::clone(&api));
        assert_eq!(controller.check_connectivity().await, Connectivity::Disconnected);

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Local);
        assert_eq!(controller.mode(), RecordMode::Viewing);
        assert_eq!(
            controller.record(),
            Some(&CurrentRecord::Local {
                id: None,
                details: asha()
            })
        );
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn submitting_before_the_first_probe_is_local() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = StudentController::new(Arc::clone(&api));

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Local);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn offline_edits_keep_the_server_id() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;
        controller.submit(asha()).await;
        let id = controller.record().and_then(CurrentRecord::id).unwrap().to_string();

        api.set(Behaviour::Down);
        controller.check_connectivity().await;
        controller.edit();
        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Local);
        assert_eq!(controller.record().and_then(CurrentRecord::id), Some(id.as_str()));

        api.set(Behaviour::Up);
        controller.refresh_connection().await;
        controller.edit();
        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Persisted);
        assert_eq!(
            api.mutations().last(),
            Some(&Call::Update(id, "Asha Rao".into()))
        );
    }

    #[tokio::test]
    async fn invalid_submit_exposes_errors_and_calls_nothing() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;

        let missing_name = StudentDetails {
            name: "   ".into(),
            father_email: Some("not-an-email".into()),
            ..asha()
        };
        assert_eq!(controller.submit(missing_name.clone()).await, SubmitOutcome::Rejected);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.mode, RecordMode::Creating);
        assert_eq!(snapshot.draft, missing_name);
        assert_eq!(snapshot.form_errors.len(), 2);
        assert!(api.mutations().is_empty());

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Persisted);
        assert!(controller.form_errors().is_empty());
    }

    #[tokio::test]
    async fn timeout_leaves_state_unchanged_with_a_retryable_banner() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;
        api.set(Behaviour::TimesOut);

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Failed);
        assert_eq!(controller.mode(), RecordMode::Creating);
        assert!(controller.record().is_none());
        assert_eq!(controller.connectivity(), Connectivity::Connected);
        assert_eq!(
            controller.banner(),
            Some(&Banner {
                message: TIMEOUT_MESSAGE.into(),
                retryable: true
            })
        );
        assert_eq!(controller.snapshot().draft, asha());
    }

    #[tokio::test]
    async fn unreachable_during_submit_drops_to_local_mode() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;
        api.set(Behaviour::Down);

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Failed);
        assert_eq!(controller.connectivity(), Connectivity::Disconnected);
        assert_eq!(controller.banner().map(|b| b.message.as_str()), Some(UNREACHABLE_MESSAGE));
        assert!(controller.banner().unwrap().retryable);

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Local);
        assert!(controller.banner().is_none());
    }

    #[tokio::test]
    async fn server_errors_are_not_retryable() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;
        api.set(Behaviour::Broken);

        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Failed);
        assert_eq!(
            controller.banner(),
            Some(&Banner {
                message: SAVE_FAILED_MESSAGE.into(),
                retryable: false
            })
        );
        assert_eq!(controller.connectivity(), Connectivity::Connected);
    }

    #[tokio::test]
    async fn refreshing_clears_the_banner_once_reconnected() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;
        api.set(Behaviour::TimesOut);
        controller.submit(asha()).await;
        assert!(controller.banner().is_some());

        api.set(Behaviour::Up);
        assert_eq!(controller.refresh_connection().await, Connectivity::Connected);
        assert!(controller.banner().is_none());
    }

    #[tokio::test]
    async fn resuming_a_saved_record_updates_it() {
        let api = MockApi::new(Behaviour::Up);
        let saved = api.create(&asha()).await.unwrap();
        let mut controller = StudentController::with_record(Arc::clone(&api), saved.clone());
        controller.check_connectivity().await;

        assert_eq!(controller.mode(), RecordMode::Viewing);
        assert!(controller.edit());
        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Persisted);
        assert_eq!(
            api.mutations().last(),
            Some(&Call::Update(saved.id, "Asha Rao".into()))
        );
    }

    #[tokio::test]
    async fn mode_transitions() {
        let api = MockApi::new(Behaviour::Up);
        let mut controller = connected(&api).await;

        assert!(!controller.edit());
        assert!(!controller.cancel_edit());

        controller.submit(asha()).await;
        assert_eq!(controller.submit(asha()).await, SubmitOutcome::Ignored);

        assert!(controller.edit());
        assert!(controller.cancel_edit());
        assert_eq!(controller.mode(), RecordMode::Viewing);
        assert!(controller.record().is_some());

        controller.clear();
        assert_eq!(controller.mode(), RecordMode::Creating);
        assert!(controller.record().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn mount_probes_and_unmount_stops() {
        let api = MockApi::new(Behaviour::Down);
        let mut controller = StudentController::new(Arc::clone(&api));
        let mut status = controller.watch_connectivity();

        controller.mount(Duration::from_secs(30));
        assert!(controller.is_mounted());
        status
            .wait_for(|status| *status == Connectivity::Disconnected)
            .await
            .unwrap();

        controller.unmount().await;
        assert!(!controller.is_mounted());

        let probes = api.calls().len();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(api.calls().len(), probes);
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use webrec_codegen::{CodeGenerator, Script};
use webrec_core_types::{ActionRecord, RecError, SessionId};

use crate::manager::CrossWindowManager;
use crate::metrics;
use crate::ports::{MainWindowSpec, RecorderHost};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Recording,
    Stopped,
}

/// Everything a finished session produced.
#[derive(Clone, Debug, Serialize)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub actions: Vec<ActionRecord>,
    pub script: Script,
}

/// One recording session over one manager.
///
/// `Idle → Recording → Stopped`, stopped is terminal. The manager enforces a
/// single active recording, so a second session against a busy manager fails
/// at `start`.
pub struct RecordingSession {
    id: SessionId,
    manager: Arc<CrossWindowManager>,
    state: Mutex<SessionState>,
}

impl RecordingSession {
    pub fn new(manager: Arc<CrossWindowManager>) -> Self {
        Self {
            id: SessionId::new(),
            manager,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn manager(&self) -> &Arc<CrossWindowManager> {
        &self.manager
    }

    /// Attach to the host and begin recording.
    pub async fn start<H>(&self, host: Arc<H>, main: MainWindowSpec) -> Result<(), RecError>
    where
        H: RecorderHost + 'static,
    {
        {
            let state = self.state.lock();
            if *state != SessionState::Idle {
                return Err(RecError::new(format!(
                    "session cannot start from state {:?}",
                    *state
                )));
            }
        }

        self.manager.begin_session(self.id.clone());
        self.manager.initialize(host, main).await?;

        *self.state.lock() = SessionState::Recording;
        metrics::session_started();
        info!(session = %self.id.0, "recording session started");
        Ok(())
    }

    /// Stop recording. Barrier semantics: every buffered event is flushed
    /// and published before the outcome is assembled, so the returned
    /// actions are complete and in publish order.
    pub async fn stop(&self) -> Result<SessionOutcome, RecError> {
        {
            let state = self.state.lock();
            if *state != SessionState::Recording {
                return Err(RecError::new(format!(
                    "session cannot stop from state {:?}",
                    *state
                )));
            }
        }

        self.manager.cleanup().await;
        let actions = self.manager.take_records();
        let script = CodeGenerator::new().generate(&actions);

        *self.state.lock() = SessionState::Stopped;
        metrics::session_stopped();
        info!(
            session = %self.id.0,
            actions = actions.len(),
            steps = script.steps.len(),
            "recording session stopped"
        );
        Ok(SessionOutcome {
            session_id: self.id.clone(),
            actions,
            script,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::broadcast;

    use webrec_codegen::ScriptStep;
    use webrec_core_types::WindowId;
    use webrec_event_coordinator::CoordinatorConfig;
    use webrec_probe::InjectPort;
    use crate::ports::HostWindowEvent;

    struct FakeHost {
        lifecycle_tx: broadcast::Sender<HostWindowEvent>,
    }

    impl FakeHost {
        fn new() -> Arc<Self> {
            let (lifecycle_tx, _) = broadcast::channel(16);
            Arc::new(Self { lifecycle_tx })
        }
    }

    #[async_trait]
    impl InjectPort for FakeHost {
        async fn inject_script(&self, _window: &WindowId, _script: &str) -> Result<(), RecError> {
            Ok(())
        }
    }

    #[async_trait]
    impl RecorderHost for FakeHost {
        fn lifecycle_events(&self) -> broadcast::Receiver<HostWindowEvent> {
            self.lifecycle_tx.subscribe()
        }
    }

    fn main_spec() -> MainWindowSpec {
        MainWindowSpec {
            id: Some(WindowId("main".into())),
            url: "https://example.com".into(),
            title: "Example".into(),
        }
    }

    fn quiet_manager() -> Arc<CrossWindowManager> {
        CrossWindowManager::new(
            CoordinatorConfig::default().with_flush_interval(Duration::from_secs(3600)),
        )
    }

    #[tokio::test]
    async fn stop_is_a_barrier_for_buffered_events() {
        let session = RecordingSession::new(quiet_manager());
        session.start(FakeHost::new(), main_spec()).await.unwrap();
        assert_eq!(session.state(), SessionState::Recording);

        for i in 0..5 {
            let id = session.manager().record_browser_action(
                &WindowId("main".into()),
                "click",
                json!({
                    "element": {"tag": "button", "id": format!("b{i}")},
                    "page": {"url": "https://example.com", "title": "Example"}
                }),
            );
            assert!(!id.is_empty());
        }

        let outcome = session.stop().await.unwrap();
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(outcome.actions.len(), 5);
        assert!(outcome
            .actions
            .iter()
            .all(|a| a.session_id == *session.id()));
    }

    #[tokio::test]
    async fn stopped_session_cannot_restart() {
        let session = RecordingSession::new(quiet_manager());
        session.start(FakeHost::new(), main_spec()).await.unwrap();
        session.stop().await.unwrap();

        let err = session
            .start(FakeHost::new(), main_spec())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("cannot start"));
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected() {
        let session = RecordingSession::new(quiet_manager());
        assert!(session.stop().await.is_err());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn outcome_script_references_recorded_click() {
        let session = RecordingSession::new(quiet_manager());
        session.start(FakeHost::new(), main_spec()).await.unwrap();

        session.manager().record_browser_action(
            &WindowId("main".into()),
            "click",
            json!({
                "element": {"tag": "button", "id": "submit-btn", "text": "Submit"},
                "page": {"url": "https://example.com", "title": "Example"}
            }),
        );

        let outcome = session.stop().await.unwrap();
        let interaction = outcome
            .script
            .steps
            .iter()
            .find_map(|step| match step {
                ScriptStep::Interact { selector, verb, .. } => Some((selector.clone(), *verb)),
                _ => None,
            })
            .unwrap();
        assert_eq!(interaction.0, "#submit-btn");
        assert_eq!(interaction.1.name(), "click");
    }
}

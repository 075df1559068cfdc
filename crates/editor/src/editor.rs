//! Headless diagram editor
//!
//! `DiagramEditor` pairs a `Session` with a `SyncClient` and runs the
//! effects each intent produces: a mutation is followed by a full reload,
//! and loads are applied through the session's ticket check. The desktop UI
//! drives the same session and helpers from its own task spawner.

use plano_core::{EditorResult, Position};
use plano_model::PlanoName;
use plano_sync::SyncClient;

use crate::input::PointerInput;
use crate::loader::fetch_diagram;
use crate::mode::{Effect, Intent, LoadRequest, Mutation};
use crate::scene::Scene;
use crate::session::{LoadOutcome, Session};

/// Send one mutation to the backend
pub async fn perform_mutation<C: SyncClient>(client: &C, mutation: &Mutation) -> EditorResult<()> {
    let operation = mutation.describe();
    let result = match mutation {
        Mutation::CreateDevice(payload) => client.create_device(payload).await.map(|id| {
            tracing::info!("Backend assigned id {} to '{}'", id, payload.name);
        }),
        Mutation::UpdateDevice(device) => client.update_device(device).await,
        Mutation::DeleteDevice(id) => client.delete_device(*id).await,
        Mutation::CreateConnection(payload) => client.create_connection(payload).await.map(|_| ()),
    };
    result.map_err(|e| e.into_editor_error(operation))
}

/// Fetch a diagram and hand it to the session
pub async fn perform_load<C: SyncClient>(
    client: &C,
    session: &mut Session,
    request: LoadRequest,
) -> LoadOutcome {
    let result = fetch_diagram(client, &request.plano).await;
    session.apply_load(request.ticket, result)
}

/// A session wired to a backend
#[derive(Debug)]
pub struct DiagramEditor<C> {
    client: C,
    session: Session,
}

impl<C: SyncClient> DiagramEditor<C> {
    pub fn new(client: C, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Render model for the current state
    pub fn scene(&self) -> Scene {
        Scene::build(&self.session)
    }

    /// Load a plano, replacing whatever is shown
    pub async fn open(&mut self, plano: PlanoName) -> LoadOutcome {
        let effects = self.session.dispatch(Intent::SwitchPlano(plano));
        self.run(effects).await.unwrap_or(LoadOutcome::Applied)
    }

    /// Dispatch an intent and run every effect it leads to
    pub async fn dispatch(&mut self, intent: Intent) -> Option<LoadOutcome> {
        let effects = self.session.dispatch(intent);
        self.run(effects).await
    }

    /// Translate raw input, dispatch it and run the effects
    pub async fn handle_input(&mut self, input: PointerInput) -> Option<LoadOutcome> {
        let effects = self.session.handle_input(input);
        self.run(effects).await
    }

    /// Map a screen point with the current view
    pub fn screen_to_diagram(&self, screen: Position) -> EditorResult<Position> {
        self.session.screen_to_diagram(screen)
    }

    /// Run effects to completion, returning the outcome of the last load
    async fn run(&mut self, effects: Vec<Effect>) -> Option<LoadOutcome> {
        let mut queue: std::collections::VecDeque<Effect> = effects.into();
        let mut last = None;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Load(request) => {
                    last = Some(perform_load(&self.client, &mut self.session, request).await);
                }
                Effect::Mutate(mutation) => {
                    let result = perform_mutation(&self.client, &mutation).await;
                    queue.push_back(self.session.complete_mutation(&mutation, result));
                }
            }
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::InteractionMode;
    use crate::session::StatusLevel;
    use plano_core::{ConnectionType, DeviceStatus, DeviceType};
    use plano_model::{Connection, Device, DeviceDraft};
    use plano_sync::{MemorySyncClient, Request};
    use pretty_assertions::assert_eq;

    const SVG: &str = r#"<svg width="400" height="300" viewBox="0 0 400 300"></svg>"#;

    fn plano() -> PlanoName {
        PlanoName::new("planta").unwrap()
    }

    fn backend() -> MemorySyncClient {
        MemorySyncClient::new()
            .with_surface("planta", SVG)
            .with_surface("sotano", SVG)
            .with_device(
                Device::new(1, "router", Position::new(10.0, 10.0))
                    .in_plano("planta")
                    .with_status(DeviceStatus::Online),
            )
            .with_device(Device::new(2, "pc-2", Position::new(100.0, 50.0)).in_plano("planta"))
            .with_device(Device::new(3, "pc-3", Position::new(5.0, 5.0)).in_plano("sotano"))
            .with_connection(Connection::new(1, 2))
    }

    async fn opened(client: &MemorySyncClient) -> DiagramEditor<MemorySyncClient> {
        let mut editor = DiagramEditor::new(client.clone(), Session::default());
        assert_eq!(editor.open(plano()).await, LoadOutcome::Applied);
        client.clear_requests();
        editor
    }

    #[tokio::test]
    async fn test_open_loads_scoped_diagram() {
        let client = backend();
        let editor = opened(&client).await;
        let store = editor.session().store();
        assert_eq!(store.device_count(), 2);
        assert_eq!(store.renderable_connections().len(), 1);
        assert!(editor.session().surface().is_some());
        assert_eq!(editor.scene().devices.len(), 2);
    }

    #[tokio::test]
    async fn test_drag_sends_one_update_then_one_reload() {
        let client = backend();
        let mut editor = opened(&client).await;

        editor.dispatch(Intent::SelectDevice(2)).await;
        editor.dispatch(Intent::BeginDrag(2)).await;
        for step in 0..40 {
            let p = Position::new(100.0 + f64::from(step), 50.0 + f64::from(step) / 2.0);
            editor.dispatch(Intent::DragTo(p)).await;
        }
        assert!(client.requests().is_empty(), "dragging must not hit the network");

        let outcome = editor.dispatch(Intent::EndDrag).await;
        assert_eq!(outcome, Some(LoadOutcome::Applied));

        let log = client.requests();
        assert_eq!(log.mutations().len(), 1);
        assert_eq!(log.updates_for(2), vec![Position::new(139.0, 69.5)]);
        assert_eq!(log.reloads(), 1);
        assert_eq!(
            editor.session().store().device(2).unwrap().position(),
            Position::new(139.0, 69.5)
        );
    }

    #[tokio::test]
    async fn test_click_without_move_sends_nothing() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.handle_input(PointerInput::DeviceClick(1)).await;
        editor
            .handle_input(PointerInput::DeviceDown { device: 1, at: Position::new(10.0, 10.0) })
            .await;
        editor.handle_input(PointerInput::Up(Position::new(10.0, 10.0))).await;
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_self_connection_sends_nothing() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::SelectDevice(1)).await;
        editor.dispatch(Intent::BeginConnect).await;
        editor.dispatch(Intent::ConfirmConnectTarget(1)).await;

        assert!(client.requests().is_empty());
        assert_eq!(editor.session().mode(), InteractionMode::Idle);
    }

    #[tokio::test]
    async fn test_connection_created_then_reloaded() {
        let client = backend().with_device(Device::new(4, "ap", Position::new(300.0, 200.0)).in_plano("planta"));
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::SelectDevice(4)).await;
        editor.dispatch(Intent::SetConnectionType(ConnectionType::Fiber)).await;
        editor.dispatch(Intent::BeginConnect).await;
        editor.dispatch(Intent::ConfirmConnectTarget(1)).await;

        let log = client.requests();
        assert_eq!(log.mutations().len(), 1);
        assert_eq!(log.reloads(), 1);
        let links = editor.scene().links;
        assert_eq!(links.len(), 2);
        assert!(links.iter().any(|l| l.dashed));
    }

    #[tokio::test]
    async fn test_created_device_appears_after_reload() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::StartPlacement).await;
        editor.dispatch(Intent::PlaceAt(Position::new(200.0, 150.0))).await;
        assert_eq!(editor.session().mode(), InteractionMode::Idle);

        let draft = DeviceDraft {
            ip: "10.0.0.40".to_string(),
            ..DeviceDraft::new("Lab-40", DeviceType::Pc)
        };
        editor.dispatch(Intent::SubmitDevice(draft)).await;

        let created = editor
            .session()
            .store()
            .devices()
            .find(|d| d.name == "Lab-40")
            .cloned()
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.position(), Position::new(200.0, 150.0));
        assert_eq!(client.requests().reloads(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected_before_request() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::StartPlacement).await;
        editor.dispatch(Intent::PlaceAt(Position::new(20.0, 20.0))).await;
        editor
            .dispatch(Intent::SubmitDevice(DeviceDraft::new("printer", DeviceType::from("printer"))))
            .await;

        assert!(client.requests().is_empty());
        assert_eq!(editor.session().status().unwrap().level, StatusLevel::Warning);
    }

    #[tokio::test]
    async fn test_delete_cascades_after_reload() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::DeleteDevice(2)).await;

        assert_eq!(client.requests().mutations(), vec![&Request::DeleteDevice(2)]);
        assert!(!editor.session().store().contains(2));
        assert!(editor.session().store().connections().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_is_visible_and_state_reloaded() {
        let client = backend();
        let mut editor = opened(&client).await;
        client.reject_next_mutation("database is locked");

        editor.dispatch(Intent::SelectDevice(1)).await;
        editor.dispatch(Intent::BeginDrag(1)).await;
        editor.dispatch(Intent::DragTo(Position::new(60.0, 60.0))).await;
        editor.dispatch(Intent::EndDrag).await;

        let status = editor.session().status().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("database is locked"));
        // The reload restored the authoritative position
        assert_eq!(
            editor.session().store().device(1).unwrap().position(),
            Position::new(10.0, 10.0)
        );
    }

    #[tokio::test]
    async fn test_offline_load_keeps_previous_diagram() {
        let client = backend();
        let mut editor = opened(&client).await;
        client.set_offline(true);

        let outcome = editor.dispatch(Intent::Reload).await;
        assert_eq!(outcome, Some(LoadOutcome::Failed));
        assert_eq!(editor.session().store().device_count(), 2);
        assert_eq!(editor.session().status().unwrap().level, StatusLevel::Error);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::Reload).await;
        let first = editor.scene();
        editor.dispatch(Intent::Reload).await;
        assert_eq!(editor.scene(), first);
        assert_eq!(client.requests().reloads(), 2);
    }

    #[tokio::test]
    async fn test_switch_plano() {
        let client = backend();
        let mut editor = opened(&client).await;
        editor.dispatch(Intent::SelectDevice(1)).await;

        let outcome = editor.open(PlanoName::new("sotano").unwrap()).await;
        assert_eq!(outcome, LoadOutcome::Applied);
        let ids: Vec<_> = editor.session().store().devices().map(|d| d.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(editor.session().selection(), None);
    }
}

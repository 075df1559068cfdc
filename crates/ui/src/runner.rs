//! Effect runner for the desktop UI
//!
//! Components never talk to the backend directly: they dispatch intents or
//! raw input into the session held by [`APP_STATE`], and every effect that
//! comes back is run here on the Dioxus task spawner. Load results go
//! through the session's ticket check, so an older reload finishing late is
//! dropped.

use dioxus::prelude::*;
use plano_editor::{Effect, Intent, PointerInput, StatusMessage, fetch_diagram, perform_mutation};

use crate::state::APP_STATE;

/// Dispatch an intent and run its effects
pub fn dispatch(intent: Intent) {
    let effects = APP_STATE.write().session.dispatch(intent);
    run_effects(effects);
}

/// Translate raw input, dispatch it and run its effects
pub fn handle_input(input: PointerInput) {
    let effects = APP_STATE.write().session.handle_input(input);
    run_effects(effects);
}

/// Reload the current plano
pub fn reload() {
    let effect = APP_STATE.write().session.reload();
    run_effects(vec![effect]);
}

/// Spawn one task per effect
pub fn run_effects(effects: Vec<Effect>) {
    for effect in effects {
        spawn(run_effect(effect));
    }
}

async fn run_effect(effect: Effect) {
    let client = APP_STATE.read().client.clone();
    let Some(client) = client else {
        tracing::error!("No backend client; dropping {:?}", effect);
        APP_STATE
            .write()
            .session
            .set_status(StatusMessage::error("No backend is configured"));
        return;
    };

    match effect {
        Effect::Load(request) => {
            let result = fetch_diagram(client.as_ref(), &request.plano).await;
            APP_STATE.write().session.apply_load(request.ticket, result);
        }
        Effect::Mutate(mutation) => {
            let result = perform_mutation(client.as_ref(), &mutation).await;
            let next = APP_STATE.write().session.complete_mutation(&mutation, result);
            run_effects(vec![next]);
        }
    }
}

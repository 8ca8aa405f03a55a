mod backend;
mod components;
mod state;

use backend::{api::MessengerApi, config::Config, AppCmd, AppEvent, Synchronizer};
use components::common::ConfigErrorScreen;
use components::messenger_page::MessengerPage;
use components::AppState;

use dioxus::prelude::*;
use tokio::sync::mpsc;
use tracing::error;

const STYLE: &str = include_str!("../assets/main.css");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    init_tracing();
    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "quantum_messenger=info".into()),
        )
        .try_init();
}

fn load_api() -> Result<MessengerApi, String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    MessengerApi::new(config).map_err(|e| e.to_string())
}

#[component]
fn App() -> Element {
    let setup = use_hook(|| {
        let setup = load_api();
        if let Err(reason) = &setup {
            error!("Messenger configuration rejected: {}", reason);
        }
        setup
    });

    let ledger_image = setup.as_ref().ok().map(|api| api.config().ledger_image_url());
    let app_state = AppState::new(ledger_image);
    use_context_provider(|| app_state);

    let cmd_tx = use_hook(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCmd>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
        if let Ok(api) = &setup {
            spawn(Synchronizer::new(api.clone(), cmd_rx, event_tx).run());
            let mut view = app_state.view;
            spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    view.write().apply(event);
                }
            });
        }
        cmd_tx
    });
    use_context_provider(|| cmd_tx);

    rsx! {
        style { "{STYLE}" }
        match &setup {
            Ok(_) => rsx! { MessengerPage {} },
            Err(reason) => rsx! { ConfigErrorScreen { reason: reason.clone() } },
        }
    }
}

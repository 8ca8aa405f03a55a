pub mod common;
pub mod messenger_page;
pub mod view;

use dioxus::prelude::*;
use reqwest::Url;

use crate::state::ViewState;

#[derive(Clone, Copy)]
pub struct AppState {
    pub view: Signal<ViewState>,
    pub ledger_image: Signal<Option<Url>>,
}

impl AppState {
    pub fn new(ledger_image: Option<Url>) -> Self {
        Self {
            view: use_signal(ViewState::default),
            ledger_image: use_signal(|| ledger_image),
        }
    }
}

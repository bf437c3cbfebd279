use crate::images::ImageHostPolicy;
use crate::services::relay_prompt;
use crate::ui::FormState;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use chrono::Utc;
use serde::Deserialize;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub prompt: String,
    pub image_url: String,
    pub error: String,
    pub loading: bool,
    pub preview_allowed: bool,
    pub download_name: String,
    pub image_hosts: String,
}

impl IndexTemplate {
    pub fn from_state(state: &FormState, image_hosts: &ImageHostPolicy) -> Self {
        let download = state.download_link(Utc::now());
        let image_url = state.image_url.clone().unwrap_or_default();

        Self {
            prompt: state.prompt.clone(),
            preview_allowed: image_hosts.allows(&image_url),
            image_url,
            error: state.error.clone().unwrap_or_default(),
            loading: state.loading,
            download_name: download.map(|link| link.filename).unwrap_or_default(),
            image_hosts: image_hosts.client_patterns(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    IndexTemplate::from_state(&FormState::default(), &state.image_hosts)
}

/// Form submission without JavaScript: runs the form transitions server-side
/// and renders the settled page.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<PromptForm>,
) -> impl IntoResponse {
    let mut form_state = FormState::new(form.prompt);

    if let Some(pending) = form_state.submit() {
        let outcome = relay_prompt(state.provider.as_ref(), pending.prompt())
            .await
            .map(|image| image.url)
            .map_err(|e| e.to_string());
        form_state.settle(pending, outcome);
    } else {
        tracing::debug!("Blank prompt rejected before relay");
    }

    IndexTemplate::from_state(&form_state, &state.image_hosts)
}

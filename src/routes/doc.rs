use utoipa::OpenApi;

use super::{chat, health, settings};

#[derive(OpenApi)]
#[openapi(info(
    title = "llamaterm-server",
    description = "REST API backing the LlamaTerm terminal chat client",
    version = "0.1.0",
    contact(name = "llamaterm", url = "https://github.com/permacommons/llamaterm")
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(chat::ChatApi::openapi());
    root.merge(settings::SettingsApi::openapi());
    root.merge(health::HealthApi::openapi());
    root
}

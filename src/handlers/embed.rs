use axum::extract::{Query, State};
use axum::response::Html;

use crate::embed::{render_embed, resolve, EmbedQuery};
use crate::state::AppState;

/// GET /embed?text=&img=&color=&title=&siteName=&avatarType=&avatarUrl=&avatarWidth=&avatarHeight=
///
/// Returns a link-preview page whose Open Graph / Twitter Card tags are
/// driven entirely by the query. `text`, `title` and `siteName` are base64url
/// tokens; `img` and `avatarUrl` are percent-encoded URLs. Never fails:
/// undecodable values fall back to defaults and a repeated key keeps its
/// first value.
pub async fn get_embed(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let params: EmbedQuery = pairs.into_iter().collect();
    let view = resolve(&params, state.param_policy);
    Html(render_embed(&view))
}

use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

use crate::error::SourceError;
use crate::pagination::{collect_pages, Page};
use crate::sources::{url_with_query, SourceContext};
use crate::types::{string_or_number, ListUser};

use super::{ensure_token_owner, ListPaging, RelationshipLists, RelationshipSource};

const NAME: &str = "graph_api";
const API_VERSION: &str = "v12.0";

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Cursors {
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Paging {
    #[serde(default)]
    cursors: Cursors,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<ListUser>,
    #[serde(default)]
    paging: Option<Paging>,
}

impl ListResponse {
    /// Graph API omits `paging.next` on the last page even when an `after`
    /// cursor is still present.
    fn into_page(self) -> Page<RelationshipEntry> {
        let next_cursor = self
            .paging
            .filter(|p| p.next.is_some())
            .and_then(|p| p.cursors.after);
        Page::new(
            self.data.into_iter().filter_map(ListUser::into_entry).collect(),
            next_cursor,
        )
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Instagram Graph API. Requires `INSTAGRAM_ACCESS_TOKEN` issued to the
/// analyzed account.
pub struct GraphApiSource {
    ctx: SourceContext,
    paging: ListPaging,
    token: Option<String>,
}

impl GraphApiSource {
    pub(crate) fn new(ctx: SourceContext, paging: ListPaging, token: Option<String>) -> Self {
        Self { ctx, paging, token }
    }

    async fn fetch_edge(
        &self,
        user_id: &str,
        edge: &str,
        token: &str,
    ) -> Result<Vec<RelationshipEntry>, SourceError> {
        let base = format!("{}/{API_VERSION}/{user_id}/{edge}", self.ctx.endpoints.graph_api);
        let limit = self.paging.page_size.to_string();
        let context = format!("{NAME} {edge}");
        collect_pages(&self.paging.limits, &context, |cursor| {
            let base = base.clone();
            let limit = limit.clone();
            async move {
                let mut pairs = vec![
                    ("fields", "username,name,profile_picture_url"),
                    ("limit", limit.as_str()),
                    ("access_token", token),
                ];
                if let Some(after) = cursor.as_deref() {
                    pairs.push(("after", after));
                }
                let url = url_with_query(&base, &pairs)?;
                let response: ListResponse = self.ctx.client.get_json(&url, json_headers()).await?;
                Ok(response.into_page())
            }
        })
        .await
    }
}

#[async_trait]
impl RelationshipSource for GraphApiSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_lists(&self, profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SourceError::unavailable(NAME, "INSTAGRAM_ACCESS_TOKEN not configured"))?;

        let me_url = url_with_query(
            &format!("{}/{API_VERSION}/me", self.ctx.endpoints.graph_api),
            &[("fields", "id,username,account_type"), ("access_token", token)],
        )?;
        let me: MeResponse = self.ctx.client.get_json(&me_url, json_headers()).await?;
        ensure_token_owner(NAME, me.username.as_deref(), profile)?;
        let user_id = me.id.ok_or(SourceError::MissingField {
            source_name: NAME,
            field: "id",
        })?;

        let followers = self.fetch_edge(&user_id, "followers", token).await?;
        let following = self.fetch_edge(&user_id, "following", token).await?;
        Ok(RelationshipLists {
            followers,
            following,
        })
    }
}

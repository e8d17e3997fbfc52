use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

use crate::error::SourceError;
use crate::pagination::{collect_pages, Page};
use crate::sources::{url_with_query, SourceContext};
use crate::types::{string_or_number, ListUser};

use super::{ensure_token_owner, ListPaging, RelationshipLists, RelationshipSource};

const NAME: &str = "basic_display";

#[derive(Debug, Default, Deserialize)]
struct SelfUser {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelfResponse {
    #[serde(default)]
    data: Option<SelfUser>,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<ListUser>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Legacy `/v1` user endpoints keyed by access token. Requires
/// `INSTAGRAM_ACCESS_TOKEN` issued to the analyzed account.
pub struct BasicDisplaySource {
    ctx: SourceContext,
    paging: ListPaging,
    token: Option<String>,
}

impl BasicDisplaySource {
    pub(crate) fn new(ctx: SourceContext, paging: ListPaging, token: Option<String>) -> Self {
        Self { ctx, paging, token }
    }

    async fn fetch_edge(
        &self,
        user_id: &str,
        edge: &str,
        token: &str,
    ) -> Result<Vec<RelationshipEntry>, SourceError> {
        let base = format!("{}/v1/users/{user_id}/{edge}", self.ctx.endpoints.basic_display);
        let count = self.paging.page_size.to_string();
        let context = format!("{NAME} {edge}");
        collect_pages(&self.paging.limits, &context, |cursor| {
            let base = base.clone();
            let count = count.clone();
            async move {
                let mut pairs = vec![("access_token", token), ("count", count.as_str())];
                if let Some(cursor) = cursor.as_deref() {
                    pairs.push(("cursor", cursor));
                }
                let url = url_with_query(&base, &pairs)?;
                let response: ListResponse = self.ctx.client.get_json(&url, accept_json()).await?;
                Ok(Page::new(
                    response
                        .data
                        .into_iter()
                        .filter_map(ListUser::into_entry)
                        .collect(),
                    response.pagination.and_then(|p| p.next_cursor),
                ))
            }
        })
        .await
    }
}

fn accept_json() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[async_trait]
impl RelationshipSource for BasicDisplaySource {
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

        let self_url = url_with_query(
            &format!("{}/v1/users/self", self.ctx.endpoints.basic_display),
            &[("access_token", token)],
        )?;
        let me: SelfResponse = self.ctx.client.get_json(&self_url, accept_json()).await?;
        let me = me.data.unwrap_or_default();
        ensure_token_owner(NAME, me.username.as_deref(), profile)?;
        let user_id = me.id.ok_or(SourceError::MissingField {
            source_name: NAME,
            field: "data.id",
        })?;

        let followers = self.fetch_edge(&user_id, "followed-by", token).await?;
        let following = self.fetch_edge(&user_id, "follows", token).await?;
        Ok(RelationshipLists {
            followers,
            following,
        })
    }
}

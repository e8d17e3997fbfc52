use async_trait::async_trait;
use followback_core::{ProfileSnapshot, RelationshipEntry};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::client::headers::apply_session;
use crate::client::{bootstrap_session, mobile_headers};
use crate::error::SourceError;
use crate::pagination::{collect_pages, Page};
use crate::sources::mobile_api::fetch_web_profile_info;
use crate::sources::{url_with_query, SourceContext};
use crate::types::{string_or_number, ListUser};

use super::{ListPaging, RelationshipLists, RelationshipSource};

const NAME: &str = "friendships";

#[derive(Debug, Deserialize)]
struct FriendshipsResponse {
    #[serde(default)]
    users: Vec<ListUser>,
    #[serde(default, deserialize_with = "string_or_number")]
    next_max_id: Option<String>,
}

/// Mobile friendships endpoints, sent as the app with whatever session the
/// landing page handed out. Needs the numeric user id, resolved through
/// `web_profile_info` when the snapshot lacks one.
pub struct FriendshipsSource {
    ctx: SourceContext,
    paging: ListPaging,
}

impl FriendshipsSource {
    pub(crate) fn new(ctx: SourceContext, paging: ListPaging) -> Self {
        Self { ctx, paging }
    }

    async fn resolve_user_id(
        &self,
        profile: &ProfileSnapshot,
        headers: &HeaderMap,
    ) -> Result<String, SourceError> {
        if let Some(id) = &profile.internal_user_id {
            return Ok(id.clone());
        }
        let raw = fetch_web_profile_info(
            &self.ctx,
            &self.ctx.endpoints.mobile_api,
            headers.clone(),
            &profile.username,
        )
        .await?;
        raw.internal_user_id.ok_or(SourceError::MissingField {
            source_name: NAME,
            field: "data.user.id",
        })
    }

    async fn fetch_edge(
        &self,
        user_id: &str,
        edge: &str,
        headers: &HeaderMap,
    ) -> Result<Vec<RelationshipEntry>, SourceError> {
        let base = format!(
            "{}/api/v1/friendships/{user_id}/{edge}/",
            self.ctx.endpoints.mobile_api
        );
        let count = self.paging.page_size.to_string();
        let context = format!("{NAME} {edge}");
        collect_pages(&self.paging.limits, &context, |cursor| {
            let base = base.clone();
            let count = count.clone();
            let headers = headers.clone();
            async move {
                let mut pairs = vec![("count", count.as_str())];
                if let Some(max_id) = cursor.as_deref() {
                    pairs.push(("max_id", max_id));
                }
                let url = url_with_query(&base, &pairs)?;
                let response: FriendshipsResponse = self.ctx.client.get_json(&url, headers).await?;
                Ok(Page::new(
                    response
                        .users
                        .into_iter()
                        .filter_map(ListUser::into_entry)
                        .collect(),
                    response.next_max_id,
                ))
            }
        })
        .await
    }
}

#[async_trait]
impl RelationshipSource for FriendshipsSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_lists(&self, profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        let mut headers = mobile_headers();
        if let Some(session) = bootstrap_session(&self.ctx.client, &self.ctx.endpoints.web).await {
            apply_session(&mut headers, &session);
        }

        let user_id = self.resolve_user_id(profile, &headers).await?;
        let followers = self.fetch_edge(&user_id, "followers", &headers).await?;
        let following = self.fetch_edge(&user_id, "following", &headers).await?;
        Ok(RelationshipLists {
            followers,
            following,
        })
    }
}

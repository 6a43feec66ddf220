use axum::extract::State;
use uuid::Uuid;

use crate::domain::entities::ArticleRecord;
use crate::infra::http::{
    models::{ArticleRequest, PublishRequest, PublishedQuery},
    response::{ActionJson, ActionPath, ActionQuery, ActionResponse, ActionResult},
};

use super::AdminState;

pub(super) async fn list_articles(
    State(state): State<AdminState>,
    ActionQuery(query): ActionQuery<PublishedQuery>,
) -> ActionResult<Vec<ArticleRecord>> {
    let articles = state.articles.list(query.published).await?;
    Ok(ActionResponse::ok(articles))
}

pub(super) async fn get_article(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<ArticleRecord> {
    Ok(ActionResponse::ok(state.articles.get(id).await?))
}

pub(super) async fn create_article(
    State(state): State<AdminState>,
    ActionJson(request): ActionJson<ArticleRequest>,
) -> ActionResult<ArticleRecord> {
    let article = state.articles.create(request.into()).await?;
    Ok(ActionResponse::created(article).with_message("Article created"))
}

pub(super) async fn update_article(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<ArticleRequest>,
) -> ActionResult<ArticleRecord> {
    let current = state.articles.get(id).await?;
    let article = state
        .articles
        .update(request.into_update(id, current.slug))
        .await?;
    Ok(ActionResponse::ok(article).with_message("Article updated"))
}

pub(super) async fn publish_article(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
    ActionJson(request): ActionJson<PublishRequest>,
) -> ActionResult<ArticleRecord> {
    let article = state.articles.set_published(id, request.published).await?;
    Ok(ActionResponse::ok(article))
}

pub(super) async fn delete_article(
    State(state): State<AdminState>,
    ActionPath(id): ActionPath<Uuid>,
) -> ActionResult<()> {
    state.articles.delete(id).await?;
    Ok(ActionResponse::done("Article deleted"))
}

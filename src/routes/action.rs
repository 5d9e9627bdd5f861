use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::action::{Action, ActionForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{ActionFormTemplate, ActionListTemplate},
};

#[get("/actions")]
pub async fn get_actions(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Action>().await?;
    render(&ActionListTemplate { ctx, items })
}

#[get("/actions/new")]
pub async fn new_action(ctx: RequestContext) -> Result<HttpResponse> {
    render(&ActionFormTemplate::new(
        ctx,
        "/actions/new".to_string(),
        false,
        ActionForm::default(),
    ))
}

#[post("/actions/new")]
pub async fn create_action(
    db: web::Data<Database>,
    payload: web::Form<ActionForm>,
) -> Result<HttpResponse> {
    let mut action = payload.into_inner().into_action()?;
    db.insert(&mut action).await?;
    Ok(redirect_with_flash("/actions", "Action créée."))
}

#[get("/actions/{_id}/edit")]
pub async fn edit_action(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Action>(&_id)?;
    let action = db.get::<Action>(&_id).await?;
    render(&ActionFormTemplate::new(
        ctx,
        format!("/actions/{}/edit", _id.to_hex()),
        true,
        ActionForm::from(&action),
    ))
}

#[post("/actions/{_id}/edit")]
pub async fn update_action(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<ActionForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Action>(&_id)?;
    let mut action = db.get::<Action>(&_id).await?;
    payload.into_inner().apply(&mut action)?;
    db.replace(&action).await?;
    Ok(redirect_with_flash("/actions", "Action mise à jour."))
}

#[post("/actions/{_id}/delete")]
pub async fn delete_action(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Action>(&_id)?;
    db.delete::<Action>(&_id).await?;
    Ok(redirect_with_flash("/actions", "Action supprimée."))
}

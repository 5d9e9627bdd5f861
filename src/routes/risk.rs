use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::risk::{Risk, RiskForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{RiskFormTemplate, RiskListTemplate},
};

#[get("/risks")]
pub async fn get_risks(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Risk>().await?;
    render(&RiskListTemplate { ctx, items })
}

#[get("/risks/new")]
pub async fn new_risk(ctx: RequestContext) -> Result<HttpResponse> {
    render(&RiskFormTemplate::new(
        ctx,
        "/risks/new".to_string(),
        false,
        RiskForm::default(),
    ))
}

#[post("/risks/new")]
pub async fn create_risk(
    db: web::Data<Database>,
    payload: web::Form<RiskForm>,
) -> Result<HttpResponse> {
    let mut risk = payload.into_inner().into_risk()?;
    db.insert(&mut risk).await?;
    Ok(redirect_with_flash("/risks", "Risque créé."))
}

#[get("/risks/{_id}/edit")]
pub async fn edit_risk(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Risk>(&_id)?;
    let risk = db.get::<Risk>(&_id).await?;
    render(&RiskFormTemplate::new(
        ctx,
        format!("/risks/{}/edit", _id.to_hex()),
        true,
        RiskForm::from(&risk),
    ))
}

#[post("/risks/{_id}/edit")]
pub async fn update_risk(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<RiskForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Risk>(&_id)?;
    let mut risk = db.get::<Risk>(&_id).await?;
    payload.into_inner().apply(&mut risk)?;
    db.replace(&risk).await?;
    Ok(redirect_with_flash("/risks", "Risque mis à jour."))
}

#[post("/risks/{_id}/delete")]
pub async fn delete_risk(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Risk>(&_id)?;
    db.delete::<Risk>(&_id).await?;
    Ok(redirect_with_flash("/risks", "Risque supprimé."))
}

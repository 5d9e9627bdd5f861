use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::waste::{Waste, WasteForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{WasteFormTemplate, WasteListTemplate},
};

#[get("/waste")]
pub async fn get_wastes(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Waste>().await?;
    render(&WasteListTemplate { ctx, items })
}

#[get("/waste/new")]
pub async fn new_waste(ctx: RequestContext) -> Result<HttpResponse> {
    render(&WasteFormTemplate::new(
        ctx,
        "/waste/new".to_string(),
        false,
        WasteForm::default(),
    ))
}

#[post("/waste/new")]
pub async fn create_waste(
    db: web::Data<Database>,
    payload: web::Form<WasteForm>,
) -> Result<HttpResponse> {
    let mut waste = payload.into_inner().into_waste()?;
    db.insert(&mut waste).await?;
    Ok(redirect_with_flash("/waste", "Flux déchets enregistré."))
}

#[get("/waste/{_id}/edit")]
pub async fn edit_waste(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Waste>(&_id)?;
    let waste = db.get::<Waste>(&_id).await?;
    render(&WasteFormTemplate::new(
        ctx,
        format!("/waste/{}/edit", _id.to_hex()),
        true,
        WasteForm::from(&waste),
    ))
}

#[post("/waste/{_id}/edit")]
pub async fn update_waste(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<WasteForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Waste>(&_id)?;
    let mut waste = db.get::<Waste>(&_id).await?;
    payload.into_inner().apply(&mut waste)?;
    db.replace(&waste).await?;
    Ok(redirect_with_flash("/waste", "Flux déchets mis à jour."))
}

#[post("/waste/{_id}/delete")]
pub async fn delete_waste(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Waste>(&_id)?;
    db.delete::<Waste>(&_id).await?;
    Ok(redirect_with_flash("/waste", "Flux déchets supprimé."))
}

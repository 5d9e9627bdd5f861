use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::equipment::{Equipment, EquipmentForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{EquipmentFormTemplate, EquipmentListTemplate},
};

#[get("/equipment")]
pub async fn get_equipment(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Equipment>().await?;
    render(&EquipmentListTemplate { ctx, items })
}

#[get("/equipment/new")]
pub async fn new_equipment(ctx: RequestContext) -> Result<HttpResponse> {
    render(&EquipmentFormTemplate::new(
        ctx,
        "/equipment/new".to_string(),
        false,
        EquipmentForm::default(),
    ))
}

#[post("/equipment/new")]
pub async fn create_equipment(
    db: web::Data<Database>,
    payload: web::Form<EquipmentForm>,
) -> Result<HttpResponse> {
    let mut equipment = payload.into_inner().into_equipment()?;
    db.insert(&mut equipment).await?;
    Ok(redirect_with_flash("/equipment", "Équipement enregistré."))
}

#[get("/equipment/{_id}/edit")]
pub async fn edit_equipment(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Equipment>(&_id)?;
    let equipment = db.get::<Equipment>(&_id).await?;
    render(&EquipmentFormTemplate::new(
        ctx,
        format!("/equipment/{}/edit", _id.to_hex()),
        true,
        EquipmentForm::from(&equipment),
    ))
}

#[post("/equipment/{_id}/edit")]
pub async fn update_equipment(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<EquipmentForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Equipment>(&_id)?;
    let mut equipment = db.get::<Equipment>(&_id).await?;
    payload.into_inner().apply(&mut equipment)?;
    db.replace(&equipment).await?;
    Ok(redirect_with_flash("/equipment", "Équipement mis à jour."))
}

#[post("/equipment/{_id}/delete")]
pub async fn delete_equipment(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Equipment>(&_id)?;
    db.delete::<Equipment>(&_id).await?;
    Ok(redirect_with_flash("/equipment", "Équipement supprimé."))
}

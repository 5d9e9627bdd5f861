use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::audit::{Audit, AuditForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{AuditFormTemplate, AuditListTemplate},
};

#[get("/audits")]
pub async fn get_audits(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Audit>().await?;
    render(&AuditListTemplate { ctx, items })
}

#[get("/audits/new")]
pub async fn new_audit(ctx: RequestContext) -> Result<HttpResponse> {
    render(&AuditFormTemplate::new(
        ctx,
        "/audits/new".to_string(),
        false,
        AuditForm::default(),
    ))
}

#[post("/audits/new")]
pub async fn create_audit(
    db: web::Data<Database>,
    payload: web::Form<AuditForm>,
) -> Result<HttpResponse> {
    let mut audit = payload.into_inner().into_audit()?;
    db.insert(&mut audit).await?;
    Ok(redirect_with_flash("/audits", "Audit créé."))
}

#[get("/audits/{_id}/edit")]
pub async fn edit_audit(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Audit>(&_id)?;
    let audit = db.get::<Audit>(&_id).await?;
    render(&AuditFormTemplate::new(
        ctx,
        format!("/audits/{}/edit", _id.to_hex()),
        true,
        AuditForm::from(&audit),
    ))
}

#[post("/audits/{_id}/edit")]
pub async fn update_audit(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<AuditForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Audit>(&_id)?;
    let mut audit = db.get::<Audit>(&_id).await?;
    payload.into_inner().apply(&mut audit)?;
    db.replace(&audit).await?;
    Ok(redirect_with_flash("/audits", "Audit mis à jour."))
}

#[post("/audits/{_id}/delete")]
pub async fn delete_audit(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Audit>(&_id)?;
    db.delete::<Audit>(&_id).await?;
    Ok(redirect_with_flash("/audits", "Audit supprimé."))
}

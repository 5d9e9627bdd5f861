use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::sds::{Sds, SdsForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{SdsFormTemplate, SdsListTemplate},
};

#[get("/sds")]
pub async fn get_sds_list(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Sds>().await?;
    render(&SdsListTemplate { ctx, items })
}

#[get("/sds/new")]
pub async fn new_sds(ctx: RequestContext) -> Result<HttpResponse> {
    render(&SdsFormTemplate {
        ctx,
        target: "/sds/new".to_string(),
        editing: false,
        form: SdsForm::default(),
    })
}

#[post("/sds/new")]
pub async fn create_sds(
    db: web::Data<Database>,
    payload: web::Form<SdsForm>,
) -> Result<HttpResponse> {
    let mut sds = payload.into_inner().into_sds()?;
    db.insert(&mut sds).await?;
    Ok(redirect_with_flash("/sds", "FDS enregistrée."))
}

#[get("/sds/{_id}/edit")]
pub async fn edit_sds(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Sds>(&_id)?;
    let sds = db.get::<Sds>(&_id).await?;
    render(&SdsFormTemplate {
        ctx,
        target: format!("/sds/{}/edit", _id.to_hex()),
        editing: true,
        form: SdsForm::from(&sds),
    })
}

#[post("/sds/{_id}/edit")]
pub async fn update_sds(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<SdsForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Sds>(&_id)?;
    let mut sds = db.get::<Sds>(&_id).await?;
    payload.into_inner().apply(&mut sds)?;
    db.replace(&sds).await?;
    Ok(redirect_with_flash("/sds", "FDS mise à jour."))
}

#[post("/sds/{_id}/delete")]
pub async fn delete_sds(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Sds>(&_id)?;
    db.delete::<Sds>(&_id).await?;
    Ok(redirect_with_flash("/sds", "FDS supprimée."))
}

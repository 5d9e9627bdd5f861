use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::training::{Training, TrainingForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{TrainingFormTemplate, TrainingListTemplate},
};

#[get("/training")]
pub async fn get_trainings(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Training>().await?;
    render(&TrainingListTemplate { ctx, items })
}

#[get("/training/new")]
pub async fn new_training(ctx: RequestContext) -> Result<HttpResponse> {
    render(&TrainingFormTemplate::new(
        ctx,
        "/training/new".to_string(),
        false,
        TrainingForm::default(),
    ))
}

#[post("/training/new")]
pub async fn create_training(
    db: web::Data<Database>,
    payload: web::Form<TrainingForm>,
) -> Result<HttpResponse> {
    let mut training = payload.into_inner().into_training()?;
    db.insert(&mut training).await?;
    Ok(redirect_with_flash("/training", "Formation enregistrée."))
}

#[get("/training/{_id}/edit")]
pub async fn edit_training(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Training>(&_id)?;
    let training = db.get::<Training>(&_id).await?;
    render(&TrainingFormTemplate::new(
        ctx,
        format!("/training/{}/edit", _id.to_hex()),
        true,
        TrainingForm::from(&training),
    ))
}

#[post("/training/{_id}/edit")]
pub async fn update_training(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<TrainingForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Training>(&_id)?;
    let mut training = db.get::<Training>(&_id).await?;
    payload.into_inner().apply(&mut training)?;
    db.replace(&training).await?;
    Ok(redirect_with_flash("/training", "Formation mise à jour."))
}

#[post("/training/{_id}/delete")]
pub async fn delete_training(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Training>(&_id)?;
    db.delete::<Training>(&_id).await?;
    Ok(redirect_with_flash("/training", "Formation supprimée."))
}

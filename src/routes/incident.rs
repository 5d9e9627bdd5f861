use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::incident::{Incident, IncidentForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{IncidentFormTemplate, IncidentListTemplate},
};

#[get("/incidents")]
pub async fn get_incidents(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<Incident>().await?;
    render(&IncidentListTemplate { ctx, items })
}

#[get("/incidents/new")]
pub async fn new_incident(ctx: RequestContext) -> Result<HttpResponse> {
    render(&IncidentFormTemplate::new(
        ctx,
        "/incidents/new".to_string(),
        false,
        IncidentForm::default(),
    ))
}

#[post("/incidents/new")]
pub async fn create_incident(
    db: web::Data<Database>,
    payload: web::Form<IncidentForm>,
) -> Result<HttpResponse> {
    let mut incident = payload.into_inner().into_incident()?;
    db.insert(&mut incident).await?;
    Ok(redirect_with_flash("/incidents", "Incident créé."))
}

#[get("/incidents/{_id}/edit")]
pub async fn edit_incident(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Incident>(&_id)?;
    let incident = db.get::<Incident>(&_id).await?;
    render(&IncidentFormTemplate::new(
        ctx,
        format!("/incidents/{}/edit", _id.to_hex()),
        true,
        IncidentForm::from(&incident),
    ))
}

#[post("/incidents/{_id}/edit")]
pub async fn update_incident(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<IncidentForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Incident>(&_id)?;
    let mut incident = db.get::<Incident>(&_id).await?;
    payload.into_inner().apply(&mut incident)?;
    db.replace(&incident).await?;
    Ok(redirect_with_flash("/incidents", "Incident mis à jour."))
}

#[post("/incidents/{_id}/delete")]
pub async fn delete_incident(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Incident>(&_id)?;
    db.delete::<Incident>(&_id).await?;
    Ok(redirect_with_flash("/incidents", "Incident supprimé."))
}

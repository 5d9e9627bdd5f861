use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::{
        absence::{with_member_names, Absence, AbsenceForm},
        team_member::TeamMember,
    },
    routes::{parse_id, redirect_with_flash, render},
    views::{AbsenceFormTemplate, AbsenceListTemplate},
};

#[get("/absences")]
pub async fn get_absences(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let members = db.find_many::<TeamMember>().await?;
    let absences = db.find_many::<Absence>().await?;
    render(&AbsenceListTemplate {
        ctx,
        items: with_member_names(absences, &members),
        members,
    })
}

#[get("/absences/new")]
pub async fn new_absence(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let members = db.find_many::<TeamMember>().await?;
    render(&AbsenceFormTemplate::new(
        ctx,
        "/absences/new".to_string(),
        false,
        AbsenceForm::default(),
        &members,
    ))
}

#[post("/absences/new")]
pub async fn create_absence(
    db: web::Data<Database>,
    payload: web::Form<AbsenceForm>,
) -> Result<HttpResponse> {
    let mut absence = payload.into_inner().into_absence()?;
    absence.save(&db).await?;
    Ok(redirect_with_flash("/absences", "Absence ajoutée."))
}

#[get("/absences/{_id}/edit")]
pub async fn edit_absence(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Absence>(&_id)?;
    let absence = db.get::<Absence>(&_id).await?;
    let members = db.find_many::<TeamMember>().await?;
    render(&AbsenceFormTemplate::new(
        ctx,
        format!("/absences/{}/edit", _id.to_hex()),
        true,
        AbsenceForm::from(&absence),
        &members,
    ))
}

#[post("/absences/{_id}/edit")]
pub async fn update_absence(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<AbsenceForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Absence>(&_id)?;
    let mut absence = db.get::<Absence>(&_id).await?;
    payload.into_inner().apply(&mut absence)?;
    absence.update(&db).await?;
    Ok(redirect_with_flash("/absences", "Absence mise à jour."))
}

#[post("/absences/{_id}/delete")]
pub async fn delete_absence(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<Absence>(&_id)?;
    db.delete::<Absence>(&_id).await?;
    Ok(redirect_with_flash("/absences", "Absence supprimée."))
}

use actix_web::{get, post, web, HttpResponse};

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::team_member::{TeamMember, TeamMemberForm},
    routes::{parse_id, redirect_with_flash, render},
    views::{TeamFormTemplate, TeamListTemplate},
};

#[get("/team")]
pub async fn get_members(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let items = db.find_many::<TeamMember>().await?;
    render(&TeamListTemplate { ctx, items })
}

#[get("/team/new")]
pub async fn new_member(ctx: RequestContext) -> Result<HttpResponse> {
    render(&TeamFormTemplate::new(
        ctx,
        "/team/new".to_string(),
        false,
        TeamMemberForm::default(),
    ))
}

#[post("/team/new")]
pub async fn create_member(
    db: web::Data<Database>,
    payload: web::Form<TeamMemberForm>,
) -> Result<HttpResponse> {
    let mut member = payload.into_inner().into_member()?;
    db.insert(&mut member).await?;
    Ok(redirect_with_flash("/team", "Membre d'équipe ajouté."))
}

#[get("/team/{_id}/edit")]
pub async fn edit_member(
    db: web::Data<Database>,
    ctx: RequestContext,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<TeamMember>(&_id)?;
    let member = db.get::<TeamMember>(&_id).await?;
    render(&TeamFormTemplate::new(
        ctx,
        format!("/team/{}/edit", _id.to_hex()),
        true,
        TeamMemberForm::from(&member),
    ))
}

#[post("/team/{_id}/edit")]
pub async fn update_member(
    db: web::Data<Database>,
    _id: web::Path<String>,
    payload: web::Form<TeamMemberForm>,
) -> Result<HttpResponse> {
    let _id = parse_id::<TeamMember>(&_id)?;
    let mut member = db.get::<TeamMember>(&_id).await?;
    payload.into_inner().apply(&mut member)?;
    db.replace(&member).await?;
    Ok(redirect_with_flash("/team", "Membre mis à jour."))
}

#[post("/team/{_id}/delete")]
pub async fn delete_member(
    db: web::Data<Database>,
    _id: web::Path<String>,
) -> Result<HttpResponse> {
    let _id = parse_id::<TeamMember>(&_id)?;
    TeamMember::delete_by_id(&db, &_id).await?;
    Ok(redirect_with_flash("/team", "Membre supprimé."))
}

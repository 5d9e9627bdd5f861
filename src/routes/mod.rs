use actix_web::{
    get,
    http::{
        header::{self, ContentType},
        StatusCode, Uri,
    },
    post, web, HttpRequest, HttpResponse,
};
use askama::Template;
use mime_guess::from_path;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::{fs, str::FromStr};

use crate::{
    config::Config,
    context::{flash_cookie, initials_cookie},
    database::Record,
    error::{Error, Result},
    forms::normalize_initials,
};

pub mod absence;
pub mod action;
pub mod audit;
pub mod dashboard;
pub mod equipment;
pub mod incident;
pub mod risk;
pub mod sds;
pub mod team;
pub mod training;
pub mod waste;

pub fn render(template: &impl Template) -> Result<HttpResponse> {
    let body = template.render()?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// 303 to `location`, leaving `message` in the flash cookie for the next page.
pub fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::SEE_OTHER)
        .insert_header((header::LOCATION, location.to_string()))
        .cookie(flash_cookie(message))
        .finish()
}

/// A malformed id can never match a record, so it is reported as not found.
pub fn parse_id<T: Record>(_id: &str) -> Result<ObjectId> {
    ObjectId::from_str(_id).map_err(|_| Error::NotFound(T::NAME))
}

#[derive(Deserialize)]
pub struct InitialsPayload {
    #[serde(default)]
    pub initials: String,
}

fn referer_path(req: &HttpRequest) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|path| path.to_string()))
        .filter(|path| path.starts_with('/'))
        .unwrap_or_else(|| "/".to_string())
}

#[post("/set-initials")]
pub async fn set_initials(payload: web::Form<InitialsPayload>, req: HttpRequest) -> HttpResponse {
    let initials = normalize_initials(&payload.initials);
    tracing::debug!(%initials, "initials updated");

    let mut response = redirect_with_flash(&referer_path(&req), "Initiales mises à jour.");
    if let Err(error) = response.add_cookie(&initials_cookie(&initials)) {
        tracing::error!(%error, "failed to set initials cookie");
    }
    response
}

#[get("/static/{name}")]
pub async fn get_static(name: web::Path<String>, config: web::Data<Config>) -> HttpResponse {
    let name = name.into_inner();
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return HttpResponse::NotFound().body("CONTENT_NOT_FOUND");
    }

    let path = config.static_dir.join(&name);
    if let Ok(file) = fs::read(&path) {
        let mime = from_path(&path).first_or_octet_stream();
        HttpResponse::Ok().content_type(mime).body(file)
    } else {
        HttpResponse::NotFound().body("CONTENT_NOT_FOUND")
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard::get_dashboard)
        .service(set_initials)
        .service(get_static)
        .service(action::get_actions)
        .service(action::new_action)
        .service(action::create_action)
        .service(action::edit_action)
        .service(action::update_action)
        .service(action::delete_action)
        .service(risk::get_risks)
        .service(risk::new_risk)
        .service(risk::create_risk)
        .service(risk::edit_risk)
        .service(risk::update_risk)
        .service(risk::delete_risk)
        .service(audit::get_audits)
        .service(audit::new_audit)
        .service(audit::create_audit)
        .service(audit::edit_audit)
        .service(audit::update_audit)
        .service(audit::delete_audit)
        .service(incident::get_incidents)
        .service(incident::new_incident)
        .service(incident::create_incident)
        .service(incident::edit_incident)
        .service(incident::update_incident)
        .service(incident::delete_incident)
        .service(training::get_trainings)
        .service(training::new_training)
        .service(training::create_training)
        .service(training::edit_training)
        .service(training::update_training)
        .service(training::delete_training)
        .service(sds::get_sds_list)
        .service(sds::new_sds)
        .service(sds::create_sds)
        .service(sds::edit_sds)
        .service(sds::update_sds)
        .service(sds::delete_sds)
        .service(waste::get_wastes)
        .service(waste::new_waste)
        .service(waste::create_waste)
        .service(waste::edit_waste)
        .service(waste::update_waste)
        .service(waste::delete_waste)
        .service(equipment::get_equipment)
        .service(equipment::new_equipment)
        .service(equipment::create_equipment)
        .service(equipment::edit_equipment)
        .service(equipment::update_equipment)
        .service(equipment::delete_equipment)
        .service(team::get_members)
        .service(team::new_member)
        .service(team::create_member)
        .service(team::edit_member)
        .service(team::update_member)
        .service(team::delete_member)
        .service(absence::get_absences)
        .service(absence::new_absence)
        .service(absence::create_absence)
        .service(absence::edit_absence)
        .service(absence::update_absence)
        .service(absence::delete_absence);
}

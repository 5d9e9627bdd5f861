use actix_web::{get, web, HttpResponse};
use chrono::Local;

use crate::{
    context::RequestContext,
    database::Database,
    error::Result,
    models::dashboard::Dashboard,
    routes::render,
    views::DashboardTemplate,
};

#[get("/")]
pub async fn get_dashboard(db: web::Data<Database>, ctx: RequestContext) -> Result<HttpResponse> {
    let dashboard = Dashboard::collect(&db, Local::now().date_naive()).await?;
    render(&DashboardTemplate { ctx, dashboard })
}

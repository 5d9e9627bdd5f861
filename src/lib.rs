//! HSE record keeping: corrective actions, risks, audits, incidents,
//! trainings, safety data sheets, waste, equipment checks and the team roster,
//! served as server-rendered HTML over MongoDB.

pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod forms;
pub mod models;
pub mod routes;
pub mod telemetry;
pub mod views;

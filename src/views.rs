//! HTML pages rendered with askama. Templates live in `templates/`.

use askama::Template;

use crate::{
    context::RequestContext,
    database::Record,
    forms::{choice_options, optional_choice_options, SelectOption},
    models::{
        absence::{member_options, AbsenceForm, AbsenceRow},
        action::{Action, ActionForm, ActionStatus},
        audit::{Audit, AuditForm, AuditStatus},
        dashboard::Dashboard,
        equipment::{Equipment, EquipmentForm, EquipmentStatus},
        incident::{Incident, IncidentForm, IncidentSeverity, IncidentStatus},
        risk::{Risk, RiskForm, RiskStatus},
        sds::{Sds, SdsForm},
        team_member::{MemberStatus, TeamMember, TeamMemberForm},
        training::{Training, TrainingForm, TrainingStatus},
        waste::{Waste, WasteForm, WasteStatus},
    },
};

mod filters {
    use chrono::NaiveDate;
    use std::borrow::Borrow;

    pub fn date<T: Borrow<Option<NaiveDate>>>(value: T) -> ::askama::Result<String> {
        Ok(crate::forms::format_date(*value.borrow()))
    }

    pub fn text<T: Borrow<Option<String>>>(value: T) -> ::askama::Result<String> {
        Ok(value.borrow().clone().unwrap_or_default())
    }

    pub fn timestamp<T: Borrow<mongodb::bson::DateTime>>(value: T) -> ::askama::Result<String> {
        let rfc3339 = value.borrow().try_to_rfc3339_string().unwrap_or_default();
        Ok(rfc3339.get(..16).unwrap_or(&rfc3339).replace('T', " "))
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub code: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: RequestContext,
    pub dashboard: Dashboard,
}

#[derive(Template)]
#[template(path = "actions_list.html")]
pub struct ActionListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Action>,
}

#[derive(Template)]
#[template(path = "actions_form.html")]
pub struct ActionFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: ActionForm,
    pub statuses: Vec<SelectOption>,
}

impl ActionFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: ActionForm) -> Self {
        let statuses = choice_options::<ActionStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "risks_list.html")]
pub struct RiskListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Risk>,
}

#[derive(Template)]
#[template(path = "risks_form.html")]
pub struct RiskFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: RiskForm,
    pub statuses: Vec<SelectOption>,
}

impl RiskFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: RiskForm) -> Self {
        let statuses = choice_options::<RiskStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "audits_list.html")]
pub struct AuditListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Audit>,
}

#[derive(Template)]
#[template(path = "audits_form.html")]
pub struct AuditFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: AuditForm,
    pub statuses: Vec<SelectOption>,
}

impl AuditFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: AuditForm) -> Self {
        let statuses = choice_options::<AuditStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "incidents_list.html")]
pub struct IncidentListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Incident>,
}

#[derive(Template)]
#[template(path = "incidents_form.html")]
pub struct IncidentFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: IncidentForm,
    pub statuses: Vec<SelectOption>,
    pub severities: Vec<SelectOption>,
}

impl IncidentFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: IncidentForm) -> Self {
        let statuses = choice_options::<IncidentStatus>(&form.status);
        let severities = optional_choice_options::<IncidentSeverity>(&form.severity);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
            severities,
        }
    }
}

#[derive(Template)]
#[template(path = "training_list.html")]
pub struct TrainingListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Training>,
}

#[derive(Template)]
#[template(path = "training_form.html")]
pub struct TrainingFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: TrainingForm,
    pub statuses: Vec<SelectOption>,
}

impl TrainingFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: TrainingForm) -> Self {
        let statuses = choice_options::<TrainingStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }

    pub fn required_checked(&self) -> bool {
        crate::forms::checkbox(&self.form.required)
    }
}

#[derive(Template)]
#[template(path = "sds_list.html")]
pub struct SdsListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Sds>,
}

#[derive(Template)]
#[template(path = "sds_form.html")]
pub struct SdsFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: SdsForm,
}

#[derive(Template)]
#[template(path = "waste_list.html")]
pub struct WasteListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Waste>,
}

#[derive(Template)]
#[template(path = "waste_form.html")]
pub struct WasteFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: WasteForm,
    pub statuses: Vec<SelectOption>,
}

impl WasteFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: WasteForm) -> Self {
        let statuses = choice_options::<WasteStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "equipment_list.html")]
pub struct EquipmentListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<Equipment>,
}

#[derive(Template)]
#[template(path = "equipment_form.html")]
pub struct EquipmentFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: EquipmentForm,
    pub statuses: Vec<SelectOption>,
}

impl EquipmentFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: EquipmentForm) -> Self {
        let statuses = choice_options::<EquipmentStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "team_list.html")]
pub struct TeamListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<TeamMember>,
}

#[derive(Template)]
#[template(path = "team_form.html")]
pub struct TeamFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: TeamMemberForm,
    pub statuses: Vec<SelectOption>,
}

impl TeamFormTemplate {
    pub fn new(ctx: RequestContext, target: String, editing: bool, form: TeamMemberForm) -> Self {
        let statuses = choice_options::<MemberStatus>(&form.status);
        Self {
            ctx,
            target,
            editing,
            form,
            statuses,
        }
    }
}

#[derive(Template)]
#[template(path = "absences_list.html")]
pub struct AbsenceListTemplate {
    pub ctx: RequestContext,
    pub items: Vec<AbsenceRow>,
    pub members: Vec<TeamMember>,
}

#[derive(Template)]
#[template(path = "absences_form.html")]
pub struct AbsenceFormTemplate {
    pub ctx: RequestContext,
    pub target: String,
    pub editing: bool,
    pub form: AbsenceForm,
    pub members: Vec<SelectOption>,
}

impl AbsenceFormTemplate {
    pub fn new(
        ctx: RequestContext,
        target: String,
        editing: bool,
        form: AbsenceForm,
        members: &[TeamMember],
    ) -> Self {
        let members = member_options(members, &form.member_id);
        Self {
            ctx,
            target,
            editing,
            form,
            members,
        }
    }
}

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post};
use chrono::NaiveDate;

use crate::auth;
use crate::auth::{Permission, Principal};
use crate::availability::SlotInstance;
use crate::server;
use crate::server::State;

use crate::slots::models::{NewBlackout, NewSlotTemplate, RecurringSlotRequest};

#[post("/grounds/{id}/slots")]
async fn add_slots(
    ground_id: Path<i64>,
    slots: Json<Vec<NewSlotTemplate>>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();
    let slots = slots.into_inner();

    let created = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::ManageGroundSlots, Some(ground.owner_id))?;

        state.slots.add_templates(ground.id, slots)
    })
    .await?;

    http_created_json!(created);
}

#[post("/grounds/{id}/slots/recurring")]
async fn add_recurring_slot(
    ground_id: Path<i64>,
    request: Json<RecurringSlotRequest>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();
    let request = request.into_inner();

    let created = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::ManageGroundSlots, Some(ground.owner_id))?;

        state.slots.create_recurring(ground.id, request.slot, request.rule)
    })
    .await?;

    http_created_json!(created);
}

#[get("/grounds/{id}/slots")]
async fn find_slots(ground_id: Path<i64>, state: Data<State>) -> server::Response {
    let state = state.into_inner();

    let templates = web::block(move || {
        // surface a 404 for unknown grounds rather than an empty list
        state.grounds.find(*ground_id)?;
        state.slots.list(*ground_id)
    })
    .await?;

    http_ok_json!(templates);
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    date: NaiveDate,
}

#[get("/grounds/{id}/availability")]
async fn availability(
    ground_id: Path<i64>,
    query: Query<AvailabilityQuery>,
    state: Data<State>,
) -> server::Response {
    let state = state.into_inner();
    let date = query.into_inner().date;

    let slots = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;

        // a closed ground simply has nothing on offer
        if !ground.availability {
            return Ok(Vec::<SlotInstance>::new());
        }

        state.resolver.available_slots(ground.id, date)
    })
    .await?;

    http_ok_json!(slots);
}

#[post("/grounds/{id}/blackouts")]
async fn block(
    ground_id: Path<i64>,
    blackout: Json<NewBlackout>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();
    let blackout = blackout.into_inner();

    let created = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::ManageGroundSlots, Some(ground.owner_id))?;

        state.blackouts.block(ground.id, blackout)
    })
    .await?;

    http_created_json!(created);
}

#[delete("/grounds/{id}/blackouts/{blackout_id}")]
async fn unblock(
    path: Path<(i64, i64)>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();
    let (ground_id, blackout_id) = path.into_inner();

    web::block(move || {
        let ground = state.grounds.find(ground_id)?;
        auth::require(&principal, Permission::ManageGroundSlots, Some(ground.owner_id))?;

        state.blackouts.unblock(blackout_id, ground.id)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(add_slots);
    cfg.service(add_recurring_slot);
    cfg.service(find_slots);
    cfg.service(availability);
    cfg.service(block);
    cfg.service(unblock);
}

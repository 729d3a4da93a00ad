use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::web::{Data, HttpResponse, Json, Path};
use actix_web::{delete, get, post};

use crate::auth;
use crate::auth::{Permission, Principal};
use crate::server;
use crate::server::State;

use crate::bookings::models::ReservationRequest;

#[post("/bookings")]
async fn create(
    request: Json<ReservationRequest>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    auth::require(&principal, Permission::CreateBooking, None)?;

    let state = state.into_inner();
    let request = request.into_inner();

    let booking = web::block(move || {
        state.ledger.reserve(
            request.ground_id,
            request.slot_template_id,
            request.date,
            principal.user_id,
        )
    })
    .await?;

    http_created_json!(booking);
}

#[get("/bookings")]
async fn find_own(state: Data<State>, principal: Principal) -> server::Response {
    auth::require(&principal, Permission::ViewOwnBookings, None)?;

    let state = state.into_inner();

    let bookings = web::block(move || state.ledger.list_by_user(principal.user_id)).await?;

    http_ok_json!(bookings);
}

#[get("/bookings/{id}")]
async fn find(booking_id: Path<i64>, state: Data<State>, principal: Principal) -> server::Response {
    let state = state.into_inner();

    let booking = web::block(move || {
        let booking = state.ledger.find(*booking_id)?;

        // visible to the holder and to the owner of the booked ground
        if booking.user_id != principal.user_id {
            let ground = state.grounds.find(booking.ground_id)?;
            if ground.owner_id != principal.user_id {
                forbidden!("not your booking");
            }
        }

        Ok(booking)
    })
    .await?;

    http_ok_json!(booking);
}

#[post("/bookings/{id}/cancel")]
async fn cancel(
    booking_id: Path<i64>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    auth::require(&principal, Permission::CancelOwnBooking, None)?;

    let state = state.into_inner();

    let booking = web::block(move || state.ledger.cancel(*booking_id, principal.user_id)).await?;

    http_ok_json!(booking);
}

#[delete("/bookings/{id}")]
async fn purge(booking_id: Path<i64>, state: Data<State>, principal: Principal) -> server::Response {
    auth::require(&principal, Permission::ManageOwnBookings, None)?;

    let state = state.into_inner();

    web::block(move || state.ledger.purge(*booking_id, principal.user_id)).await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

#[get("/grounds/{id}/bookings")]
async fn find_for_ground(
    ground_id: Path<i64>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();

    let bookings = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::ManageOwnBookings, Some(ground.owner_id))?;

        state.ledger.list_by_ground(ground.id)
    })
    .await?;

    http_ok_json!(bookings);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(create);
    cfg.service(find_own);
    cfg.service(find);
    cfg.service(cancel);
    cfg.service(purge);
    cfg.service(find_for_ground);
}

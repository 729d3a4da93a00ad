use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post, put};

use crate::auth;
use crate::auth::{Permission, Principal};
use crate::server;
use crate::server::State;
use crate::validator::Validator;

use crate::grounds::models::{CreateGround, GroundFilter, UpdateGround};

#[get("/grounds")]
async fn find_all(filter: Query<GroundFilter>, state: Data<State>) -> server::Response {
    let state = state.into_inner();
    let filter = filter.into_inner();

    let grounds = web::block(move || state.grounds.list(filter)).await?;

    http_ok_json!(grounds);
}

#[get("/grounds/{id}")]
async fn find(ground_id: Path<i64>, state: Data<State>) -> server::Response {
    let state = state.into_inner();

    let ground = web::block(move || state.grounds.find(*ground_id)).await?;

    http_ok_json!(ground);
}

#[post("/grounds")]
async fn create(
    ground: Json<Validator<CreateGround>>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    auth::require(&principal, Permission::CreateGround, None)?;

    let mut ground = ground.into_inner().validate()?;
    ground.owner_id = principal.user_id;

    let state = state.into_inner();

    let ground = web::block(move || state.grounds.create(ground)).await?;

    http_created_json!(ground);
}

#[put("/grounds/{id}")]
async fn update(
    ground_id: Path<i64>,
    changes: Json<Validator<UpdateGround>>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let changes = changes.into_inner().validate()?;
    let state = state.into_inner();

    let ground = web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::UpdateOwnGround, Some(ground.owner_id))?;

        state.grounds.update(ground.id, changes)
    })
    .await?;

    http_ok_json!(ground);
}

#[delete("/grounds/{id}")]
async fn delete(
    ground_id: Path<i64>,
    state: Data<State>,
    principal: Principal,
) -> server::Response {
    let state = state.into_inner();

    web::block(move || {
        let ground = state.grounds.find(*ground_id)?;
        auth::require(&principal, Permission::DeleteOwnGround, Some(ground.owner_id))?;

        state.grounds.delete(ground.id)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find);
    cfg.service(create);
    cfg.service(update);
    cfg.service(delete);
}

//! API Routes
//!
//! Every resource kind is served by the same five generic endpoints:
//!
//! - `GET    /{collection}`       list
//! - `GET    /{collection}/:id`   get
//! - `POST   /{collection}`       create
//! - `PUT    /{collection}/:id`   full replace
//! - `DELETE /{collection}/:id`   delete

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::handlers::ResourceHandler;
use crate::resources::{
    Customer, Employee, Entity, Order, OrderDetail, Product, ProductListing, Shipper, Supplier,
};
use crate::store::EntityStore;

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router<S>() -> Router<S>
where
    S: EntityStore + Clone + 'static,
{
    let router = Router::new();
    let router = resource_routes::<Customer, S>(router);
    let router = resource_routes::<Employee, S>(router);
    let router = resource_routes::<Order, S>(router);
    let router = resource_routes::<OrderDetail, S>(router);
    let router = resource_routes::<Product, S>(router);
    let router = resource_routes::<ProductListing, S>(router);
    let router = resource_routes::<Shipper, S>(router);
    resource_routes::<Supplier, S>(router)
}

/// Register the collection and item routes of `T`
fn resource_routes<T, S>(router: Router<S>) -> Router<S>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let collection = format!("/{}", T::collection());
    let item = format!("/{}/:id", T::collection());

    router
        .route(
            &collection,
            get(list_resources::<T, S>).post(create_resource::<T, S>),
        )
        .route(
            &item,
            get(get_resource::<T, S>)
                .put(update_resource::<T, S>)
                .delete(delete_resource::<T, S>),
        )
}

/// Bytes escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Location of a single resource, relative to the API root
pub fn resource_location<T: Entity>(id: &T::Id) -> String {
    let id = id.to_string();
    format!(
        "/{}/{}",
        T::collection(),
        utf8_percent_encode(&id, PATH_SEGMENT)
    )
}

fn path_id<T: Entity>(path: Result<Path<T::Id>, PathRejection>) -> Result<T::Id, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

fn body<T: Entity>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(entity)| entity)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

// =========================================================================
// GET /{collection}
// =========================================================================

async fn list_resources<T, S>(
    State(store): State<S>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<Vec<T>>, AppError>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let handler = ResourceHandler::<T, S>::new(store);
    let rows = handler.list(&context).await?;
    Ok(Json(rows))
}

// =========================================================================
// GET /{collection}/:id
// =========================================================================

async fn get_resource<T, S>(
    State(store): State<S>,
    Extension(context): Extension<OperationContext>,
    path: Result<Path<T::Id>, PathRejection>,
) -> Result<Json<T>, AppError>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let id = path_id::<T>(path)?;
    let handler = ResourceHandler::<T, S>::new(store);
    let entity = handler.get(&id, &context).await?;
    Ok(Json(entity))
}

// =========================================================================
// POST /{collection}
// =========================================================================

async fn create_resource<T, S>(
    State(store): State<S>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let payload = body(payload)?;
    let handler = ResourceHandler::<T, S>::new(store);
    let created = handler.create(payload, &context).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, resource_location::<T>(&created.id))],
        Json(created.entity),
    ))
}

// =========================================================================
// PUT /{collection}/:id
// =========================================================================

async fn update_resource<T, S>(
    State(store): State<S>,
    Extension(context): Extension<OperationContext>,
    path: Result<Path<T::Id>, PathRejection>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<StatusCode, AppError>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let id = path_id::<T>(path)?;
    let payload = body(payload)?;
    let handler = ResourceHandler::<T, S>::new(store);
    handler.update(&id, payload, &context).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// DELETE /{collection}/:id
// =========================================================================

async fn delete_resource<T, S>(
    State(store): State<S>,
    Extension(context): Extension<OperationContext>,
    path: Result<Path<T::Id>, PathRejection>,
) -> Result<StatusCode, AppError>
where
    T: Entity,
    S: EntityStore + Clone + 'static,
{
    let id = path_id::<T>(path)?;
    let handler = ResourceHandler::<T, S>::new(store);
    handler.delete(&id, &context).await?;
    Ok(StatusCode::NO_CONTENT)
}

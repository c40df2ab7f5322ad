//! services/api/src/web/extract.rs
//!
//! Extractors whose rejections go through `ApiError`, so a malformed body is
//! a 400 and an unparseable resource id is a 404 with the usual JSON body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

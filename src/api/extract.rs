// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON body extractor that fails with [`ApiError`].
//!
//! Use it in place of `axum::Json` for request bodies so malformed input is
//! answered with the usual `{"error": ...}` payload:
//!
//! ```rust,ignore
//! async fn handler(ApiJson(body): ApiJson<UpdateStatusRequest>) -> Result<..., ApiError> {
//!     // body is UpdateStatusRequest
//! }
//! ```

use axum::extract::FromRequest;

use crate::error::ApiError;

#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

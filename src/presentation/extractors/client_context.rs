// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, REFERER, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

use crate::domain::models::submission::ClientContext;

static FORWARDED_FOR: &str = "x-forwarded-for";
static REAL_IP: &str = "x-real-ip";
static TRACKING_COOKIE: &str = "hubspotutk";

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: impl axum::http::header::AsHeaderName,
) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 客户端IP：优先取 `X-Forwarded-For` 的第一跳，其次 `X-Real-IP`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, REAL_IP))
        .map(str::to_string)
}

fn tracking_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TRACKING_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

pub fn client_context_from_headers(headers: &HeaderMap) -> ClientContext {
    ClientContext {
        ip: client_ip(headers),
        user_agent: header_str(headers, USER_AGENT).map(str::to_string),
        page_uri: header_str(headers, REFERER).map(str::to_string),
        tracking_cookie: tracking_cookie(headers),
    }
}

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(client_context_from_headers(&parts.headers))
    }
}

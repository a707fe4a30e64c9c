use anyhow::{Context, bail};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::WebError;

/// The user a request acts for, resolved from its API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let owner_id = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| api_keys.owner_for(token.trim()));

    let Some(owner_id) = owner_id else {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    };

    req.extensions_mut().insert(Owner(owner_id));
    Ok(next.run(req).await)
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashMap<String, Uuid>,
}

impl ApiKeys {
    /// Parses `key:owner-uuid` pairs separated by commas.
    pub fn from_comma_separated(keys_str: &str) -> anyhow::Result<Self> {
        let mut keys = HashMap::new();

        for entry in keys_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((key, owner)) = entry.split_once(':') else {
                bail!("API key entry must look like `key:owner-uuid`");
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("API key entry has an empty key");
            }
            let owner = Uuid::parse_str(owner.trim()).with_context(|| {
                format!("Invalid owner id for API key ending in ...{}", tail(key))
            })?;
            keys.insert(key.to_string(), owner);
        }

        Ok(Self { keys })
    }

    pub fn owner_for(&self, key: &str) -> Option<Uuid> {
        self.keys.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn tail(key: &str) -> &str {
    let start = key
        .char_indices()
        .rev()
        .nth(3)
        .map(|(index, _)| index)
        .unwrap_or(0);
    &key[start..]
}

//! Route groups, one per target platform.
//!
//! # Groups
//! ```text
//! /CLI/_cmds   cmds.rs    maintenance commands (regenerate, verify)
//! /CLI/Az      az.rs      az CLI modules, profiles, spec transfer
//! /CLI/PS      ps.rs      PowerShell view: modules, spec queries, portal output
//! /CLI/Portal  portal.rs  portal document generation
//! ```
//!
//! # Design Decisions
//! - Each group receives its backends at construction (no globals)
//! - Handlers validate input, call one backend, map errors via ApiError
//! - Groups know nothing about each other; the registry composes them

pub mod az;
pub mod cmds;
pub mod portal;
pub mod ps;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

use crate::http::response::{ApiError, ApiResult};
use crate::model::CliRepo;

pub use az::AzGroup;
pub use cmds::CmdsGroup;
pub use portal::PortalGroup;
pub use ps::PsGroup;

/// Optional `?profile=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub profile: Option<String>,
}

/// Parse the `{repo}` path segment.
pub(crate) fn parse_repo(segment: &str) -> ApiResult<CliRepo> {
    Ok(segment.parse::<CliRepo>()?)
}

/// Split a wildcard node path (`aaz/network/vnet`) into names.
pub(crate) fn node_names(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode a version name sent base64 encoded in the URL.
pub(crate) fn decode_version(encoded: &str) -> ApiResult<String> {
    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')))
        .map_err(|_| ApiError::bad_request(format!("version '{}' is not valid base64", encoded)))?;
    String::from_utf8(bytes)
        .map_err(|_| ApiError::bad_request(format!("version '{}' is not valid UTF-8", encoded)))
}

/// What a `.../Transfer` request addresses in the spec tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransferTarget {
    /// `aaz/<groups..>/Transfer`
    Node(Vec<String>),
    /// `aaz/<groups..>/Leaves/<leaf>/Versions/<base64>/Transfer`
    Leaf {
        node: Vec<String>,
        leaf: String,
        version: String,
    },
}

pub(crate) fn parse_transfer_path(tail: &str) -> ApiResult<TransferTarget> {
    let segments = node_names(tail);
    let Some((last, rest)) = segments.split_last() else {
        return Err(ApiError::not_found(format!("no operation at '{}'", tail)));
    };
    if last != "Transfer" {
        return Err(ApiError::not_found(format!("no operation at '{}'", tail)));
    }

    let Some(leaves_at) = rest.iter().position(|s| s == "Leaves") else {
        return Ok(TransferTarget::Node(rest.to_vec()));
    };

    let node = rest[..leaves_at].to_vec();
    match &rest[leaves_at + 1..] {
        [leaf, versions, encoded @ ..] if versions == "Versions" && !encoded.is_empty() => {
            Ok(TransferTarget::Leaf {
                node,
                leaf: leaf.clone(),
                // A '/' inside the base64 text splits it across segments.
                version: decode_version(&encoded.join("/"))?,
            })
        }
        _ => Err(ApiError::bad_request(format!(
            "expected 'Leaves/<name>/Versions/<version>/Transfer' in '{}'",
            tail
        ))),
    }
}

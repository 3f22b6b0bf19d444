use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Response envelope returned by every backend endpoint.
///
/// The payload sits next to `success` at the top level (`{"success": true,
/// "tickets": [...]}`), so it is flattened into `body`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiEnvelope<T> {
    pub fn success(body: T) -> Self {
        Self {
            success: true,
            message: None,
            meta: None,
            body,
        }
    }

    /// Turn a `success=false` envelope into a backend rejection.
    pub fn into_result(self, status: u16) -> Result<(T, Option<Meta>)> {
        if self.success {
            Ok((self.body, self.meta))
        } else {
            Err(AppError::BackendRejection {
                status,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// Page number (1-indexed)
    pub page: i64,
    pub page_size: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// First page at the largest page size the backend accepts
    pub fn full_scan() -> Self {
        Self {
            page: 1,
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Whether a page of `received` items, after `collected` total so far,
    /// ends the scan.
    ///
    /// `meta.total` is authoritative when present, since the backend may cap
    /// pages below the requested size. Without it a short page ends the scan.
    pub fn is_last(&self, received: usize, collected: usize, meta: Option<&Meta>) -> bool {
        if received == 0 {
            return true;
        }
        match meta {
            Some(meta) => collected as i64 >= meta.total,
            None => received < self.limit() as usize,
        }
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

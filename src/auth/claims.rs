use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Claims carried by a verified access token.
///
/// Only the claims this service consumes are modeled here; unknown claims are
/// ignored. Signature, audience, issuer and expiry are enforced during
/// verification, so holding a `Claims` value means the token checked out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token subject, the caller's identity at the issuer.
    #[serde(default)]
    pub sub: String,

    /// Space-delimited scope grants, e.g. `"read:to-dos create:to-dos"`.
    /// Some issuers emit this claim under the name `scopes`. A token without
    /// either claim simply grants nothing.
    #[serde(default, alias = "scopes")]
    pub scope: String,

    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The granted scope names as a set.
    pub fn scopes(&self) -> HashSet<&str> {
        self.scope.split(' ').filter(|s| !s.is_empty()).collect()
    }

    /// Whether the token grants `scope` exactly. Grants never match by
    /// prefix or wildcard.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().contains(scope)
    }
}

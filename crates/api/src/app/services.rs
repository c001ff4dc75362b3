use std::sync::Arc;

use clubhub_auth::Hs256JwtValidator;
use clubhub_infra::{AppService, InMemoryStore};

/// Shared per-process services handed to handlers via `Extension`.
pub struct AppServices {
    /// Authorized CRUD over users, clubs and events.
    pub service: AppService<InMemoryStore>,
    /// Token signer/verifier (login mints, middleware verifies).
    pub jwt: Arc<Hs256JwtValidator>,
}

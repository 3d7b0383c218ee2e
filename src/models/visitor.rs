//! Request extractor exposing the visitor's session tokens.
//!
//! The private token is the `actix-identity` id; the public and remember-me
//! tokens live in the cookie session next to it.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::api::http::HttpBackend;
use crate::domain::session::SessionTokens;

const PUBLIC_TOKEN_KEY: &str = "public_token";
const REMEMBER_ME_KEY: &str = "remember_me_token";

/// The current visitor, signed in or anonymous.
#[derive(Clone, Debug, Default)]
pub struct Visitor {
    pub tokens: SessionTokens,
}

impl Visitor {
    fn from_request_parts(req: &HttpRequest) -> Self {
        let private_token = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok());
        let session = req.get_session();

        Self {
            tokens: SessionTokens {
                public_token: read_token(&session, PUBLIC_TOKEN_KEY),
                private_token,
                remember_me_token: read_token(&session, REMEMBER_ME_KEY),
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Backend client sending this visitor's token.
    pub fn backend(&self, backend: &HttpBackend) -> HttpBackend {
        backend.with_token(self.tokens.request_token())
    }
}

fn read_token(session: &Session, key: &str) -> Option<String> {
    session.get::<String>(key).unwrap_or_else(|err| {
        log::warn!("Failed to read {key} from session: {err}");
        None
    })
}

impl FromRequest for Visitor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Visitor::from_request_parts(req)))
    }
}

/// Persists freshly issued tokens: the private one becomes the identity.
pub fn remember_tokens(req: &HttpRequest, tokens: &SessionTokens) -> Result<(), actix_web::Error> {
    let session = req.get_session();
    if let Some(private_token) = &tokens.private_token {
        Identity::login(&req.extensions(), private_token.clone())
            .map_err(actix_web::error::ErrorInternalServerError)?;
    }
    match &tokens.remember_me_token {
        Some(token) => session.insert(REMEMBER_ME_KEY, token)?,
        None => {
            session.remove(REMEMBER_ME_KEY);
        }
    }
    if let Some(token) = &tokens.public_token {
        session.insert(PUBLIC_TOKEN_KEY, token)?;
    }
    Ok(())
}

/// Drops the identity and every stored token.
pub fn forget_tokens(req: &HttpRequest) {
    if let Ok(identity) = req.get_identity() {
        identity.logout();
    }
    req.get_session().purge();
}

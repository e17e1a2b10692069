//! Social-login callback resolution.
//!
//! Third-party sign-in ends with the browser landing on a callback URL
//! carrying `token` and `user` query parameters. Malformed or incomplete
//! callbacks resolve to a login redirect with an error indicator in the
//! URL; they are never surfaced as failures to the caller.

use domain::identity::User;
use url::Url;

use crate::usecases::SessionService;

/// Error indicator appended to the login URL when the callback is missing
/// its parameters.
const MISSING_PARAMS: &str = "missing_oauth";
/// Error indicator appended when the callback's user payload is malformed.
const MALFORMED_PAYLOAD: &str = "oauth";

impl SessionService {
    /// Completes a third-party sign-in from the callback URL the provider
    /// redirected to.
    ///
    /// A valid `token` + JSON `user` pair is persisted, the session becomes
    /// authenticated and the view moves to the search screen.
    pub fn complete_oauth_callback(&self, callback: &Url) {
        let mut token = None;
        let mut user_raw = None;

        for (key, value) in callback.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "user" => user_raw = Some(value.into_owned()),
                _ => {},
            }
        }

        let (Some(token), Some(user_raw)) = (token, user_raw) else {
            tracing::warn!("oauth callback missing token or user parameter");
            self.navigator().to_login(Some(MISSING_PARAMS));
            return;
        };

        let user: User = match serde_json::from_str(&user_raw) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(
                    error = ?error,
                    "oauth callback carried an unparsable user payload"
                );
                self.navigator().to_login(Some(MALFORMED_PAYLOAD));
                return;
            },
        };

        self.complete_authentication(user, token, "oauth");
        self.navigator().to_search();
    }
}

#[cfg(test)]
mod tests {
    use domain::session::guard::{self, GuardDecision};
    use url::Url;

    use crate::ports::inbound::SessionLifecycle;
    use crate::usecases::support::{test_user, Harness};

    fn callback_url(token: Option<&str>, user_json: Option<&str>) -> Url {
        let mut url = Url::parse("http://localhost:3000/auth/callback").unwrap();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(token) = token {
                pairs.append_pair("token", token);
            }
            if let Some(user) = user_json {
                pairs.append_pair("user", user);
            }
        }
        url
    }

    #[test]
    fn test_valid_callback_authenticates_and_moves_to_search() {
        let harness = Harness::new();
        let user_json = serde_json::to_string(&test_user("7")).unwrap();
        let url = callback_url(Some("tok-oauth"), Some(&user_json));

        harness.service.complete_oauth_callback(&url);

        let session = harness.service.session();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("tok-oauth"));
        assert_eq!(session.user.as_ref().unwrap().id, "7");
        assert_eq!(harness.store.slot().unwrap().token, "tok-oauth");
        assert_eq!(harness.navigator.last(), Some("/".into()));

        // The landing view no longer lets the viewer back into login.
        assert_eq!(
            guard::guest_only(session.is_authenticated, session.is_loading),
            GuardDecision::RedirectToSearch,
        );
    }

    #[test]
    fn test_callback_without_parameters_redirects_with_indicator() {
        let harness = Harness::new();

        harness
            .service
            .complete_oauth_callback(&callback_url(None, None));

        assert!(!harness.service.session().is_authenticated);
        assert_eq!(
            harness.navigator.last(),
            Some("/login?error=missing_oauth".into())
        );
    }

    #[test]
    fn test_callback_with_malformed_user_payload_redirects() {
        let harness = Harness::new();
        let url = callback_url(Some("tok"), Some("{not json"));

        harness.service.complete_oauth_callback(&url);

        assert!(!harness.service.session().is_authenticated);
        assert!(harness.store.slot().is_none());
        assert_eq!(
            harness.navigator.last(),
            Some("/login?error=oauth".into())
        );
    }
}

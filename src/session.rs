use reqwest::{header, Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

use crate::action::ActionRequest;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::token;

const TIMEMAN_ROUTE: &str = "/bitrix/tools/timeman.php";

/// One portal session: a cookie-carrying HTTP client plus the two endpoint
/// URLs derived from the configured base. Lives for a single invocation; the
/// sessid token is never cached across runs because the portal expires it.
pub struct Session {
    client: Client,
    root: Url,
    timeman: Url,
    login: String,
    password: String,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let trimmed = config.base_url.trim_end_matches('/');
        let parse = |candidate: String| {
            Url::parse(&candidate).map_err(|source| Error::BaseUrl {
                url: config.base_url.clone(),
                source,
            })
        };
        let root = parse(format!("{trimmed}/"))?;
        let timeman = parse(format!("{trimmed}{TIMEMAN_ROUTE}"))?;

        // Cookies from the login response authorize the follow-up action POST
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Session {
            client,
            root,
            timeman,
            login: config.login.clone(),
            password: config.password.clone(),
        })
    }

    /// Unauthenticated liveness probe against the portal root.
    ///
    /// Alive means status 200 exactly; other statuses and transport failures
    /// both count as dead.
    pub async fn probe(&self) -> bool {
        match self.probe_request().send().await {
            Ok(response) => {
                debug!(status = %response.status(), "probe answered");
                response.status() == StatusCode::OK
            }
            Err(err) => {
                debug!(error = %err, "probe failed");
                false
            }
        }
    }

    /// Posts the credentials to the portal root and returns the sessid token
    /// scraped from the response markup.
    pub async fn login(&self) -> Result<String> {
        debug!(url = %self.root, "logging in");
        let response = self.login_request().send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server {
                status,
                context: "login",
            });
        }

        let body = response.text().await?;
        let sessid = token::extract_sessid(&body)?;
        debug!("obtained sessid token");
        Ok(sessid.to_owned())
    }

    /// Sends one workday action to the timeman endpoint. The response status
    /// is checked; the body is not inspected.
    pub async fn send_action(&self, request: &ActionRequest<'_>) -> Result<()> {
        debug!(action = request.action().wire_name(), "sending workday action");
        let response = self.action_request(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server {
                status,
                context: "the workday action",
            });
        }
        Ok(())
    }

    fn probe_request(&self) -> RequestBuilder {
        self.client.get(self.root.clone())
    }

    fn login_request(&self) -> RequestBuilder {
        self.client
            .post(self.root.clone())
            .header("Bx-ajax", "true")
            .header(header::TE, "Trailers")
            .form(&[
                ("USER_LOGIN", self.login.as_str()),
                ("USER_PASSWORD", self.password.as_str()),
                ("TYPE", "AUTH"),
                ("AUTH_FORM", "Y"),
            ])
    }

    fn action_request(&self, request: &ActionRequest<'_>) -> RequestBuilder {
        self.client
            .post(self.timeman.clone())
            .header("Bx-ajax", "true")
            .header(header::TE, "Trailers")
            .query(&request.query())
            .form(&request.form())
    }
}

use crate::error::NavigationError;
use crate::models::ReadyConfig;
use crate::parsers::{self, form::Form, form::FormMethod};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// The browser capability the harvester drives.
///
/// State-changing calls take `&mut self`: one session serves one logical tab,
/// and the form state it holds must not be raced by overlapping calls.
#[async_trait]
pub trait Session: Send + Sync {
    /// Loads `url` as the current page.
    async fn navigate(&mut self, url: &str) -> Result<(), NavigationError>;

    /// Chooses `value` in the `<select>` named `control`.
    async fn select_option(&mut self, control: &str, value: &str) -> Result<(), NavigationError>;

    /// Presses the submit control named `control` and loads the response.
    ///
    /// Returns only once the response page is current: the readiness check
    /// that follows also matches the form the old page already showed.
    async fn click(&mut self, control: &str) -> Result<(), NavigationError>;

    /// Markup of the current page.
    async fn page_source(&self) -> Result<String, NavigationError>;

    /// Releases the session. Later calls fail with `SessionClosed`.
    ///
    /// Callers close explicitly; nothing closes a session that is dropped
    /// mid-harvest (panic, cancelled future), so an implementation holding an
    /// external process must also release it on `Drop`.
    async fn close(&mut self) -> Result<(), NavigationError>;

    /// Polls the current page until `selector` matches, giving up after
    /// `ready.timeout`.
    async fn wait_for(&self, selector: &str, ready: ReadyConfig) -> Result<(), NavigationError> {
        let deadline = Instant::now() + ready.timeout;
        loop {
            let html = self.page_source().await?;
            if parsers::page_matches(&html, selector)? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(NavigationError::NotReady {
                    selector: selector.to_string(),
                    timeout: ready.timeout,
                });
            }
            tokio::time::sleep(ready.poll_interval).await;
        }
    }
}

struct LoadedPage {
    url: Url,
    html: String,
    forms: Vec<Form>,
}

/// A [`Session`] over plain HTTP.
///
/// Keeps the cookie jar and the forms of the current page the way a browser
/// would: selections only change local form state, and a click submits the
/// owning form with every field plus the pressed button.
pub struct HttpSession {
    client: reqwest::Client,
    page: Option<LoadedPage>,
    closed: bool,
}

impl HttpSession {
    pub fn new() -> Result<Self, NavigationError> {
        let cookie_jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.0.0 Safari/537.36",
            ),
        );

        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client))
    }

    /// Uses a caller-built client. It should keep cookies, since the host
    /// tracks the search in its session.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            page: None,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<(), NavigationError> {
        if self.closed {
            return Err(NavigationError::SessionClosed);
        }
        Ok(())
    }

    fn page(&self) -> Result<&LoadedPage, NavigationError> {
        self.ensure_open()?;
        self.page.as_ref().ok_or(NavigationError::NoPage)
    }

    async fn load(&mut self, response: reqwest::Response) -> Result<(), NavigationError> {
        let url = response.url().clone();
        let html = response.error_for_status()?.text().await?;
        let forms = parsers::form::parse_forms(&html, &url)?;
        debug!(%url, forms = forms.len(), bytes = html.len(), "page loaded");

        self.page = Some(LoadedPage { url, html, forms });
        Ok(())
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), NavigationError> {
        self.ensure_open()?;
        let url = Url::parse(url).map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.client.get(url).send().await?;
        self.load(response).await
    }

    async fn select_option(&mut self, control: &str, value: &str) -> Result<(), NavigationError> {
        self.ensure_open()?;
        let page = self.page.as_mut().ok_or(NavigationError::NoPage)?;
        let form = page
            .forms
            .iter_mut()
            .find(|f| f.has_select(control))
            .ok_or_else(|| NavigationError::ControlNotFound(control.to_string()))?;

        form.select(control, value)?;
        debug!(control, value, "option selected");
        Ok(())
    }

    async fn click(&mut self, control: &str) -> Result<(), NavigationError> {
        let page = self.page()?;
        let form = page
            .forms
            .iter()
            .find(|f| f.has_submit(control))
            .ok_or_else(|| NavigationError::ControlNotFound(control.to_string()))?;
        let params = form.submission(control)?;

        debug!(control, action = %form.action, from = %page.url, "submitting form");
        let request = match form.method {
            FormMethod::Post => self.client.post(form.action.clone()).form(&params),
            FormMethod::Get => {
                let mut url = form.action.clone();
                url.query_pairs_mut().clear().extend_pairs(params.iter());
                self.client.get(url)
            }
        };

        let response = request.send().await?;
        self.load(response).await
    }

    async fn page_source(&self) -> Result<String, NavigationError> {
        Ok(self.page()?.html.clone())
    }

    async fn close(&mut self) -> Result<(), NavigationError> {
        if !self.closed {
            debug!("closing http session");
        }
        self.page = None;
        self.closed = true;
        Ok(())
    }
}

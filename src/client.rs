use crate::error::{FetchError, NavigationError};
use crate::models::{DelayConfig, FormLayout, RawDataset, ReadyConfig, SubjectRows};
use crate::parsers;
use crate::session::{HttpSession, Session};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the driver is in the term/subject sequence. Only moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Fresh,
    TermSelected { term: String },
    SubjectFetched { term: String, subject: String },
}

impl SessionState {
    fn term(&self) -> Option<&str> {
        match self {
            SessionState::Fresh => None,
            SessionState::TermSelected { term } | SessionState::SubjectFetched { term, .. } => {
                Some(term.as_str())
            }
        }
    }
}

/// Walks the timetable form: pick a term once, then one subject at a time.
pub struct TimetableClient<S: Session> {
    session: S,
    layout: FormLayout,
    delay: DelayConfig,
    ready: ReadyConfig,
    state: SessionState,
}

impl TimetableClient<HttpSession> {
    pub fn new() -> Result<Self, NavigationError> {
        Ok(Self::with_session(HttpSession::new()?))
    }
}

impl<S: Session> TimetableClient<S> {
    pub fn with_session(session: S) -> Self {
        Self {
            session,
            layout: FormLayout::default(),
            delay: DelayConfig::default(),
            ready: ReadyConfig::default(),
            state: SessionState::Fresh,
        }
    }

    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_delay(mut self, delay: DelayConfig) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_ready(mut self, ready: ReadyConfig) -> Self {
        self.ready = ready;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Opens the timetable page and chooses `term` in the term control.
    ///
    /// No validation happens here; a term the site does not know shows up
    /// only as subjects without results.
    pub async fn select_term(&mut self, term: &str) -> Result<(), NavigationError> {
        let layout = &self.layout;
        self.session.navigate(&layout.base_url).await?;
        self.session
            .wait_for(&FormLayout::select_selector(&layout.term_control), self.ready)
            .await?;

        self.session.select_option(&layout.term_control, term).await?;
        self.session
            .wait_for(&FormLayout::select_selector(&layout.subject_control), self.ready)
            .await?;

        info!(term, "term selected");
        self.state = SessionState::TermSelected {
            term: term.to_string(),
        };
        Ok(())
    }

    /// Submits the form for one subject and extracts the rows it renders.
    pub async fn fetch_subject(&mut self, subject: &str) -> Result<SubjectRows, NavigationError> {
        let term = self
            .state
            .term()
            .ok_or(NavigationError::TermNotSelected)?
            .to_string();

        let layout = &self.layout;
        self.session.select_option(&layout.subject_control, subject).await?;
        self.session.click(&layout.submit_control).await?;
        self.session
            .wait_for(&layout.results_ready_selector(), self.ready)
            .await?;

        let html = self.session.page_source().await?;
        let extracted = parsers::table::extract_rows(&html, &layout.table_class)?;
        info!(
            subject,
            records = extracted.records.len(),
            rejected = extracted.rejected.len(),
            "subject fetched"
        );

        self.state = SessionState::SubjectFetched {
            term,
            subject: subject.to_string(),
        };
        Ok(SubjectRows {
            subject: subject.to_string(),
            records: extracted.records,
            rejected: extracted.rejected,
        })
    }

    /// Harvests every subject of `term`, in the order given.
    ///
    /// The session is closed before this returns, whether or not the harvest
    /// succeeded. On failure the error carries what was collected before it.
    pub async fn fetch_all<I, T>(mut self, term: &str, subjects: I) -> Result<RawDataset, Box<FetchError>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let outcome = self.collect(term, subjects).await;
        if let Err(error) = self.session.close().await {
            warn!(%error, "failed to close session");
        }
        outcome
    }

    /// Releases the session without harvesting further.
    pub async fn close(mut self) -> Result<(), NavigationError> {
        self.session.close().await
    }

    async fn collect<I, T>(&mut self, term: &str, subjects: I) -> Result<RawDataset, Box<FetchError>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut dataset = RawDataset::default();
        if let Err(source) = self.select_term(term).await {
            return Err(Box::new(FetchError {
                failed_subject: None,
                source,
                partial: dataset,
            }));
        }

        for (i, subject) in subjects.into_iter().enumerate() {
            let subject = subject.as_ref();
            if i > 0 {
                self.pause().await;
            }

            match self.fetch_subject(subject).await {
                Ok(rows) => dataset.push(rows),
                Err(source) => {
                    return Err(Box::new(FetchError {
                        failed_subject: Some(subject.to_string()),
                        source,
                        partial: dataset,
                    }));
                }
            }
        }

        info!(
            subjects = dataset.subjects_fetched,
            records = dataset.records.len(),
            rejected = dataset.rejected.len(),
            "harvest finished"
        );
        Ok(dataset)
    }

    async fn pause(&self) {
        if !self.delay.enabled {
            return;
        }

        let lo = self.delay.min_delay_ms.min(self.delay.max_delay_ms);
        let hi = self.delay.min_delay_ms.max(self.delay.max_delay_ms);
        let ms = rand::rng().random_range(lo..=hi);
        debug!(ms, "pausing between subjects");
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

//! Research orchestrator for coordinating the entire research workflow
//!
//! This module provides:
//! - Workflow coordination: extract → research → record → validate
//! - Per-dependency fan-out with a concurrency limit
//! - The search → fetch path and the resolve → query path run side by side
//! - Single fetch retry with backoff
//! - Dependency filter application
//!
//! Capability failures never abort a run. They become coverage gaps that the
//! validator later surfaces as unmet checklist items.

use crate::capability::{Capabilities, DocSnippet, FetchedPage, SearchHit};
use crate::clock::{Clock, SystemClock, TimeInfo};
use crate::config::ResearchConfig;
use crate::domain::{dependency_key, Capability, CoverageGap, Dependency, Finding, ValidationReport};
use crate::error::CapabilityError;
use crate::extractor::{version_mentioned_in, DependencyExtractor};
use crate::progress::Progress;
use crate::store::FindingStore;
use crate::validator;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Longest topic passed to the structured docs query
const MAX_QUESTION_CHARS: usize = 120;

/// Filter deciding which extracted dependencies get researched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyFilter {
    /// Dependencies to skip
    pub exclude: Vec<String>,
    /// If non-empty, research only these dependencies
    pub only: Vec<String>,
}

impl DependencyFilter {
    /// Create a filter that lets everything through
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dependencies to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set dependencies to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if a dependency should be researched; `only` wins over `exclude`
    pub fn should_research(&self, name: &str) -> bool {
        let key = dependency_key(name);
        if !self.only.is_empty() {
            return self.only.iter().any(|n| dependency_key(n) == key);
        }
        !self.exclude.iter().any(|n| dependency_key(n) == key)
    }
}

/// Everything one dependency's research produced
#[derive(Debug, Clone, Default)]
pub struct ResearchBatch {
    /// Evidence gathered, in the order it arrived
    pub findings: Vec<Finding>,
    /// Capability calls that produced nothing usable
    pub gaps: Vec<CoverageGap>,
}

impl ResearchBatch {
    fn extend(&mut self, other: ResearchBatch) {
        self.findings.extend(other.findings);
        self.gaps.extend(other.gaps);
    }
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// The task description that was analysed
    pub task: String,
    /// Dates used for query recency and the report header
    pub time_info: TimeInfo,
    /// Dependencies extracted but left out by the filter
    pub skipped: Vec<Dependency>,
    /// Findings and gaps for the researched dependencies
    pub store: FindingStore,
    /// Checklist outcome per researched dependency
    pub report: ValidationReport,
}

impl OrchestratorResult {
    /// Researched dependencies, in extraction order
    pub fn dependencies(&self) -> &[Dependency] {
        self.store.dependencies()
    }

    /// True when every checklist item is met for every dependency
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Per-run research settings shared by all dependency tasks
struct Researcher {
    capabilities: Capabilities,
    clock: Arc<dyn Clock>,
    config: ResearchConfig,
    retry_backoff: Duration,
    year: i32,
}

impl Researcher {
    fn finding(
        &self,
        dependency: &Dependency,
        url: &str,
        capability: Capability,
        content: &str,
    ) -> Finding {
        let version = version_mentioned_in(content, dependency).unwrap_or_default();
        Finding::new(&dependency.name, url, capability, content, self.clock.now())
            .with_version(version)
    }

    /// Run both research paths for one dependency
    async fn research(&self, dependency: &Dependency) -> ResearchBatch {
        tracing::info!(dependency = %dependency, "researching");
        let (web, docs) = tokio::join!(
            self.search_and_fetch(dependency),
            self.query_docs(dependency)
        );

        let mut batch = web;
        batch.extend(docs);
        tracing::debug!(
            dependency = %dependency,
            findings = batch.findings.len(),
            gaps = batch.gaps.len(),
            "research finished"
        );
        batch
    }

    /// Search, then fetch the top hits
    async fn search_and_fetch(&self, dependency: &Dependency) -> ResearchBatch {
        let mut batch = ResearchBatch::default();
        let query = research_query(dependency, self.year);
        let hint = self.config.domain_hint(&dependency.name);

        let hits = match self.capabilities.search.search(&query, hint).await {
            Ok(hits) if hits.is_empty() => {
                let err = CapabilityError::no_results(&query);
                tracing::info!(dependency = %dependency, "{}", err);
                batch.gaps.push(CoverageGap::new(
                    &dependency.name,
                    Capability::Search,
                    &query,
                    err.to_string(),
                ));
                return batch;
            }
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(dependency = %dependency, "search failed: {}", e);
                batch.gaps.push(CoverageGap::new(
                    &dependency.name,
                    Capability::Search,
                    &query,
                    e.to_string(),
                ));
                return batch;
            }
        };

        for SearchHit { url, snippet } in &hits {
            batch
                .findings
                .push(self.finding(dependency, url, Capability::Search, snippet));
        }

        for url in fetch_targets(&hits, self.config.research.max_urls) {
            match self.fetch_with_retry(&url).await {
                Ok(FetchedPage { url, content }) => {
                    batch
                        .findings
                        .push(self.finding(dependency, &url, Capability::Fetch, &content));
                }
                Err(e) => {
                    tracing::warn!(dependency = %dependency, "fetch failed: {}", e);
                    batch.gaps.push(CoverageGap::new(
                        &dependency.name,
                        Capability::Fetch,
                        &url,
                        e.to_string(),
                    ));
                }
            }
        }

        batch
    }

    /// Fetch a URL, retrying once after the backoff on a transient failure
    async fn fetch_with_retry(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        match self.capabilities.fetch.fetch(url).await {
            Ok(page) => Ok(page),
            Err(e) if e.is_retryable() => {
                tracing::debug!("retrying {} after {:?}: {}", url, self.retry_backoff, e);
                tokio::time::sleep(self.retry_backoff).await;
                self.capabilities.fetch.fetch(url).await
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the library id, then query its documentation
    async fn query_docs(&self, dependency: &Dependency) -> ResearchBatch {
        let mut batch = ResearchBatch::default();
        let docs = &self.capabilities.docs;

        let library_id = match docs.resolve_id(&dependency.name).await {
            Ok(id) => id,
            Err(e) => {
                if matches!(e, CapabilityError::NotFound { .. }) {
                    tracing::info!(dependency = %dependency, "{}", e);
                } else {
                    tracing::warn!(dependency = %dependency, "library lookup failed: {}", e);
                }
                batch.gaps.push(CoverageGap::new(
                    &dependency.name,
                    Capability::StructuredQuery,
                    &dependency.name,
                    e.to_string(),
                ));
                return batch;
            }
        };
        tracing::debug!(dependency = %dependency, library_id = %library_id, "resolved library");

        let question = docs_question(dependency);
        match docs.query_docs(&library_id, &question).await {
            Ok(snippets) if snippets.is_empty() => {
                tracing::info!(
                    dependency = %dependency,
                    "no documentation snippets for {}",
                    library_id
                );
                batch.gaps.push(CoverageGap::new(
                    &dependency.name,
                    Capability::StructuredQuery,
                    &library_id,
                    "no documentation snippets returned",
                ));
            }
            Ok(snippets) => {
                for DocSnippet { snippet, source_url } in &snippets {
                    batch.findings.push(self.finding(
                        dependency,
                        source_url,
                        Capability::StructuredQuery,
                        snippet,
                    ));
                }
            }
            Err(e) => {
                tracing::warn!(dependency = %dependency, "documentation query failed: {}", e);
                batch.gaps.push(CoverageGap::new(
                    &dependency.name,
                    Capability::StructuredQuery,
                    &library_id,
                    e.to_string(),
                ));
            }
        }

        batch
    }
}

/// Search query with recency: "{name} {version} documentation {year}"
pub fn research_query(dependency: &Dependency, year: i32) -> String {
    match &dependency.version {
        Some(version) => format!("{} {} documentation {}", dependency.name, version, year),
        None => format!("{} documentation {}", dependency.name, year),
    }
}

/// Topic for the structured docs query
fn docs_question(dependency: &Dependency) -> String {
    let rationale = dependency.rationale.trim();
    if rationale.is_empty() {
        return research_query_topic(dependency);
    }
    rationale.chars().take(MAX_QUESTION_CHARS).collect()
}

fn research_query_topic(dependency: &Dependency) -> String {
    match &dependency.version {
        Some(version) => format!("{} {}", dependency.name, version),
        None => dependency.name.clone(),
    }
}

/// Distinct hit URLs worth fetching, capped
fn fetch_targets(hits: &[SearchHit], max_urls: usize) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for hit in hits {
        if targets.len() >= max_urls {
            break;
        }
        if !hit.url.trim().is_empty() && !targets.contains(&hit.url) {
            targets.push(hit.url.clone());
        }
    }
    targets
}

/// Orchestrator for coordinating the research workflow
pub struct Orchestrator {
    config: ResearchConfig,
    capabilities: Capabilities,
    clock: Arc<dyn Clock>,
    extractor: DependencyExtractor,
    filter: DependencyFilter,
    /// Limits how many dependencies are researched at once
    semaphore: Arc<Semaphore>,
    show_progress: bool,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: ResearchConfig, capabilities: Capabilities) -> Self {
        let extractor = DependencyExtractor::with_known(config.extractor.known.clone());
        let semaphore = Arc::new(Semaphore::new(config.research.concurrency.max(1)));
        Self {
            config,
            capabilities,
            clock: Arc::new(SystemClock),
            extractor,
            filter: DependencyFilter::new(),
            semaphore,
            show_progress: false,
        }
    }

    /// Use a different clock (builder pattern)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Restrict which dependencies are researched (builder pattern)
    pub fn with_filter(mut self, filter: DependencyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Show a progress bar while researching (builder pattern)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Extract dependencies and split them into (researched, skipped)
    pub fn plan(&self, task: &str) -> (Vec<Dependency>, Vec<Dependency>) {
        self.extractor
            .extract(task)
            .into_iter()
            .partition(|d| self.filter.should_research(&d.name))
    }

    /// Run the research workflow for a task description
    pub async fn run(&self, task: &str) -> OrchestratorResult {
        let time_info = TimeInfo::from_clock(self.clock.as_ref());
        let (dependencies, skipped) = self.plan(task);

        for dep in &skipped {
            tracing::debug!(dependency = %dep, "skipped by filter");
        }
        tracing::info!("{} dependencies to research", dependencies.len());

        let store = self.research_all(dependencies).await;
        let report = validator::validate(&store);

        OrchestratorResult {
            task: task.to_string(),
            time_info,
            skipped,
            store,
            report,
        }
    }

    /// Research a dependency set and return the filled store
    pub async fn research_all(&self, dependencies: Vec<Dependency>) -> FindingStore {
        let mut store = FindingStore::new(dependencies.clone());
        if dependencies.is_empty() {
            return store;
        }

        let researcher = Arc::new(Researcher {
            capabilities: self.capabilities.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            retry_backoff: Duration::from_millis(self.config.research.retry_backoff_ms),
            year: self.clock.current_year(),
        });

        let mut progress = Progress::new(self.show_progress);
        progress.start(dependencies.len() as u64, "Researching dependencies");

        let mut tasks = JoinSet::new();
        for dependency in dependencies.iter().cloned() {
            let researcher = Arc::clone(&researcher);
            let semaphore = Arc::clone(&self.semaphore);
            tasks.spawn(async move {
                // The semaphore is never closed, so the permit is always granted
                let _permit = semaphore.acquire_owned().await.ok();
                let batch = researcher.research(&dependency).await;
                (dependency.key(), batch)
            });
        }

        let mut batches: HashMap<String, ResearchBatch> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, batch)) => {
                    progress.set_message(&format!("Researched {}", key));
                    batches.insert(key, batch);
                }
                Err(e) => tracing::error!("research task failed: {}", e),
            }
            progress.inc();
        }
        progress.finish_and_clear();

        // Merge in extraction order so the store is independent of completion order
        for dependency in &dependencies {
            let Some(batch) = batches.remove(&dependency.key()) else {
                continue;
            };
            merge_batch(&mut store, dependency, batch);
        }

        store
    }
}

fn merge_batch(store: &mut FindingStore, dependency: &Dependency, batch: ResearchBatch) {
    for finding in batch.findings {
        if let Err(e) = store.record(&dependency.name, finding) {
            tracing::error!("{}", e);
        }
    }
    for gap in batch.gaps {
        if let Err(e) = store.record_gap(&dependency.name, gap) {
            tracing::error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DocsCapability, FetchCapability, SearchCapability};
    use crate::clock::FixedClock;
    use crate::domain::ChecklistItem;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Search that answers by dependency name prefix and records queries
    #[derive(Default)]
    struct FakeSearch {
        hits: Vec<(String, Vec<SearchHit>)>,
        error: Option<CapabilityError>,
        queries: Mutex<Vec<(String, Option<String>)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay_ms: u64,
    }

    #[async_trait]
    impl SearchCapability for FakeSearch {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn search(
            &self,
            query: &str,
            domain_hint: Option<&str>,
        ) -> Result<Vec<SearchHit>, CapabilityError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), domain_hint.map(str::to_string)));
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            let lower = query.to_lowercase();
            Ok(self
                .hits
                .iter()
                .find(|(prefix, _)| lower.starts_with(&prefix.to_lowercase()))
                .map(|(_, hits)| hits.clone())
                .unwrap_or_default())
        }
    }

    /// Fetch with per-URL scripted responses; the last response repeats
    #[derive(Default)]
    struct FakeFetch {
        responses: Mutex<HashMap<String, VecDeque<Result<String, CapabilityError>>>>,
        attempts: Mutex<HashMap<String, usize>>,
    }

    impl FakeFetch {
        fn script(self, url: &str, responses: Vec<Result<String, CapabilityError>>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), responses.into());
            self
        }

        fn attempts(&self, url: &str) -> usize {
            self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl FetchCapability for FakeFetch {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
            *self.attempts.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            let mut responses = self.responses.lock().unwrap();
            let queue = match responses.get_mut(url) {
                Some(queue) => queue,
                None => return Err(CapabilityError::unreachable(url, "connection refused")),
            };
            let next = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            match next {
                Some(Ok(content)) => Ok(FetchedPage::new(url, content)),
                Some(Err(e)) => Err(e),
                None => Err(CapabilityError::unreachable(url, "connection refused")),
            }
        }
    }

    /// Docs keyed by dependency name
    #[derive(Default)]
    struct FakeDocs {
        libraries: HashMap<String, (String, Vec<DocSnippet>)>,
    }

    impl FakeDocs {
        fn library(mut self, name: &str, id: &str, snippets: Vec<DocSnippet>) -> Self {
            self.libraries
                .insert(dependency_key(name), (id.to_string(), snippets));
            self
        }
    }

    #[async_trait]
    impl DocsCapability for FakeDocs {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn resolve_id(&self, name: &str) -> Result<String, CapabilityError> {
            self.libraries
                .get(&dependency_key(name))
                .map(|(id, _)| id.clone())
                .ok_or_else(|| CapabilityError::not_found(name))
        }

        async fn query_docs(
            &self,
            library_id: &str,
            _question: &str,
        ) -> Result<Vec<DocSnippet>, CapabilityError> {
            Ok(self
                .libraries
                .values()
                .find(|(id, _)| id == library_id)
                .map(|(_, snippets)| snippets.clone())
                .unwrap_or_default())
        }
    }

    fn config() -> ResearchConfig {
        let mut config = ResearchConfig::default();
        config.research.retry_backoff_ms = 1;
        config
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 2, 8, 10, 0, 0).unwrap(),
        ))
    }

    fn orchestrator(
        config: ResearchConfig,
        search: Arc<FakeSearch>,
        fetch: Arc<FakeFetch>,
        docs: FakeDocs,
    ) -> Orchestrator {
        Orchestrator::new(config, Capabilities::new(search, fetch, Arc::new(docs)))
            .with_clock(clock())
    }

    fn hits(urls: &[&str]) -> Vec<SearchHit> {
        urls.iter().map(|u| SearchHit::new(*u, "snippet")).collect()
    }

    #[test]
    fn test_filter_defaults_to_everything() {
        let filter = DependencyFilter::new();
        assert!(filter.should_research("FastAPI"));
    }

    #[test]
    fn test_filter_exclude_and_only() {
        let filter = DependencyFilter::new().with_exclude(vec!["react".to_string()]);
        assert!(!filter.should_research("React"));
        assert!(filter.should_research("FastAPI"));

        let filter = DependencyFilter::new()
            .with_only(vec!["React".to_string()])
            .with_exclude(vec!["react".to_string()]);
        assert!(filter.should_research("react"));
        assert!(!filter.should_research("FastAPI"));
    }

    #[test]
    fn test_research_query_with_and_without_version() {
        let dep = Dependency::new("FastAPI", "").with_version("0.110");
        assert_eq!(research_query(&dep, 2026), "FastAPI 0.110 documentation 2026");
        let dep = Dependency::new("React", "");
        assert_eq!(research_query(&dep, 2026), "React documentation 2026");
    }

    #[test]
    fn test_docs_question() {
        let dep = Dependency::new("React", "Build the UI with React hooks.");
        assert_eq!(docs_question(&dep), "Build the UI with React hooks.");
        let dep = Dependency::new("React", "").with_version("19");
        assert_eq!(docs_question(&dep), "React 19");
    }

    #[test]
    fn test_fetch_targets_dedupes_and_caps() {
        let hits = hits(&["https://a", "https://a", "https://b", "", "https://c"]);
        assert_eq!(fetch_targets(&hits, 2), vec!["https://a", "https://b"]);
        assert!(fetch_targets(&hits, 0).is_empty());
    }

    #[tokio::test]
    async fn test_full_research_meets_every_item() {
        let search = Arc::new(FakeSearch {
            hits: vec![(
                "FastAPI".to_string(),
                hits(&["https://fastapi.tiangolo.com/release-notes/"]),
            )],
            ..Default::default()
        });
        let fetch = Arc::new(FakeFetch::default().script(
            "https://fastapi.tiangolo.com/release-notes/",
            vec![Ok("FastAPI 0.110.0 release notes".to_string())],
        ));
        let docs = FakeDocs::default().library(
            "FastAPI",
            "/tiangolo/fastapi",
            vec![DocSnippet::new(
                "Dependencies with yield",
                "https://fastapi.tiangolo.com/tutorial/",
            )],
        );

        let result = orchestrator(config(), search.clone(), fetch, docs)
            .run("Build an API with FastAPI 0.110.")
            .await;

        assert_eq!(result.dependencies().len(), 1);
        let findings = result.store.query("FastAPI");
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().any(|f| f.capability == Capability::Fetch && f.version == "0.110"));
        assert!(result.passed());
        assert_eq!(result.time_info.year, "2026");

        let queries = search.queries.lock().unwrap();
        assert_eq!(queries[0].0, "FastAPI 0.110 documentation 2026");
    }

    #[tokio::test]
    async fn test_fetch_failure_after_retry_records_one_gap() {
        let url = "https://react.dev/blog";
        let search = Arc::new(FakeSearch {
            hits: vec![("React".to_string(), hits(&[url]))],
            ..Default::default()
        });
        let fetch = Arc::new(FakeFetch::default().script(
            url,
            vec![Err(CapabilityError::timeout(url)), Err(CapabilityError::timeout(url))],
        ));

        let result = orchestrator(config(), search, fetch.clone(), FakeDocs::default())
            .run("Use React for the frontend.")
            .await;

        assert_eq!(fetch.attempts(url), 2);
        let fetch_gaps: Vec<_> = result
            .store
            .gaps("React")
            .iter()
            .filter(|g| g.capability == Capability::Fetch)
            .collect();
        assert_eq!(fetch_gaps.len(), 1);
        assert_eq!(fetch_gaps[0].target, url);

        let validation = result.report.get("React").unwrap();
        assert!(validation.is_met(ChecklistItem::Discovery));
        assert!(!validation.is_met(ChecklistItem::ContentRead));
    }

    #[tokio::test]
    async fn test_fetch_retry_recovers() {
        let url = "https://react.dev/blog";
        let search = Arc::new(FakeSearch {
            hits: vec![("React".to_string(), hits(&[url]))],
            ..Default::default()
        });
        let fetch = Arc::new(FakeFetch::default().script(
            url,
            vec![
                Err(CapabilityError::unreachable(url, "reset")),
                Ok("React 19.1 is out".to_string()),
            ],
        ));

        let result = orchestrator(config(), search, fetch.clone(), FakeDocs::default())
            .run("Use React for the frontend.")
            .await;

        assert_eq!(fetch.attempts(url), 2);
        assert_eq!(result.store.by_capability("React", Capability::Fetch).count(), 1);
        assert!(result
            .store
            .gaps("React")
            .iter()
            .all(|g| g.capability != Capability::Fetch));
    }

    #[tokio::test]
    async fn test_non_retryable_fetch_is_not_retried() {
        let url = "https://react.dev/blog";
        let search = Arc::new(FakeSearch {
            hits: vec![("React".to_string(), hits(&[url]))],
            ..Default::default()
        });
        let fetch = Arc::new(FakeFetch::default().script(
            url,
            vec![Err(CapabilityError::invalid_response(url, "empty page"))],
        ));

        orchestrator(config(), search, fetch.clone(), FakeDocs::default())
            .run("Use React for the frontend.")
            .await;

        assert_eq!(fetch.attempts(url), 1);
    }

    #[tokio::test]
    async fn test_empty_search_and_unknown_library_are_gaps() {
        let search = Arc::new(FakeSearch::default());
        let fetch = Arc::new(FakeFetch::default());

        let result = orchestrator(config(), search, fetch, FakeDocs::default())
            .run("Deploy with `obscure-lib`.")
            .await;

        assert!(result.store.query("obscure-lib").is_empty());
        let gaps = result.store.gaps("obscure-lib");
        assert_eq!(gaps.len(), 2);
        assert!(gaps.iter().any(|g| g.capability == Capability::Search
            && g.reason.contains("no results found")));
        assert!(gaps.iter().any(|g| g.capability == Capability::StructuredQuery
            && g.target == "obscure-lib"));

        let validation = result.report.get("obscure-lib").unwrap();
        assert_eq!(validation.unmet.len(), 4);
        assert!(!result.passed());
    }

    #[tokio::test]
    async fn test_search_failure_keeps_docs_path() {
        let search = Arc::new(FakeSearch {
            error: Some(CapabilityError::unreachable("http://localhost:8888", "refused")),
            ..Default::default()
        });
        let docs = FakeDocs::default().library(
            "React",
            "/facebook/react",
            vec![DocSnippet::new("useState in React 19.1", "https://react.dev/reference")],
        );

        let result = orchestrator(config(), search, Arc::new(FakeFetch::default()), docs)
            .run("Use React.")
            .await;

        let findings = result.store.query("React");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].capability, Capability::StructuredQuery);
        assert_eq!(findings[0].version, "19.1");
        assert_eq!(result.store.gaps("React")[0].capability, Capability::Search);
    }

    #[tokio::test]
    async fn test_library_without_snippets_is_a_gap() {
        let docs = FakeDocs::default().library("Redis", "/redis/redis", Vec::new());

        let result = orchestrator(
            config(),
            Arc::new(FakeSearch::default()),
            Arc::new(FakeFetch::default()),
            docs,
        )
        .run("Cache sessions in Redis.")
        .await;

        assert!(result.store.query("Redis").is_empty());
        let docs_gaps: Vec<_> = result
            .store
            .gaps("Redis")
            .iter()
            .filter(|g| g.capability == Capability::StructuredQuery)
            .collect();
        assert_eq!(docs_gaps.len(), 1);
        assert_eq!(docs_gaps[0].target, "/redis/redis");
        assert_eq!(docs_gaps[0].reason, "no documentation snippets returned");
    }

    #[tokio::test]
    async fn test_domain_hint_is_passed_to_search() {
        let mut config = config();
        config
            .search
            .domains
            .insert("fastapi".to_string(), "fastapi.tiangolo.com".to_string());
        let search = Arc::new(FakeSearch::default());

        orchestrator(config, search.clone(), Arc::new(FakeFetch::default()), FakeDocs::default())
            .run("FastAPI service")
            .await;

        let queries = search.queries.lock().unwrap();
        assert_eq!(queries[0].1.as_deref(), Some("fastapi.tiangolo.com"));
    }

    #[tokio::test]
    async fn test_filter_skips_dependencies() {
        let search = Arc::new(FakeSearch::default());
        let result = orchestrator(
            config(),
            search.clone(),
            Arc::new(FakeFetch::default()),
            FakeDocs::default(),
        )
        .with_filter(DependencyFilter::new().with_exclude(vec!["react".to_string()]))
            .run("FastAPI backend with a React frontend")
            .await;

        let names: Vec<_> = result.dependencies().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["FastAPI"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "React");
        assert_eq!(search.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_task_passes_vacuously() {
        let result = orchestrator(
            config(),
            Arc::new(FakeSearch::default()),
            Arc::new(FakeFetch::default()),
            FakeDocs::default(),
        )
        .run("")
        .await;

        assert!(result.dependencies().is_empty());
        assert!(result.passed());
    }

    #[tokio::test]
    async fn test_concurrency_limit_is_respected() {
        let mut config = config();
        config.research.concurrency = 2;
        let search = Arc::new(FakeSearch {
            delay_ms: 20,
            ..Default::default()
        });

        let result = orchestrator(
            config,
            search.clone(),
            Arc::new(FakeFetch::default()),
            FakeDocs::default(),
        )
        .run("`alpha-lib` `beta-lib` `gamma-lib` `delta-lib` `epsilon-lib`")
            .await;

        assert_eq!(result.dependencies().len(), 5);
        assert!(search.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(search.queries.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_store_order_follows_extraction_order() {
        let result = orchestrator(
            config(),
            Arc::new(FakeSearch::default()),
            Arc::new(FakeFetch::default()),
            FakeDocs::default(),
        )
        .run("React frontend, FastAPI backend, PostgreSQL storage")
        .await;

        let names: Vec<_> = result.report.results.iter().map(|r| r.dependency.as_str()).collect();
        assert_eq!(names, vec!["React", "FastAPI", "PostgreSQL"]);
    }
}

//! Integration tests for groundwork
//!
//! These tests verify:
//! - Dependency extraction from realistic task descriptions
//! - The full research pipeline driven by in-memory capabilities
//! - Report rendering from a research result
//! - Config file loading with CLI overrides

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use groundwork::capability::{
    Capabilities, DocSnippet, DocsCapability, FetchCapability, FetchedPage, SearchCapability,
    SearchHit,
};
use groundwork::clock::{Clock, FixedClock};
use groundwork::config::ResearchConfig;
use groundwork::error::CapabilityError;
use groundwork::orchestrator::{Orchestrator, OrchestratorResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Search returning fixed hits per dependency name prefix
struct MapSearch {
    hits: HashMap<String, Vec<SearchHit>>,
}

#[async_trait]
impl SearchCapability for MapSearch {
    fn name(&self) -> &'static str {
        "map"
    }

    async fn search(
        &self,
        query: &str,
        _domain_hint: Option<&str>,
    ) -> Result<Vec<SearchHit>, CapabilityError> {
        let name = query.split_whitespace().next().unwrap_or_default().to_lowercase();
        Ok(self.hits.get(&name).cloned().unwrap_or_default())
    }
}

/// Fetch serving fixed pages; anything else times out
struct MapFetch {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

#[async_trait]
impl FetchCapability for MapFetch {
    fn name(&self) -> &'static str {
        "map"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .map(|content| FetchedPage::new(url, content.clone()))
            .ok_or_else(|| CapabilityError::timeout(url))
    }
}

/// Docs that know no library at all
struct NoDocs;

#[async_trait]
impl DocsCapability for NoDocs {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn resolve_id(&self, name: &str) -> Result<String, CapabilityError> {
        Err(CapabilityError::not_found(name))
    }

    async fn query_docs(
        &self,
        library_id: &str,
        _question: &str,
    ) -> Result<Vec<DocSnippet>, CapabilityError> {
        Err(CapabilityError::not_found(library_id))
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
    ))
}

fn fast_config() -> ResearchConfig {
    let mut config = ResearchConfig::default();
    config.research.retry_backoff_ms = 1;
    config
}

/// FastAPI is fully documented, React's only page times out
fn fixtures() -> (MapSearch, Arc<MapFetch>) {
    let mut hits = HashMap::new();
    hits.insert(
        "fastapi".to_string(),
        vec![SearchHit::new(
            "https://fastapi.tiangolo.com/release-notes/",
            "FastAPI release notes",
        )],
    );
    hits.insert(
        "react".to_string(),
        vec![SearchHit::new("https://react.dev/blog", "React blog")],
    );

    let mut pages = HashMap::new();
    pages.insert(
        "https://fastapi.tiangolo.com/release-notes/".to_string(),
        "Release notes. FastAPI 0.110.0 adds support for lifespan state.".to_string(),
    );

    (
        MapSearch { hits },
        Arc::new(MapFetch {
            pages,
            calls: AtomicUsize::new(0),
        }),
    )
}

async fn run(task: &str) -> (OrchestratorResult, Arc<MapFetch>) {
    let (search, fetch) = fixtures();
    let capabilities = Capabilities::new(Arc::new(search), fetch.clone(), Arc::new(NoDocs));
    let result = Orchestrator::new(fast_config(), capabilities)
        .with_clock(clock())
        .run(task)
        .await;
    (result, fetch)
}

mod extraction {
    use groundwork::extractor::DependencyExtractor;

    #[test]
    fn test_extract_realistic_task() {
        let task = "Build a REST API with FastAPI 0.110 backed by PostgreSQL. \
                    The dashboard uses Next.js 14 and `zod` for validation; \
                    install react@18.2.0 explicitly.";
        let deps = DependencyExtractor::default().extract(task);
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names[0], "FastAPI");
        assert!(names.contains(&"PostgreSQL"));
        assert!(names.contains(&"Next.js"));
        assert!(names.contains(&"Zod"));

        let fastapi = &deps[0];
        assert_eq!(fastapi.version.as_deref(), Some("0.110"));
        assert!(fastapi.rationale.starts_with("Build a REST API with FastAPI 0.110"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let task = "Use React 18 with `zustand`, then upgrade react@18.2.0 and add Redis.";
        let extractor = DependencyExtractor::default();
        assert_eq!(extractor.extract(task), extractor.extract(task));
    }

    #[test]
    fn test_merge_keeps_most_specific_version() {
        let deps =
            DependencyExtractor::default().extract("Use React 18 now. Later pin react@18.2.0.");
        let react: Vec<_> = deps.iter().filter(|d| d.key() == "react").collect();
        assert_eq!(react.len(), 1);
        assert_eq!(react[0].version.as_deref(), Some("18.2.0"));
    }

    #[test]
    fn test_extra_known_names() {
        let extractor = DependencyExtractor::with_known(["acme-billing-sdk"]);
        let deps = extractor.extract("Charge cards through acme-billing-sdk 3.2");
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "acme-billing-sdk");
        assert_eq!(deps[0].version.as_deref(), Some("3.2"));
    }

    #[test]
    fn test_empty_task() {
        assert!(DependencyExtractor::default().extract("").is_empty());
    }
}

mod pipeline {
    use super::*;
    use groundwork::domain::{Capability, ChecklistItem};

    #[tokio::test]
    async fn test_pipeline_records_findings_and_gaps() {
        let (result, fetch) =
            run("Serve the API with FastAPI 0.110 and render it with React.").await;

        let names: Vec<_> = result.dependencies().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["FastAPI", "React"]);

        // FastAPI: search + fetch; docs path recorded a gap
        let fastapi = result.store.query("FastAPI");
        assert_eq!(fastapi.len(), 2);
        assert!(fastapi
            .iter()
            .any(|f| f.capability == Capability::Fetch && f.version == "0.110"));
        assert!(result.report.get("FastAPI").unwrap().passed());

        // React: the one page timed out twice, leaving one fetch gap
        let react_gaps: Vec<_> = result
            .store
            .gaps("React")
            .iter()
            .filter(|g| g.capability == Capability::Fetch)
            .collect();
        assert_eq!(react_gaps.len(), 1);
        let react = result.report.get("React").unwrap();
        assert!(react.is_met(ChecklistItem::Discovery));
        assert!(!react.is_met(ChecklistItem::ContentRead));

        // One FastAPI fetch plus two React attempts
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 3);
        assert!(!result.passed());
    }

    #[tokio::test]
    async fn test_pipeline_without_dependencies_passes() {
        let (result, fetch) = run("Rename the loop variable in the parser.").await;
        assert!(result.dependencies().is_empty());
        assert!(result.passed());
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pipeline_time_info_uses_clock() {
        let (result, _) = run("FastAPI").await;
        assert_eq!(result.time_info.quarter, "Q4 2026");
        assert_eq!(result.time_info.date_iso, "2026-10-19");
    }
}

mod rendering {
    use super::*;
    use groundwork::output::{create_formatter, OutputConfig, OutputFormat, Verbosity};

    async fn render(format: OutputFormat) -> String {
        let (result, _) = run("Serve the API with FastAPI 0.110 and render it with React.").await;
        let config = OutputConfig::new(format, Verbosity::Normal).with_color(false);
        let formatter = create_formatter(config);
        let mut output = Vec::new();
        formatter.format(&result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_markdown_report_cites_sources() {
        let output = render(OutputFormat::Markdown).await;
        assert!(output.contains("# Research report"));
        assert!(output.contains("<https://fastapi.tiangolo.com/release-notes/>"));
        assert!(output.contains("### Coverage gaps"));
        assert!(output.contains("fetch https://react.dev/blog"));
    }

    #[tokio::test]
    async fn test_json_report_is_valid() {
        let output = render(OutputFormat::Json).await;
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["passed"], false);
        assert_eq!(parsed["summary"]["dependencies"], 2);
        assert_eq!(parsed["dependencies"][0]["name"], "FastAPI");
        assert_eq!(parsed["dependencies"][0]["passed"], true);
    }

    #[tokio::test]
    async fn test_summary_report() {
        let output = render(OutputFormat::Summary).await;
        assert!(output.contains("Research incomplete: 1 of 2 dependencies fully researched"));
    }
}

mod config_loading {
    use groundwork::config::{ConfigOverrides, ResearchConfig};
    use std::fs;

    #[test]
    fn test_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groundwork.toml");
        fs::write(
            &path,
            r#"
[research]
max_urls = 5
concurrency = 2

[search]
endpoint = "http://searx.internal:8080"

[search.domains]
react = "react.dev"
"#,
        )
        .unwrap();

        let mut config = ResearchConfig::load(Some(&path)).unwrap();
        config.apply(ConfigOverrides {
            concurrency: Some(6),
            ..Default::default()
        });
        config.validate().unwrap();

        assert_eq!(config.research.max_urls, 5);
        assert_eq!(config.research.concurrency, 6);
        assert_eq!(config.search.endpoint, "http://searx.internal:8080");
        assert_eq!(config.domain_hint("React"), Some("react.dev"));
    }
}

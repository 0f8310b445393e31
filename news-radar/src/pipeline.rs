use crate::config::RadarConfig;
use crate::digest::DigestRenderer;
use crate::processing::{filter_unseen, rank_items, RelevanceScorer};
use crate::sources::build_sources;
use crate::state::SeenStateStore;
use crate::traits::PullFeed;
use crate::types::{
    Digest, DigestDelivery, Item, RadarError, Result, SeenStore, DIGEST_ITEM_LIMIT,
};
use crate::utils::time::now_unix_seconds;
use crate::Fetcher;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Phases of one run. `Failed` is terminal and skips `CommitState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Collecting,
    DedupScore,
    Render,
    Deliver,
    CommitState,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "INIT",
            RunPhase::Collecting => "COLLECTING",
            RunPhase::DedupScore => "DEDUP_SCORE",
            RunPhase::Render => "RENDER",
            RunPhase::Deliver => "DELIVER",
            RunPhase::CommitState => "COMMIT_STATE",
            RunPhase::Done => "DONE",
            RunPhase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub collected: usize,
    pub failed_sources: Vec<String>,
    pub already_seen: usize,
    pub new_items: usize,
    pub selected: Vec<Item>,
    pub digest: Digest,
    pub delivered: bool,
    pub phase: RunPhase,
}

/// Collected items plus the sources that failed along the way.
#[derive(Debug, Default)]
pub struct Collection {
    pub items: Vec<Item>,
    pub failed_sources: Vec<String>,
}

/// Source health as reported by `check_sources`.
#[derive(Debug, Clone)]
pub struct SourceHealth {
    pub name: String,
    pub url: String,
    pub reachable: bool,
}

/// Collect -> dedup -> score -> rank -> render -> deliver -> commit.
pub struct RadarPipeline {
    sources: Vec<Box<dyn PullFeed>>,
    scorer: RelevanceScorer,
    renderer: DigestRenderer,
    max_items: usize,
}

impl RadarPipeline {
    pub fn new(scorer: RelevanceScorer, renderer: DigestRenderer) -> Self {
        Self {
            sources: Vec::new(),
            scorer,
            renderer,
            max_items: DIGEST_ITEM_LIMIT,
        }
    }

    /// Wire a pipeline from configuration, with one shared fetcher.
    pub fn from_config(config: &RadarConfig, fetcher: Arc<Fetcher>) -> Self {
        let scorer = RelevanceScorer::new(&config.keywords, config.trusted_prefixes());
        let renderer = DigestRenderer::new(config.digest.subject.clone());

        let mut pipeline = Self::new(scorer, renderer).with_max_items(config.digest.max_items);
        for source in build_sources(config, fetcher) {
            pipeline.add_source(source);
        }
        pipeline
    }

    pub fn add_source(&mut self, source: Box<dyn PullFeed>) {
        info!(
            "Adding source to pipeline: {} ({})",
            source.source_name(),
            source.kind().as_str()
        );
        self.sources.push(source);
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Pull every source in order. A failing source contributes nothing.
    pub async fn collect(&self) -> Collection {
        let mut collection = Collection::default();

        for source in &self.sources {
            match source.pull().await {
                Ok(mut items) => {
                    info!("Pulled {} items from source: {}", items.len(), source.source_name());
                    collection.items.append(&mut items);
                }
                Err(e) => {
                    warn!("Source {} failed, continuing without it: {}", source.source_name(), e);
                    collection.failed_sources.push(source.source_name());
                }
            }
        }

        collection
    }

    /// Gate out seen items, score the rest and keep the top ones.
    /// Returns (selected, new item count, already seen count).
    pub fn select(&self, items: Vec<Item>, seen: &SeenStore) -> (Vec<Item>, usize, usize) {
        let (mut fresh, already_seen) = filter_unseen(items, seen);
        let new_count = fresh.len();

        self.scorer.score_all(&mut fresh);
        let selected = rank_items(fresh, self.max_items);

        (selected, new_count, already_seen)
    }

    /// One full run: collect, select, render, deliver, then record what was delivered.
    ///
    /// State is only written after the delivery collaborator reports success.
    pub async fn run(
        &self,
        state: &dyn SeenStateStore,
        delivery: &dyn DigestDelivery,
    ) -> Result<RunReport> {
        self.run_on(state, delivery, Local::now().date_naive()).await
    }

    pub async fn run_on(
        &self,
        state: &dyn SeenStateStore,
        delivery: &dyn DigestDelivery,
        date: NaiveDate,
    ) -> Result<RunReport> {
        let mut seen = self.load_state(state)?;
        let mut report = self.prepare(&seen, date).await;

        log_phase(RunPhase::Deliver);
        if let Err(source) = delivery.deliver(&report.digest).await {
            log_phase(RunPhase::Failed);
            error!("Delivery via {} failed, state left untouched", delivery.channel_name());
            return Err(RadarError::Delivery {
                channel: delivery.channel_name(),
                source,
            });
        }
        report.delivered = true;

        log_phase(RunPhase::CommitState);
        let timestamp = now_unix_seconds();
        for item in &report.selected {
            seen.record(&item.identity, &item.url, timestamp);
        }
        state.save(&seen)?;

        report.phase = RunPhase::Done;
        log_phase(RunPhase::Done);
        info!(
            "Run complete: {} collected, {} new, {} delivered, {} sources failed",
            report.collected,
            report.new_items,
            report.selected.len(),
            report.failed_sources.len()
        );
        Ok(report)
    }

    /// Everything up to and including rendering. Nothing is delivered or saved.
    pub async fn preview(&self, state: &dyn SeenStateStore) -> Result<RunReport> {
        let seen = self.load_state(state)?;
        Ok(self.prepare(&seen, Local::now().date_naive()).await)
    }

    fn load_state(&self, state: &dyn SeenStateStore) -> Result<SeenStore> {
        log_phase(RunPhase::Init);
        let seen = state.load()?;
        info!(
            "Starting run with {} sources, {} seen records ({})",
            self.sources.len(),
            seen.len(),
            state.describe()
        );
        Ok(seen)
    }

    async fn prepare(&self, seen: &SeenStore, date: NaiveDate) -> RunReport {
        log_phase(RunPhase::Collecting);
        let collection = self.collect().await;
        let collected = collection.items.len();

        log_phase(RunPhase::DedupScore);
        let (selected, new_items, already_seen) = self.select(collection.items, seen);
        info!(
            "{} collected, {} already seen, {} new, {} selected",
            collected,
            already_seen,
            new_items,
            selected.len()
        );

        log_phase(RunPhase::Render);
        let digest = self.renderer.render(&selected, date);

        RunReport {
            collected,
            failed_sources: collection.failed_sources,
            already_seen,
            new_items,
            selected,
            digest,
            delivered: false,
            phase: RunPhase::Render,
        }
    }

    /// Probe every source without collecting.
    pub async fn check_sources(&self) -> Vec<SourceHealth> {
        let mut results = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let reachable = source.health_check().await.unwrap_or(false);
            results.push(SourceHealth {
                name: source.source_name(),
                url: source.source_url(),
                reachable,
            });
        }
        results
    }
}

fn log_phase(phase: RunPhase) {
    info!("phase={}", phase);
}

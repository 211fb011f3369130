//! Main transfer scraper API
//!
//! This module ties the client, the parsers, the assembler and the exporter
//! together. Requests are strictly sequential with a fixed pause between
//! them.

use tracing::{info, warn};

use crate::client::TransferClient;
use crate::config::{LeagueDescriptor, ScrapeConfig, WindowErrorPolicy};
use crate::dataset::{assemble_season, assemble_window, Dataset};
use crate::error::Result;
use crate::export::{CsvExporter, ExportSummary};
use crate::pacing::{Pacer, TokioPacer};
use crate::parser::parse_transfers_page;
use crate::types::{PageRequest, Window};

/// A league the run did not (fully) scrape, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLeague {
    pub league: String,
    pub reason: String,
}

/// A season whose windows all failed; its previous export is left in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSeason {
    pub league: String,
    pub season: u16,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub exports: Vec<ExportSummary>,
    pub skipped_leagues: Vec<SkippedLeague>,
    pub skipped_seasons: Vec<SkippedSeason>,
}

/// Scraper for league transfer pages
///
/// # Example
/// ```no_run
/// use transfers_core::{ScrapeConfig, TransferScraper};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = TransferScraper::new(ScrapeConfig::default())?;
///     let summary = scraper.run().await?;
///     println!("Wrote {} files", summary.exports.len());
///     Ok(())
/// }
/// ```
pub struct TransferScraper<P = TokioPacer> {
    client: TransferClient,
    exporter: CsvExporter,
    config: ScrapeConfig,
    pacer: P,
}

impl TransferScraper {
    /// Create a scraper that pauses with `tokio::time::sleep`.
    ///
    /// # Arguments
    /// * `config` - Leagues, output directory, pause and client settings
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        Self::with_pacer(config, TokioPacer)
    }
}

impl<P: Pacer> TransferScraper<P> {
    /// Create a scraper with a custom pacer.
    ///
    /// # Arguments
    /// * `config` - Leagues, output directory, pause and client settings
    /// * `pacer` - Waits between consecutive page requests
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_pacer(config: ScrapeConfig, pacer: P) -> Result<Self> {
        let client = TransferClient::with_config(config.client.clone())?;
        let exporter = CsvExporter::new(config.output_dir.clone());
        Ok(Self {
            client,
            exporter,
            config,
            pacer,
        })
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Fetch one window page and assemble its club tables.
    ///
    /// No pause is taken here.
    ///
    /// # Arguments
    /// * `league` - League slug and identifier used to build the URL
    /// * `season` - Start year of the season (e.g. 2018 for 2018/19)
    /// * `window` - Summer or winter transfer window
    ///
    /// # Returns
    /// The window's rows, inbound tables first, placeholders included
    ///
    /// # Errors
    /// - `TransferError::HttpError` - the page could not be fetched
    /// - `TransferError::TableShape` / `TransferError::RowShape` - the
    ///   tables do not fit the known layout
    pub async fn scrape_window(
        &self,
        league: &LeagueDescriptor,
        season: u16,
        window: Window,
    ) -> Result<Dataset> {
        let request = PageRequest::new(&league.name, &league.id, season, window);
        let html = self.client.fetch(&request).await?;

        let clubs = parse_transfers_page(&html, &request)?;
        info!(
            "Got data for {} {} {} transfer window",
            season,
            league.name.to_uppercase(),
            window.code().to_uppercase()
        );
        info!(clubs = clubs.len(), "Formatted transfers");

        let dataset = assemble_window(clubs)?;
        info!(rows = dataset.len(), "Created dataframes");
        Ok(dataset)
    }

    /// Scrape both windows of a season, pausing between them.
    ///
    /// # Arguments
    /// * `league` - League to scrape
    /// * `season` - Start year of the season
    ///
    /// # Errors
    /// Any window error is returned as is.
    pub async fn scrape_season(&self, league: &LeagueDescriptor, season: u16) -> Result<Dataset> {
        let mut fetches = 0;
        let mut windows = Vec::with_capacity(Window::ALL.len());
        for window in Window::ALL {
            windows.push(self.paced_window(league, season, window, &mut fetches).await?);
        }
        Ok(assemble_season(windows))
    }

    /// Scrape and export every configured league and season.
    ///
    /// Leagues with a malformed descriptor are logged and skipped. A failed
    /// window is handled according to `on_window_error`; a season with no
    /// successful window is not exported.
    ///
    /// # Errors
    /// - a window error when the policy is `Abort`
    /// - `TransferError::Io` / `TransferError::Csv` - a file cannot be written
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut fetches = 0;

        'leagues: for entry in &self.config.leagues {
            let league = match entry.descriptor() {
                Ok(league) => league,
                Err(error) => {
                    warn!(league = %entry.label(), %error, "skipping league");
                    summary.skipped_leagues.push(SkippedLeague {
                        league: entry.label(),
                        reason: error.to_string(),
                    });
                    continue;
                }
            };

            for season in league.seasons() {
                let mut windows = Vec::with_capacity(Window::ALL.len());
                for window in Window::ALL {
                    match self.paced_window(league, season, window, &mut fetches).await {
                        Ok(dataset) => windows.push(dataset),
                        Err(error) => match self.config.on_window_error {
                            WindowErrorPolicy::SkipWindow => {
                                warn!(league = %league.name, season, %window, %error, "skipping window");
                            }
                            WindowErrorPolicy::SkipLeague => {
                                warn!(league = %league.name, season, %window, %error, "skipping rest of league");
                                summary.skipped_leagues.push(SkippedLeague {
                                    league: league.name.clone(),
                                    reason: error.to_string(),
                                });
                                continue 'leagues;
                            }
                            WindowErrorPolicy::Abort => return Err(error),
                        },
                    }
                }

                if windows.is_empty() {
                    warn!(league = %league.name, season, "no window scraped, keeping previous export");
                    summary.skipped_seasons.push(SkippedSeason {
                        league: league.name.clone(),
                        season,
                    });
                    continue;
                }

                let dataset = assemble_season(windows);
                let export = self
                    .exporter
                    .export(dataset, &season.to_string(), &league.name)?;
                summary.exports.push(export);
            }
        }

        info!("Done!");
        Ok(summary)
    }

    /// Pause unless this is the first request, then scrape the window.
    async fn paced_window(
        &self,
        league: &LeagueDescriptor,
        season: u16,
        window: Window,
        fetches: &mut usize,
    ) -> Result<Dataset> {
        if *fetches > 0 {
            self.pacer.pause(self.config.pause()).await;
        }
        *fetches += 1;
        self.scrape_window(league, season, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::config::LeagueEntry;
    use crate::error::TransferError;
    use std::future::Future;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingPacer {
        pauses: Mutex<Vec<Duration>>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.pauses.lock().unwrap().push(duration);
            std::future::ready(())
        }
    }

    const EMPTY_PAGE: &str = "<html><body><div class=\"table-header\">Transfers</div></body></html>";

    const SHORT_HEADER_PAGE: &str = r#"<div class="table-header">Heading</div><div class="table-header">Club</div>
        <div class="responsive-table"><table><tr><th>In</th><th>Fee</th></tr></table></div>
        <div class="responsive-table"><table><tr><th>Out</th><th>Fee</th></tr></table></div>"#;

    fn config(base_url: &str, output_dir: &std::path::Path, leagues: Vec<LeagueEntry>) -> ScrapeConfig {
        ScrapeConfig {
            leagues,
            output_dir: output_dir.to_path_buf(),
            pause_secs: 3,
            on_window_error: WindowErrorPolicy::Abort,
            client: ClientConfig {
                base_url: base_url.to_string(),
                ..ClientConfig::default()
            },
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = TransferScraper::new(ScrapeConfig::default());
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_rejects_bad_base_url() {
        let mut config = ScrapeConfig::default();
        config.client.base_url = "localhost".to_string();
        assert!(matches!(
            TransferScraper::new(config),
            Err(TransferError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_league_is_skipped_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let leagues = vec![LeagueDescriptor::single_season("Premier League", "GB1", 2018).into()];

        let scraper =
            TransferScraper::with_pacer(config(&server.uri(), dir.path(), leagues), RecordingPacer::default())
                .unwrap();
        let summary = scraper.run().await.unwrap();

        assert!(summary.exports.is_empty());
        assert_eq!(summary.skipped_leagues.len(), 1);
        assert_eq!(summary.skipped_leagues[0].league, "Premier League");
    }

    #[tokio::test]
    async fn test_scrape_season_pauses_between_windows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
            .expect(2)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let scraper =
            TransferScraper::with_pacer(config(&server.uri(), dir.path(), vec![]), RecordingPacer::default())
                .unwrap();

        let league = LeagueDescriptor::single_season("premier-league", "GB1", 2018);
        let dataset = scraper.scrape_season(&league, 2018).await.unwrap();

        assert!(dataset.is_empty());
        assert_eq!(*scraper.pacer().pauses.lock().unwrap(), vec![Duration::from_secs(3)]);
    }

    #[tokio::test]
    async fn test_scrape_window_logs_progress_at_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let scraper =
            TransferScraper::with_pacer(config(&server.uri(), dir.path(), vec![]), RecordingPacer::default())
                .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let league = LeagueDescriptor::single_season("premier-league", "GB1", 2018);
        scraper.scrape_window(&league, 2018, Window::Winter).await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Got data for 2018 PREMIER-LEAGUE W transfer window"));
        assert!(output.contains("Formatted transfers"));
        assert!(output.contains("Created dataframes"));
    }

    #[tokio::test]
    async fn test_skip_window_policy_exports_remaining_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("s_w", "s"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SHORT_HEADER_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("s_w", "w"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let leagues = vec![LeagueDescriptor::single_season("premier-league", "GB1", 2018).into()];
        let mut config = config(&server.uri(), dir.path(), leagues);
        config.on_window_error = WindowErrorPolicy::SkipWindow;

        let scraper = TransferScraper::with_pacer(config, RecordingPacer::default()).unwrap();
        let summary = scraper.run().await.unwrap();

        assert_eq!(summary.exports.len(), 1);
        assert_eq!(summary.exports[0].rows, 0);
        assert!(summary.exports[0].path.ends_with("2018/premier-league.csv"));
    }

    #[tokio::test]
    async fn test_skip_window_policy_keeps_previous_export_when_all_windows_fail() {
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("2018").join("premier-league.csv");
        std::fs::create_dir_all(previous.parent().unwrap()).unwrap();
        std::fs::write(&previous, "Club,Name\nArsenal FC,Someone\n").unwrap();

        let leagues = vec![LeagueDescriptor::single_season("premier-league", "GB1", 2018).into()];
        let mut config = config("http://127.0.0.1:1", dir.path(), leagues);
        config.on_window_error = WindowErrorPolicy::SkipWindow;

        let scraper = TransferScraper::with_pacer(config, RecordingPacer::default()).unwrap();
        let summary = scraper.run().await.unwrap();

        assert!(summary.exports.is_empty());
        assert!(summary.skipped_leagues.is_empty());
        assert_eq!(
            summary.skipped_seasons,
            vec![SkippedSeason {
                league: "premier-league".to_string(),
                season: 2018,
            }]
        );
        assert_eq!(
            std::fs::read_to_string(&previous).unwrap(),
            "Club,Name\nArsenal FC,Someone\n"
        );
        assert_eq!(scraper.pacer().pauses.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_abort_policy_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let leagues = vec![LeagueDescriptor::single_season("premier-league", "GB1", 2018).into()];
        let scraper = TransferScraper::with_pacer(
            config("http://127.0.0.1:1", dir.path(), leagues),
            RecordingPacer::default(),
        )
        .unwrap();

        let result = scraper.run().await;
        assert!(matches!(result, Err(TransferError::HttpError(_))));
        assert!(!dir.path().join("2018").exists());
    }

    #[tokio::test]
    async fn test_skip_league_policy_moves_to_next_league() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/premier-league/transfers/wettbewerb/GB1/plus/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SHORT_HEADER_PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/championship/transfers/wettbewerb/GB2/plus/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
            .expect(2)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let leagues = vec![
            LeagueDescriptor::new("premier-league", "GB1", 2017, 2018).into(),
            LeagueDescriptor::single_season("championship", "GB2", 2018).into(),
        ];
        let mut config = config(&server.uri(), dir.path(), leagues);
        config.on_window_error = WindowErrorPolicy::SkipLeague;

        let scraper = TransferScraper::with_pacer(config, RecordingPacer::default()).unwrap();
        let summary = scraper.run().await.unwrap();

        assert_eq!(summary.exports.len(), 1);
        assert!(summary.exports[0].path.ends_with("2018/championship.csv"));
        assert_eq!(summary.skipped_leagues.len(), 1);
        assert_eq!(summary.skipped_leagues[0].league, "premier-league");
        // 3 fetches, 2 pauses
        assert_eq!(scraper.pacer().pauses.lock().unwrap().len(), 2);
    }
}

//! Player index pipeline: shards A–Z accumulated into one file.

use crate::models::{Category, OutputTarget, RunReport, Sheet};
use crate::services::fetcher::Transport;
use crate::services::{PageLocator, parser, player_table};
use crate::storage::PathResolver;
use crate::utils::log as banner;

use super::Pipeline;

impl<T: Transport> Pipeline<T> {
    /// Download every player index shard and write the `players` file.
    ///
    /// Rows are kept in shard order and never de-duplicated. The file is
    /// only written when at least one shard was parsed, so a run that
    /// failed everywhere leaves an earlier file untouched.
    pub async fn run_players(&mut self, out: &PathResolver, report: &mut RunReport) {
        banner::header("Player index");

        let mut sheet = Sheet::with_header(Category::Players.known_columns());
        let mut parsed = 0;

        let requests = PageLocator::shard_requests();
        let total = requests.len();
        for (i, request) in requests.iter().enumerate() {
            banner::step(i + 1, total, &request.to_string());
            let url = self.locator.url_for(request);
            let Some(page) = self.fetch_target(&url, report).await else {
                continue;
            };

            match player_table(&page) {
                Ok(table) => {
                    let records = parser::parse(&table);
                    banner::sub_item(&format!("{} players", records.len()));
                    sheet.extend(records);
                    report.succeed(&url);
                    parsed += 1;
                }
                Err(err) => {
                    log::warn!("Skipping {url}: {err}");
                    report.fail(&url, err);
                }
            }
        }

        if parsed == 0 {
            log::warn!("No player index shard could be read; nothing written");
            return;
        }
        self.write(out, &OutputTarget::Players, &sheet, report).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::Config;
    use crate::testutil::{FakeClock, MemorySink, StaticTransport};

    const BASE: &str = "https://pfr.test";

    fn shard(entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(id, name)| {
                format!(r#"<p><a href="/players/X/{id}.htm">{name}</a> (WR) 1990-1999</p>"#)
            })
            .collect();
        format!(r#"<html><body><div id="div_players">{items}</div></body></html>"#)
    }

    #[tokio::test]
    async fn missing_shards_are_skipped() {
        let transport = StaticTransport::new()
            .page(format!("{BASE}/players/A/"), shard(&[("AaaA00", "Al Able")]))
            .page(format!("{BASE}/players/B/"), shard(&[("BbbB00", "Bo Baker")]));
        let sink = Arc::new(MemorySink::new());
        let mut config = Config::default();
        config.site.base_url = BASE.to_string();
        let mut pipeline = Pipeline::new(&config, transport, sink.clone())
            .unwrap()
            .with_clock(Arc::new(FakeClock::new()));

        let mut report = RunReport::new();
        pipeline.run_players(&PathResolver::new("out"), &mut report).await;

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.not_found.len(), 24);
        assert_eq!(
            sink.contents("out/players").unwrap(),
            "name,position,years_active_start,years_active_end,active,player_id\n\
             Al Able,WR,1990,1999,false,AaaA00\n\
             Bo Baker,WR,1990,1999,false,BbbB00\n"
        );
    }

    #[tokio::test]
    async fn nothing_written_when_every_shard_fails() {
        let sink = Arc::new(MemorySink::new());
        let mut pipeline = Pipeline::new(&Config::default(), StaticTransport::new(), sink.clone())
            .unwrap()
            .with_clock(Arc::new(FakeClock::new()));

        let mut report = RunReport::new();
        pipeline.run_players(&PathResolver::new("out"), &mut report).await;

        assert!(sink.paths().is_empty());
        assert_eq!(report.not_found.len(), 26);
    }
}

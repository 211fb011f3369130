use transfers_core::{LeagueDescriptor, ScrapeConfig, TransferScraper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = TransferScraper::new(ScrapeConfig::default())?;
    let league = LeagueDescriptor::single_season("premier-league", "GB1", 2018);

    println!("Fetching {} {} transfers...\n", league.name, league.first_season);

    let dataset = scraper.scrape_season(&league, league.first_season).await?;
    let records = dataset.records();

    println!("{} transfers across both windows:", records.len());
    for record in records.iter().take(20) {
        println!(
            "  [{} {}] {} - {} ({}) {} {}",
            record.window,
            record.movement,
            record.club,
            record.name,
            record.nationality.as_deref().unwrap_or("?"),
            record.club_involved.as_deref().unwrap_or("?"),
            record.fee.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

use anyhow::Result;
use itertools::Itertools;
use sparselap::logger::LogLogger;
use sparselap::prelude::{LinkingSettings, SparseLapFrameToFrameTracker, SpotCollection};
use sparselap::test_stuff::random_walks;

fn main() -> Result<()> {
    env_logger::init();

    let frames = (0..200).filter(|f| f % 10 != 9).collect_vec();
    let spots = random_walks(400, &frames, 20.0, 1.5);
    let settings = LinkingSettings::default().max_distance(5.0).to_settings();

    let logger = LogLogger;
    let mut tracker = SparseLapFrameToFrameTracker::new(&spots, &settings).logger(&logger);
    let graph = tracker.process()?;

    eprintln!(
        "{} spots over {} frames, {} vertices, {} edges, {:?}",
        spots.total(true),
        spots.frames().len(),
        graph.vertex_count(),
        graph.edge_count(),
        tracker.processing_time()
    );
    Ok(())
}

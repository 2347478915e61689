use std::path::Path;

use lore_core::models::NewStory;
use lore_core::sync::PublishOutcome;

use crate::commands::common::{build_gateway, build_orchestrator, normalize_description, read_photo};
use crate::error::CliError;

pub async fn run_add(
    photo_path: &Path,
    description: &str,
    lat: Option<f64>,
    lon: Option<f64>,
    guest: bool,
    data_dir: &Path,
) -> Result<(), CliError> {
    let description = normalize_description(description)?;
    let photo = read_photo(photo_path)?;

    let mut story = NewStory::new(description, photo);
    if let (Some(lat), Some(lon)) = (lat, lon) {
        story = story.with_location(lat, lon);
    }

    if guest {
        let gateway = build_gateway()?;
        let remote_id = gateway
            .submit_guest(&story.description, &story.photo, story.lat, story.lon)
            .await?;
        println!("Published as guest: {remote_id}");
        return Ok(());
    }

    let (orchestrator, _ledger) = build_orchestrator(data_dir)?;
    match orchestrator.publish(story).await? {
        PublishOutcome::Published(remote_id) => println!("Published: {remote_id}"),
        PublishOutcome::Queued(draft) => {
            println!("Saved offline: {}", draft.id);
            println!("Run `lore sync` when back online to push queued stories.");
        }
    }
    Ok(())
}

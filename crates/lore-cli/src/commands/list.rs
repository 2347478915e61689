use crate::commands::common::{build_gateway, format_story_lines, story_to_item, StoryListItem};
use crate::error::CliError;

pub async fn run_list(
    page: Option<u32>,
    size: Option<u32>,
    include_location: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let gateway = build_gateway()?;
    let stories = gateway.list_stories(page, size, include_location).await?;

    if as_json {
        let json_items = stories.iter().map(story_to_item).collect::<Vec<StoryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if stories.is_empty() {
        println!("No stories found.");
        return Ok(());
    }

    for line in format_story_lines(&stories) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_show(id: &str) -> Result<(), CliError> {
    let gateway = build_gateway()?;
    let story = gateway.story_detail(id).await?;

    println!("{}", serde_json::to_string_pretty(&story_to_item(&story))?);
    Ok(())
}

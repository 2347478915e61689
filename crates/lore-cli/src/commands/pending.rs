use std::path::Path;

use crate::commands::common::{draft_to_item, format_draft_lines, open_ledger, DraftListItem};
use crate::error::CliError;

pub fn run_pending(all: bool, as_json: bool, data_dir: &Path) -> Result<(), CliError> {
    let ledger = open_ledger(data_dir)?;
    let drafts = if all {
        ledger.list_all()
    } else {
        ledger.list_pending()
    };

    if as_json {
        let json_items = drafts.iter().map(draft_to_item).collect::<Vec<DraftListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if drafts.is_empty() {
        println!("No offline stories queued.");
        return Ok(());
    }

    for line in format_draft_lines(&drafts) {
        println!("{line}");
    }
    Ok(())
}

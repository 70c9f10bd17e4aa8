//! Rename command with link propagation.

use crate::cli::args::RenameArgs;
use crate::cli::output::Output;
use crate::client::Client;
use crate::error::Result;

pub fn run(client: &Client, args: &RenameArgs, output: &Output) -> Result<()> {
    let plan = client.rename_note(&args.query, &args.new_id, args.dry_run)?;

    let verb = if plan.dry_run { "Would rename" } else { "Renamed" };
    output.info(&format!(
        "{} {} to {} ({} link(s) in {} file(s))",
        verb,
        plan.from.display(),
        plan.to.display(),
        plan.links_updated(),
        plan.files.len()
    ));
    output.print(&plan)
}

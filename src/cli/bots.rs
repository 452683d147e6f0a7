//! CLI command listing the built-in bots.

use territory_duel::bots::BotKind;

/// Execute the `bots` command.
pub(crate) fn execute() {
    println!("{:<24} Description", "Name");
    println!("{:-<24} {:-<50}", "", "");

    for kind in BotKind::ALL {
        println!("{:<24} {}", kind.name(), kind.description());
    }

    println!();
    println!("Total: {} bot(s)", BotKind::ALL.len());
}

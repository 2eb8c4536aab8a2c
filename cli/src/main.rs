mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use msgstore_core::diagnostics::{log_event, log_event_with_detail};
use msgstore_core::models::PlatformStats;
use msgstore_core::open_store_existing;
use msgstore_core::orchestrator::{run_purge, PurgeOptions, PurgeOutcome, PurgeReport};
use msgstore_core::platform;
use msgstore_core::stats::collect_platform_stats;

/// Deletes every message thread, message and sync-status row for one
/// platform, with an optional database snapshot beforehand.
#[derive(Parser)]
#[command(name = "clear-platform", version, about)]
struct Args {
    /// Platform tag to purge (e.g. douyin, kuaishou, xiaohongshu)
    platform: String,

    /// Path to the store file (defaults to the app's database location)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Directory holding message image files
    #[arg(long)]
    images_root: Option<PathBuf>,

    /// Directory snapshots are written to
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,

    /// Create a snapshot before deleting (skips the backup prompt)
    #[arg(long, conflicts_with = "no_backup")]
    backup: bool,

    /// Do not create a snapshot (skips the backup prompt)
    #[arg(long)]
    no_backup: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            let _ = log_event_with_detail(
                &config::log_dir(),
                "purge_failed",
                &err.to_string(),
                Some(serde_json::json!({ "platform": args.platform })),
            );
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let db_path = args.db_path.clone().unwrap_or_else(config::db_path);
    let images_root = args
        .images_root
        .clone()
        .unwrap_or_else(config::message_images_dir);
    let backup_dir = args.backup_dir.clone().unwrap_or_else(config::backups_dir);

    let display = platform::display_name(&args.platform).unwrap_or(args.platform.as_str());
    println!("Purge tool for platform: {} ({})", display, args.platform);
    println!("Store: {}", db_path.display());

    // Pre-purge statistics drive the nothing-to-do gate and the prompt.
    let pre_stats = {
        let store = open_store_existing(&db_path)?;
        collect_platform_stats(&store.conn, &args.platform)?
    };
    print_stats(&pre_stats);

    if pre_stats.thread_count == 0 && pre_stats.message_count == 0 {
        println!("Nothing to do: no threads or messages for this platform.");
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "\nWARNING: this permanently deletes {} messages in {} threads.",
        pre_stats.message_count, pre_stats.thread_count
    );
    let confirmed = args.yes || prompt_yes_no_strict()?;
    if !confirmed {
        println!("Cancelled.");
        let _ = log_event(&config::log_dir(), "purge_cancelled", "operator declined");
        return Ok(ExitCode::SUCCESS);
    }

    let create_backup = if args.backup {
        true
    } else if args.no_backup {
        false
    } else {
        prompt_backup()?
    };

    let _ = log_event_with_detail(
        &config::log_dir(),
        "purge_started",
        "platform purge started",
        Some(serde_json::json!({
            "platform": args.platform,
            "threads": pre_stats.thread_count,
            "messages": pre_stats.message_count,
            "backup": create_backup,
        })),
    );

    let options = PurgeOptions {
        confirmed,
        create_backup,
        backup_dir,
        images_root,
    };
    let outcome = run_purge(&db_path, &args.platform, &options)?;
    match outcome {
        PurgeOutcome::NothingToDo { .. } => {
            // another writer emptied the partition between stats and purge
            println!("Nothing left to do: platform is already empty.");
            Ok(ExitCode::SUCCESS)
        }
        PurgeOutcome::Purged(report) => {
            print_report(&report);
            let _ = log_event_with_detail(
                &config::log_dir(),
                "purge_committed",
                "platform purge committed",
                Some(serde_json::json!({
                    "platform": report.platform,
                    "messages_deleted": report.summary.messages_deleted,
                    "threads_deleted": report.summary.threads_deleted,
                    "sync_status_deleted": report.summary.sync_status_deleted,
                    "verified": report.verified,
                })),
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_stats(stats: &PlatformStats) {
    println!("\nCurrent data for this platform:");
    println!("  threads:  {}", stats.thread_count);
    println!("  messages: {}", stats.message_count);
    println!("  sync rows: {}", stats.sync_status_count);
    if !stats.account_breakdown.is_empty() {
        println!("  accounts ({}):", stats.account_breakdown.len());
        for account in &stats.account_breakdown {
            println!(
                "    - {} ({} threads)",
                account.account_id, account.thread_count
            );
        }
    }
    if !stats.top_users.is_empty() {
        println!("  most active users:");
        for user in &stats.top_users {
            println!(
                "    - {} ({} threads, last message {})",
                user.user_name,
                user.thread_count,
                user.last_message_time.as_deref().unwrap_or("unknown")
            );
        }
    }
    if !stats.orphan_message_ids.is_empty() {
        println!(
            "  WARNING: {} orphaned message(s) reference missing threads",
            stats.orphan_message_ids.len()
        );
    }
}

fn print_report(report: &PurgeReport) {
    println!("\nPurge committed:");
    println!("  messages deleted:   {}", report.summary.messages_deleted);
    println!("  threads deleted:    {}", report.summary.threads_deleted);
    println!("  sync rows deleted:  {}", report.summary.sync_status_deleted);
    if let Some(path) = &report.snapshot_path {
        println!("  snapshot: {}", path.display());
    }
    println!(
        "  image files removed: {} ({} skipped)",
        report.artifacts.removed, report.artifacts.skipped
    );
    match &report.compaction_error {
        None => println!("  store compacted"),
        Some(err) => println!("  WARNING: compaction failed: {}", err),
    }
    if report.verified {
        println!("  verification: platform is clean");
    } else {
        println!(
            "  WARNING: verification found residual rows \
             (threads: {}, messages: {}, sync rows: {})",
            report.post_stats.thread_count,
            report.post_stats.message_count,
            report.post_stats.sync_status_count
        );
    }
}

fn prompt_yes_no_strict() -> io::Result<bool> {
    loop {
        print!("Proceed? Type 'YES' to continue or 'NO' to cancel: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_uppercase().as_str() {
            "YES" => return Ok(true),
            "NO" => return Ok(false),
            _ => println!("Please answer 'YES' or 'NO'."),
        }
    }
}

fn prompt_backup() -> io::Result<bool> {
    loop {
        print!("Create a database snapshot first? (Y/N): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(true);
        }
        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            _ => println!("Please answer 'Y' or 'N'."),
        }
    }
}

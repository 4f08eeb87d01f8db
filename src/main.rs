use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use cohort_coding_leaderboard::models::{BranchFilter, DetailView, FilterState, SortOrder};
use cohort_coding_leaderboard::score::ScoreMode;
use cohort_coding_leaderboard::{export, loader, refresh, report, view};

#[derive(Parser)]
#[command(name = "coding-leaderboard")]
#[command(about = "Ranks a student cohort by scraped competitive-programming profiles", long_about = None)]
struct Cli {
    /// Profile snapshot written by the scraper
    #[arg(long, global = true, env = "LEADERBOARD_SNAPSHOT", default_value = "snapshot.json")]
    snapshot: PathBuf,
    /// Where performance scores come from
    #[arg(long, global = true, value_enum, default_value_t = ScoreMode::Auto)]
    score_mode: ScoreMode,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_enum, default_value_t = BranchFilter::All)]
    branch: BranchFilter,
    /// Case-insensitive match on roll number or name
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, value_enum, default_value_t = SortOrder::None)]
    sort: SortOrder,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        FilterState {
            branch: self.branch,
            search_query: self.search,
            sort_order: self.sort,
        }
    }
}

#[derive(Args)]
struct ScraperArgs {
    /// Shell command that runs the profile scraper
    #[arg(
        long,
        env = "LEADERBOARD_SCRAPER",
        default_value = ". venv/bin/activate && python3 extractData.py"
    )]
    scraper: String,
    /// File the scraper writes its output to
    #[arg(long, default_value = "students_profiles.json")]
    scraped: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the highest scoring students
    Top {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List students matching a branch/search filter
    Roster {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one student's profile breakdown
    Detail {
        roll: String,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "leaderboard.md")]
        out: PathBuf,
    },
    /// Export the filtered roster as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "roster.csv")]
        out: PathBuf,
    },
    /// Run the scraper once and replace the snapshot on success
    Refresh {
        #[command(flatten)]
        scraper: ScraperArgs,
    },
    /// Run the scraper on a fixed interval until interrupted
    Watch {
        #[command(flatten)]
        scraper: ScraperArgs,
        #[arg(long, default_value_t = 60)]
        every_minutes: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Cli {
        snapshot,
        score_mode,
        command,
    } = Cli::parse();
    let load = || loader::load_records_with(&loader::read_snapshot_or_empty(&snapshot), score_mode);

    match command {
        Commands::Top { limit } => {
            let (records, _) = load();
            let top = view::top_n(&records, limit);
            if top.is_empty() {
                println!("No students with a positive score.");
                return Ok(());
            }

            println!("Top {} performers:", top.len());
            for (rank, student) in top.iter().enumerate() {
                println!(
                    "{:>3}. {} ({}, {}) score {:.1}",
                    rank + 1,
                    student.name,
                    student.roll,
                    student.branch,
                    student.performance_score
                );
            }
        }
        Commands::Roster { filter } => {
            let (records, _) = load();
            let rows = view::roster(&records, &filter.into_state());
            if rows.is_empty() {
                println!("No students match this filter.");
                return Ok(());
            }

            for (index, student) in rows.iter().enumerate() {
                let row = view::RosterRow::from_record(student);
                println!(
                    "{:>3}. {} | {} | {} | GFG {} | CodeChef {} | {} | {:.1}",
                    index + 1,
                    row.roll,
                    row.name,
                    row.branch,
                    row.gfg_rating,
                    row.codechef_rating,
                    row.hackerrank_badges,
                    row.performance_score
                );
            }
        }
        Commands::Detail { roll } => {
            let (records, _) = load();
            match view::detail(&records, &roll) {
                DetailView::NoData => println!("No data for roll {roll}."),
                DetailView::Found(detail) => {
                    let student = detail.record;
                    println!("{} ({}, {})", student.name, student.roll, student.branch);
                    println!("Performance score: {:.1}", student.performance_score);
                    println!("Total problems solved: {}", detail.total_solved);
                    println!("GeeksForGeeks");
                    println!("  Username: {}", detail.gfg.username);
                    println!("  Coding Score: {}", detail.gfg.coding_score);
                    println!("  Problems Solved: {}", detail.gfg.problems_solved);
                    println!("  Rating: {}", detail.gfg.rating);
                    println!("CodeChef");
                    println!("  Username: {}", detail.codechef.username);
                    println!("  Rating: {}", detail.codechef_rating);
                    println!("HackerRank");
                    println!("  Username: {}", detail.hackerrank.username);
                    println!("  Badges: {}", view::format_badges(&detail.badges));
                }
            }
        }
        Commands::Report { filter, out } => {
            let (records, source) = load();
            let report = report::build_report(
                &records,
                &filter.into_state(),
                source,
                chrono::Local::now(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { filter, out } => {
            let (records, _) = load();
            let rows = view::roster(&records, &filter.into_state());
            let written = export::export_roster(&rows, &out)?;
            println!("Exported {written} students to {}.", out.display());
        }
        Commands::Refresh { scraper } => {
            let config = refresh_config(scraper, snapshot.clone());
            match refresh::refresh(&config).await {
                refresh::RefreshOutcome::Success { students } => {
                    println!("Data updated successfully ({students} students).");
                }
                refresh::RefreshOutcome::Failure(reason) => {
                    anyhow::bail!("error running scraper: {reason}");
                }
            }
        }
        Commands::Watch {
            scraper,
            every_minutes,
        } => {
            let config = refresh_config(scraper, snapshot.clone());
            let every = watch_interval(every_minutes);
            refresh::watch(&config, every).await?;
        }
    }

    Ok(())
}

fn refresh_config(args: ScraperArgs, snapshot: PathBuf) -> refresh::RefreshConfig {
    refresh::RefreshConfig {
        scraper: args.scraper,
        scraped: args.scraped,
        snapshot,
    }
}

fn watch_interval(every_minutes: u64) -> Duration {
    Duration::from_secs(every_minutes.max(1).saturating_mul(60))
}

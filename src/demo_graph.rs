use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Parser;

use commit_graph::{Commit, Graph, GraphBuilder, DEFAULT_ROW_HEIGHT};

#[derive(Parser)]
#[command(name = "demo_graph")]
#[command(about = "Lay out a synthetic commit history and print it", long_about = None)]
struct Cli {
    /// Number of trunk commits to generate
    #[arg(short, long, default_value = "24")]
    count: usize,
    /// Merge a short-lived feature branch every N trunk commits
    #[arg(long, default_value = "4")]
    branch_every: usize,
    /// Number of palette colors to cycle through
    #[arg(long, default_value = "8")]
    palette: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let commits = synthetic_history(cli.count, cli.branch_every.max(2));
    let builder = GraphBuilder::new(DEFAULT_ROW_HEIGHT, cli.palette);
    let graph = builder.parse(&commits);

    let stats = graph.stats();
    println!(
        "{} commits, {} edges, {} merges, width {}",
        stats.total_commits, stats.total_edges, stats.merge_commits, stats.width
    );
    println!();

    print_graph(&graph);
    Ok(())
}

/// Deterministic branchy history, newest first: a linear trunk with a
/// feature branch merged back in every `branch_every` commits.
fn synthetic_history(count: usize, branch_every: usize) -> Vec<Commit> {
    const BASE_TIME: i64 = 1_700_000_000;

    let mut commits = Vec::with_capacity(count + count / branch_every);
    let mut i = count;
    while i > 0 {
        let id = format!("c{i:03}");
        let merges_branch = i >= 2 && i % branch_every == 0;

        let mut trunk = if i > 1 {
            Commit::new(id.as_str(), [format!("c{:03}", i - 1)])
        } else {
            Commit::new(id.as_str(), Vec::<String>::new())
        };
        trunk.author = "demo".into();
        trunk.timestamp = BASE_TIME + i as i64 * 3600;
        trunk.message = if merges_branch {
            format!("Merge branch 'feature-{i}'")
        } else {
            format!("Trunk work #{i}")
        };

        if merges_branch {
            let feature_id = format!("f{i:03}");
            trunk.parents.push(feature_id.clone());
            commits.push(trunk);

            let mut feature = Commit::new(feature_id.as_str(), [format!("c{:03}", i - 1)]);
            feature.author = "demo".into();
            feature.timestamp = BASE_TIME + i as i64 * 3600 - 1800;
            feature.message = format!("Feature work for #{i}");
            commits.push(feature);
        } else {
            commits.push(trunk);
        }

        i -= 1;
    }

    commits
}

fn print_graph(graph: &Graph) {
    for row in &graph.rows {
        let mut cells = vec![' '; graph.lane_count.max(1) * 2];

        for seg in &row.segments {
            if seg.start_row != row.row {
                continue;
            }
            let glyph = if seg.from_lane == seg.to_lane {
                '│'
            } else if seg.from_lane < seg.to_lane {
                '╲'
            } else {
                '╱'
            };
            cells[seg.from_lane * 2] = glyph;
        }
        cells[row.lane * 2] = '●';

        let track: String = cells.into_iter().collect();
        let date = Local
            .timestamp_opt(row.commit.timestamp, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!(
            "{} {:>6} {} {}",
            track, row.commit.id, date, row.commit.message
        );
    }
}

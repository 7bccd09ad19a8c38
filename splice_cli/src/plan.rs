use std::path::PathBuf;

use clap::{Args, ValueEnum};
use comfy_table::{Table, presets::UTF8_FULL};
use indicatif::{ProgressBar, ProgressStyle};
use jiff::Zoned;
use splice_oracle::{
    command_oracle::{
        DEFAULT_DUAROUTER_COMMAND, DEFAULT_ROUTER_COMMAND, ROUTER_COMMAND_ENV_VAR,
        default_duarouter_args, default_router_args,
    },
    routing_oracle_client::RoutingOracleClient,
    routing_oracle_provider::RoutingOracleProvider,
};
use splice_planner::{
    json::types::JsonFleet,
    problem::stop::Stop,
    search::{
        artifacts::ArtifactStore,
        insertion_search::InsertionSearch,
        report::{CandidateStatus, SearchReport},
        route_stitcher::AlternativeSelection,
        search_params::{SearchParams, Threads},
    },
};
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
enum OracleKind {
    /// Legs precomputed in the network descriptor
    Table,
    /// External router process exchanging JSON files
    Command,
    /// SUMO duarouter over a .net.xml network
    Duarouter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Selection {
    Chosen,
    Continuity,
}

impl From<Selection> for AlternativeSelection {
    fn from(value: Selection) -> Self {
        match value {
            Selection::Chosen => AlternativeSelection::Chosen,
            Selection::Continuity => AlternativeSelection::Continuity,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Fleet file listing every truck's trips in order
    #[arg(short, long)]
    fleet: PathBuf,

    /// Edge of the stop to insert, defaults to the fleet file's
    #[arg(long)]
    new_stop: Option<String>,

    /// Road network: the table descriptor or the router's network file
    #[arg(short, long)]
    network: PathBuf,

    #[arg(long, value_enum, default_value_t = OracleKind::Table)]
    oracle: OracleKind,

    /// Router program, defaults to splice-router or duarouter depending on the oracle
    #[arg(long, env = ROUTER_COMMAND_ENV_VAR)]
    router: Option<String>,

    /// Worker threads, all available cores when omitted
    #[arg(short, long)]
    threads: Option<usize>,

    #[arg(long, value_enum, default_value_t = Selection::Continuity)]
    selection: Selection,

    /// Skip the candidate inserting the stop before the fleet's first trip
    #[arg(long)]
    no_fleet_start: bool,

    /// Folder receiving the run directory
    #[arg(short, long, env = "SPLICE_OUTPUT_FOLDER", default_value = ".")]
    out: PathBuf,
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let problem =
        JsonFleet::from_path(&args.fleet)?.build_problem(args.new_stop.as_deref().map(Stop::new))?;

    let run_folder = args
        .out
        .join(Zoned::now().strftime("output_%Y_%m_%d_%H_%M_%S").to_string());
    let staging_folder = run_folder.join("staging");
    std::fs::create_dir_all(&staging_folder)?;

    info!("Planning {:?} into {:?}", args.fleet, run_folder);

    let provider = match args.oracle {
        OracleKind::Table => RoutingOracleProvider::Table,
        OracleKind::Command => RoutingOracleProvider::Command {
            program: args
                .router
                .unwrap_or_else(|| String::from(DEFAULT_ROUTER_COMMAND)),
            args: default_router_args(),
        },
        OracleKind::Duarouter => RoutingOracleProvider::Duarouter {
            program: args
                .router
                .unwrap_or_else(|| String::from(DEFAULT_DUAROUTER_COMMAND)),
            args: default_duarouter_args(),
        },
    };
    let oracle = RoutingOracleClient::new(provider, &args.network, &staging_folder)?;

    let params = SearchParams {
        threads: args.threads.map_or(Threads::Auto, Threads::Multi),
        selection: args.selection.into(),
        include_fleet_start: !args.no_fleet_start,
    };

    let store = ArtifactStore::new(&run_folder)?;
    let report_folder = store.folder().to_path_buf();

    let mut search = InsertionSearch::new(problem, oracle, params).with_artifacts(store);

    info!(
        "Inserting {} into {} trips over {} trucks ({} candidates)",
        search.problem().new_stop(),
        search.problem().fleet().len(),
        search.problem().trucks().len(),
        search.candidates().len()
    );

    let bar = ProgressBar::new(search.candidates().len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} candidates ({elapsed})")?);

    let progress = bar.clone();
    search.on_evaluation(move |_| progress.inc(1));

    let report = search.run();
    bar.finish_and_clear();
    let report = report?;

    report.write_json(&report_folder.join("report.json"))?;
    report.write_text(&report_folder.join("report.txt"))?;

    println!("{}", summary_table(&report));

    match (report.best(), report.worst()) {
        (Some(best), Some(worst)) => {
            info!("Minimum cost {} at {}", best.cost, best.candidate);
            info!("Maximum cost {} at {}", worst.cost, worst.candidate);
        }
        _ => info!("No candidate could be routed"),
    }
    info!(
        "{} skipped, report written to {:?} in {}",
        report.skipped,
        report_folder,
        report.elapsed()
    );

    Ok(())
}

fn summary_table(report: &SearchReport) -> Table {
    let best = report.best().map(|best| best.candidate.id());
    let worst = report.worst().map(|worst| worst.candidate.id());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Candidate", "Truck", "Position", "Cost", ""]);

    for entry in &report.log {
        let candidate = &entry.candidate;
        let (cost, note) = match &entry.status {
            CandidateStatus::Evaluated { cost, .. } => {
                let note = if Some(candidate.id()) == best {
                    "min"
                } else if Some(candidate.id()) == worst {
                    "max"
                } else {
                    ""
                };
                (format!("{cost:.3}"), note.to_string())
            }
            CandidateStatus::Skipped { kind, .. } => (String::from("-"), kind.to_string()),
        };

        let position = if candidate.is_boundary() {
            format!("{}, {}", candidate.position(), candidate.kind())
        } else {
            candidate.position().to_string()
        };

        table.add_row(vec![
            candidate.id().to_string(),
            candidate.truck().to_string(),
            position,
            cost,
            note,
        ]);
    }

    table
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hand_coach_lib::coach::FactSheet;
use hand_coach_lib::stats::{leaks, summarize, HandFilter, PrimaryFilter};
use hand_coach_lib::{analyze_file, timeline, Config, IndexedHand, Position};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hand-coach")]
#[command(about = "Parse GGPoker hand histories into per-hand facts and session stats")]
#[command(version)]
struct Cli {
    /// JSON config file (parser and report settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every parsed hand as JSON, oldest first
    Parse {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// VPIP / PFR / aggression overall and by position
    Stats { file: PathBuf },
    /// Biggest voluntarily played pots the hero did not win
    Leaks { file: PathBuf },
    /// List hands matching a filter
    List {
        file: PathBuf,
        /// all, vpip, won, lost or big-pot
        #[arg(long, default_value = "all")]
        filter: PrimaryFilter,
        /// Only these positions, e.g. --position BTN --position CO
        #[arg(long = "position")]
        positions: Vec<Position>,
    },
    /// Street-by-street action transcript of one hand
    Timeline {
        file: PathBuf,
        /// Hand number as shown by `list` (1 = oldest)
        #[arg(long)]
        hand: usize,
    },
    /// Fixed facts about one hand, as handed to the coaching model
    Facts {
        file: PathBuf,
        #[arg(long)]
        hand: usize,
    },
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    hero: Option<&'a str>,
    hands: &'a [IndexedHand],
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).context("could not load config"),
        None => Ok(Config::default()),
    }
}

fn load_hands(file: &Path, config: &Config) -> Result<(Option<String>, Vec<IndexedHand>)> {
    let log = analyze_file(file, config)
        .with_context(|| format!("could not analyze {}", file.display()))?;
    let hero = log.hero.clone();
    Ok((hero, log.into_chronological()))
}

fn find_hand(hands: &[IndexedHand], display_index: usize) -> Result<&IndexedHand> {
    hands
        .iter()
        .find(|h| h.display_index == display_index)
        .ok_or_else(|| anyhow::anyhow!("no hand #{} (log has {} hands)", display_index, hands.len()))
}

fn print_row(hand: &IndexedHand) {
    println!(
        "#{:<4} {:<6} {:<8} {:<5} {:>8}  {}",
        hand.display_index,
        hand.hero_position_label,
        hand.hero_cards_display,
        hand.outcome,
        hand.pot_size_chips,
        hand.id
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, pretty } => {
            let (hero, hands) = load_hands(&file, &config)?;
            let output = ParseOutput {
                hero: hero.as_deref(),
                hands: &hands,
            };
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
        Commands::Stats { file } => {
            let (hero, hands) = load_hands(&file, &config)?;
            let summary = summarize(&hands);
            println!("Hero: {}", hero.as_deref().unwrap_or("-"));
            println!("Hands: {}", summary.total_hands);
            println!(
                "VPIP: {:.1}% | PFR: {:.1}% | Agg: {:.1}%",
                summary.vpip_pct, summary.pfr_pct, summary.aggression_pct
            );
            for bucket in &summary.by_position {
                println!("{:<4} {}", format!("{}:", bucket.bucket), bucket);
            }
        }
        Commands::Leaks { file } => {
            let (_, hands) = load_hands(&file, &config)?;
            let found = leaks(&hands, config.report.leak_count);
            if found.is_empty() {
                println!("No leaks found: every voluntarily played hand was won.");
            }
            for hand in found {
                print_row(hand);
            }
        }
        Commands::List {
            file,
            filter,
            positions,
        } => {
            let (_, hands) = load_hands(&file, &config)?;
            let filter = HandFilter {
                primary: filter,
                positions,
                ..HandFilter::new(&config.report)
            };
            let matched = filter.apply(&hands);
            if matched.is_empty() {
                println!("No hands match this filter.");
            }
            for hand in matched {
                print_row(hand);
            }
        }
        Commands::Timeline { file, hand } => {
            let (_, hands) = load_hands(&file, &config)?;
            let hand = find_hand(&hands, hand)?;
            let rendered =
                timeline::render(&hand.raw_text, &hand.hero_name, hand.big_blind_size)
                    .context("hand has no content")?;
            for line in rendered.lines() {
                println!("{}", line);
            }
        }
        Commands::Facts { file, hand } => {
            let (_, hands) = load_hands(&file, &config)?;
            let hand = find_hand(&hands, hand)?;
            println!("{}", FactSheet::from_hand(hand));
        }
    }

    Ok(())
}

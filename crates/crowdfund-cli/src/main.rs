use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use crowdfund_core::boundary::{ContractWriter, WriteLog};
use crowdfund_core::campaign::{unix_now, CampaignCard};
use crowdfund_core::category::ALL_CATEGORIES;
use crowdfund_core::record::is_big_number;
use crowdfund_core::store::DetailView;
use crowdfund_core::{
    format_ether, normalize_amount, normalize_campaign, normalize_campaigns, parse_ether,
    plan_launch, plan_pledge, Address, CampaignStore, CanonicalCampaign, DappConfig, Error,
    LaunchForm, ReadState, WalletSession, WeiAmount,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Crowdfund: inspect campaign data and plan contract calls
///
/// Normalize raw contract reads, convert token units, and build the
/// pledge / launch transactions the wallet would submit.
#[derive(Parser)]
#[command(name = "crowdfund", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config with contract addresses
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw campaign record or list (JSON file)
    Normalize {
        /// Path to .json file with contract output
        file: PathBuf,
        /// Current unix time in seconds (defaults to the system clock)
        #[arg(long)]
        now: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the campaign list as cards
    List {
        /// Path to .json file with `getAllCampaigns` output
        file: PathBuf,
        /// Only campaigns in this category
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
        #[arg(long)]
        now: Option<u64>,
        #[arg(long)]
        json: bool,
    },

    /// Show one campaign in detail
    Show {
        /// Path to .json file with `getAllCampaigns` output
        file: PathBuf,
        /// Campaign id
        #[arg(long)]
        id: u64,
        #[arg(long)]
        now: Option<u64>,
        #[arg(long)]
        json: bool,
    },

    /// Convert a wei amount to ether
    Ether {
        /// Integer amount in wei (decimal or 0x hex)
        wei: String,
    },

    /// Convert an ether amount to wei
    Wei {
        /// Decimal ether amount
        amount: String,
    },

    /// Plan a pledge (or the approval it needs first)
    Pledge {
        /// Campaign id
        #[arg(long)]
        id: u64,
        /// Amount in ether
        #[arg(long)]
        amount: String,
        /// Current token allowance in wei (unknown if omitted)
        #[arg(long)]
        allowance: Option<String>,
        /// Connected wallet address (disconnected if omitted)
        #[arg(long)]
        wallet: Option<String>,
    },

    /// Plan a campaign launch
    Launch {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Funding goal in ether
        #[arg(long)]
        goal: String,
        #[arg(long)]
        category: String,
        /// Start date (YYYY-MM-DD, datetime, or unix seconds)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD, datetime, or unix seconds)
        #[arg(long)]
        end: String,
        /// Connected wallet address (disconnected if omitted)
        #[arg(long)]
        wallet: Option<String>,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Show version information
    Version,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            exit_code_for(&e)
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 1 for rule failures the user can fix, 2 for everything else
fn exit_code_for(e: &Error) -> i32 {
    match e {
        Error::WalletNotConnected
        | Error::InvalidAmount(_)
        | Error::InvalidAddress(_)
        | Error::InvalidDate(_)
        | Error::Validation(_) => 1,
        Error::Config(_) | Error::Io(_) | Error::Json(_) => 2,
    }
}

fn run(cli: Cli) -> Result<i32, Error> {
    let config = match &cli.config {
        Some(path) => DappConfig::load(path)?,
        None => DappConfig::default(),
    };

    match cli.command {
        Commands::Normalize { file, now, json } => {
            cmd_normalize(&file, now.unwrap_or_else(unix_now), json)
        }
        Commands::List {
            file,
            category,
            now,
            json,
        } => cmd_list(&file, &category, now.unwrap_or_else(unix_now), json),
        Commands::Show {
            file,
            id,
            now,
            json,
        } => cmd_show(&file, id, now.unwrap_or_else(unix_now), json),
        Commands::Ether { wei } => cmd_ether(&wei),
        Commands::Wei { amount } => {
            println!("{}", parse_ether(&amount)?);
            Ok(0)
        }
        Commands::Pledge {
            id,
            amount,
            allowance,
            wallet,
        } => {
            let wallet = wallet_session(wallet.as_deref())?;
            let allowance = allowance.as_deref().map(str::parse::<WeiAmount>).transpose()?;
            let plan = plan_pledge(&config, &wallet, id, &amount, allowance.as_ref())?;
            if plan.is_approval() {
                eprintln!(
                    "{} allowance too low; approve first, then pledge again",
                    "note:".yellow().bold()
                );
            }
            let log = WriteLog::new();
            plan.submit(&log);
            print_log(&log)
        }
        Commands::Launch {
            title,
            description,
            goal,
            category,
            start,
            end,
            wallet,
            now,
        } => {
            let wallet = wallet_session(wallet.as_deref())?;
            let form = LaunchForm {
                title,
                description,
                goal,
                category,
                start,
                end,
            };
            let call = plan_launch(&config, &wallet, &form, now.unwrap_or_else(unix_now))?;
            let log = WriteLog::new();
            log.submit(call);
            print_log(&log)
        }
        Commands::Version => {
            println!("crowdfund {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_normalize(file: &Path, now: u64, json: bool) -> Result<i32, Error> {
    let raw = read_json(file)?;
    if is_list(&raw) {
        let campaigns = normalize_campaigns(&raw, now);
        if json {
            println!("{}", serde_json::to_string_pretty(&campaigns)?);
        } else {
            campaigns.iter().for_each(print_detail);
        }
    } else {
        let campaign = normalize_campaign(&raw, now);
        if json {
            println!("{}", serde_json::to_string_pretty(&campaign)?);
        } else {
            print_detail(&campaign);
        }
    }
    Ok(0)
}

fn cmd_list(file: &Path, category: &str, now: u64, json: bool) -> Result<i32, Error> {
    let store = load_store(file, now)?;
    let cards: Vec<CampaignCard> = store
        .filtered(category)
        .into_iter()
        .map(CampaignCard::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(0);
    }

    let categories = store.categories();
    if !categories.is_empty() {
        println!(
            "{} {}, {}",
            "Categories:".bold(),
            ALL_CATEGORIES,
            categories.join(", ")
        );
    }
    if cards.is_empty() {
        println!("No campaigns in {}", category);
    }
    for card in &cards {
        println!(
            "#{} {} {}",
            card.id,
            card.title.bold(),
            format!("[{}]", card.category).cyan()
        );
        println!(
            "   ${} raised of ${} goal ({:.1}%), {} days left",
            card.raised, card.goal, card.percentage, card.days_left
        );
    }
    Ok(0)
}

fn cmd_show(file: &Path, id: u64, now: u64, json: bool) -> Result<i32, Error> {
    let store = load_store(file, now)?;
    match store.detail(id) {
        DetailView::Ready(campaign) => {
            if json {
                let mut output = serde_json::to_value(campaign)?;
                output["percentage"] = Value::from(campaign.funding_percentage());
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_detail(campaign);
            }
            Ok(0)
        }
        DetailView::NotFound => {
            eprintln!("{} campaign {} not found", "error:".red().bold(), id);
            Ok(1)
        }
        DetailView::Loading => {
            eprintln!("Loading project…");
            Ok(1)
        }
    }
}

fn cmd_ether(wei: &str) -> Result<i32, Error> {
    let trimmed = wei.trim();
    match trimmed.strip_prefix('-') {
        // negative amounts only have a float rendering
        Some(digits) => {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidAmount(format!("'{}' is not a wei amount", trimmed)));
            }
            println!("{}", normalize_amount(trimmed));
        }
        None => println!("{}", format_ether(&trimmed.parse::<WeiAmount>()?)),
    }
    Ok(0)
}

// ── Helpers ───────────────────────────────────────────────

fn read_json(file: &Path) -> Result<Value, Error> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

/// A list is an array of records (tuples or objects). A lone tuple holds
/// scalars, which may include big-number objects.
fn is_list(raw: &Value) -> bool {
    match raw {
        Value::Array(items) => items
            .iter()
            .all(|item| item.is_array() || (item.is_object() && !is_big_number(item))),
        _ => false,
    }
}

fn load_store(file: &Path, now: u64) -> Result<CampaignStore, Error> {
    let raw = read_json(file)?;
    let raw = if is_list(&raw) {
        raw
    } else {
        Value::Array(vec![raw])
    };

    let mut store = CampaignStore::new();
    store.apply_list(ReadState::Ready(raw), now);
    Ok(store)
}

fn wallet_session(address: Option<&str>) -> Result<WalletSession, Error> {
    Ok(match address {
        Some(text) => WalletSession::connected(Address::parse(text)?),
        None => WalletSession::disconnected(),
    })
}

fn print_log(log: &WriteLog) -> Result<i32, Error> {
    for entry in log.entries() {
        println!("{}", serde_json::to_string_pretty(&entry.call)?);
    }
    Ok(0)
}

fn print_detail(campaign: &CanonicalCampaign) {
    println!("{} {}", format!("#{}", campaign.id).dimmed(), campaign.title.bold());
    println!("  category:  {}", campaign.category.cyan());
    println!("  creator:   {}", campaign.creator);
    println!(
        "  raised:    ${} of ${} ({:.1}%)",
        campaign.raised_text(),
        campaign.goal_text(),
        campaign.funding_percentage()
    );
    println!("  days left: {}", campaign.days_left);
    if campaign.claimed {
        println!("  {}", "claimed".green());
    }
    if !campaign.description.is_empty() {
        println!("  {}", campaign.description);
    }
}

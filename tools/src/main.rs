//! stand-runner: headless day runner for the lemonade stand.
//!
//! Usage:
//!   stand-runner --seed 12345 --days 30 --db stand.db --price 1.25 --restock 40
//!   stand-runner --seed 12345 --ipc-mode

use anyhow::Result;
use lemonade_core::{
    command::PlayerCommand,
    config::SimConfig,
    engine::DayResult,
    error::SimError,
    session::GameSession,
    state::{DaySummary, Inventory, Upgrades},
    store::SimStore,
    types::{AchievementId, Day, EventKind, SupplyKind, Weather},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    StartDay {
        #[serde(default = "one_day")]
        count: u32,
    },
    Command {
        command: PlayerCommand,
    },
    ForceEvent {
        kind: EventKind,
    },
    Quit,
}

fn one_day() -> u32 {
    1
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    session_id: &'a str,
    day: Day,
    cash: f64,
    price: f64,
    reputation: f64,
    stars: f64,
    weather: Weather,
    next_weather: Weather,
    inventory: &'a Inventory,
    upgrades: &'a Upgrades,
    total_sales: u64,
    achievements: Vec<AchievementId>,
    last_day: Option<&'a DaySummary>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 30u32);
    let restock = parse_arg(&args, "--restock", 0u32);
    let price = args
        .windows(2)
        .find(|w| w[0] == "--price")
        .and_then(|w| w[1].parse::<f64>().ok());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let resume = str_arg(&args, "--session");

    let config = match SimConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("could not load {data_dir}: {e:#}; using builtin catalog");
            SimConfig::builtin()
        }
    };

    if !ipc_mode {
        println!("Lemonade Stand: stand-runner");
        println!("  seed:      {seed}");
        println!("  days:      {days}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let store = if db == ":memory:" {
        SimStore::in_memory()?
    } else {
        SimStore::open(db)?
    };
    let mut session = match resume {
        Some(id) => GameSession::resume(store, config, id)?,
        None => GameSession::create(store, config, seed, None)?,
    };

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        if let Some(p) = price {
            apply_or_warn(&mut session, PlayerCommand::SetPrice { price: p })?;
        }
        for _ in 0..days {
            restock_to(&mut session, restock)?;
            let result = session.start_day()?;
            print_day(&result);
        }
        print_summary(&session)?;
    }

    Ok(())
}

fn run_ipc_loop(session: &mut GameSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::StartDay { count } => {
                for _ in 0..count {
                    session.start_day()?;
                }
            }
            IpcCommand::Command { command } => match session.apply(command) {
                Ok(()) => {}
                Err(SimError::Rejected(r)) => {
                    write_error(&mut stdout, &r.to_string())?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            },
            IpcCommand::ForceEvent { kind } => session.force_next_event(kind),
        }
        writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(session))?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(session: &GameSession) -> UiState<'_> {
    let state = session.state();
    UiState {
        session_id: session.session_id(),
        day: state.day_number,
        cash: state.cash,
        price: state.price,
        reputation: state.reputation,
        stars: state.stars,
        weather: state.weather,
        next_weather: state.next_weather,
        inventory: &state.inventory,
        upgrades: &state.upgrades,
        total_sales: state.total_sales,
        achievements: state.achievements_unlocked.iter().copied().collect(),
        last_day: state.last_day(),
    }
}

/// Top every supply up to `target` units, as far as cash allows.
fn restock_to(session: &mut GameSession, target: u32) -> Result<()> {
    for item in SupplyKind::ALL {
        let have = session.state().inventory.get(item);
        let unit = session.config().costs.unit_cost(item);
        if have >= target || unit <= 0.0 {
            continue;
        }
        let affordable = (session.state().cash / unit).floor() as u32;
        let quantity = (target - have).min(affordable);
        if quantity > 0 {
            apply_or_warn(session, PlayerCommand::BuySupplies { item, quantity })?;
        }
    }
    Ok(())
}

/// Rejections are expected while auto-playing; anything else is fatal.
fn apply_or_warn(session: &mut GameSession, command: PlayerCommand) -> Result<()> {
    match session.apply(command) {
        Ok(()) | Err(SimError::Rejected(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn print_day(result: &DayResult) {
    let s = &result.summary;
    let event = result.event.map(|k| k.name()).unwrap_or("-");
    println!(
        "  day {:>3} | {:<6} | {:<16} | served {:>3}/{:<3} | net ${:>8.2} | cash ${:>8.2}",
        s.day,
        s.weather.name(),
        event,
        s.served,
        s.potential_customers,
        s.net_profit,
        s.ending_cash
    );
    for a in &result.achievements {
        println!("          achievement: {} (+${:.2})", a.name, a.reward);
    }
}

fn print_summary(session: &GameSession) -> Result<()> {
    let state = session.state();
    let days = session.store().day_summary_count(session.session_id())?;
    let lifetime = session.store().lifetime_net_profit(session.session_id())?;

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  session:        {}", session.session_id());
    println!("  db:             {}", session.store().path().unwrap_or(":memory:"));
    println!("  days played:    {days}");
    println!("  next day:       {}", state.day_number);
    println!("  cash:           ${:.2}", state.cash);
    println!("  reputation:     {:.1} ({:.1} stars)", state.reputation, state.stars);
    println!("  total sales:    {}", state.total_sales);
    println!("  total revenue:  ${:.2}", state.total_revenue);
    println!("  net profit:     ${lifetime:.2}");
    println!("  best day:       {} cups", state.best_day);
    println!("  perfect days:   {}", state.perfect_days);
    println!("  achievements:   {}", state.achievements_unlocked.len());
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
